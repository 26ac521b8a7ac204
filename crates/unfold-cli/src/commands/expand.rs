use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use unfold_core::{Context, SectionStore};
use unfold_engine::{ExpandError, expand_section, render_expand_error};

pub fn run(path: &Path, section: &str) -> Result<(), String> {
    let story = super::load_story(path)?;
    let callables = super::builtin_callables(Rc::new(Cell::new(0)));
    let variables = super::story_variables(&story);
    let ctx = Context::new(&story, &callables, &variables);

    match expand_section(&ctx, &story.config, section) {
        Ok(expansion) => {
            super::print_warnings(&expansion.warnings);
            println!("{}", expansion.content.to_markup());
            Ok(())
        }
        Err(ExpandError::SectionNotFound(id)) => Err(format!("section '{id}' not found")),
        Err(e) => {
            let source = story.section(section).unwrap_or_default();
            eprint!("{}", render_expand_error(section, source, &e));
            Err(format!("section '{section}' failed to expand"))
        }
    }
}
