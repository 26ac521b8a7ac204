use std::cell::Cell;
use std::collections::BTreeSet;
use std::path::Path;
use std::rc::Rc;

use colored::Colorize;
use unfold_core::{Callables, Context, SectionStore, Story, markup};
use unfold_engine::diagnostics::Diagnostic;
use unfold_engine::links::activate_links;
use unfold_engine::{LinkDirective, expand_section, render_diagnostics, render_expand_error};

use super::plural;

pub fn run(path: &Path) -> Result<(), String> {
    let story = super::load_story(path)?;
    let callables = super::builtin_callables(Rc::new(Cell::new(0)));
    let variables = super::story_variables(&story);
    let ctx = Context::new(&story, &callables, &variables);

    let mut failed = 0;
    // Included sections report their warnings once per includer.
    let mut seen = BTreeSet::new();

    for id in story.section_ids() {
        let source = story.section(id).unwrap_or_default();
        match expand_section(&ctx, &story.config, id) {
            Ok(expansion) => {
                for warning in expansion.warnings {
                    if !seen.insert(warning.to_string()) {
                        continue;
                    }
                    let section = warning.section.as_deref().unwrap_or(id);
                    let section_source = story.section(section).unwrap_or(source);
                    let diag = Diagnostic::Dropped(&warning);
                    eprint!("{}", render_diagnostics(section, section_source, &[diag]));
                }
            }
            Err(e) => {
                failed += 1;
                eprint!("{}", render_expand_error(id, source, &e));
            }
        }
    }

    for problem in link_problems(&story, &callables) {
        if seen.insert(problem.clone()) {
            eprintln!("  {} {problem}", "warning:".yellow());
        }
    }

    let total = story.sections.len();
    let warnings = seen.len();
    if failed > 0 {
        eprintln!(
            "  {failed} error{}, {warnings} warning{}",
            plural(failed),
            plural(warnings)
        );
        return Err(format!(
            "{failed} of {total} section{} failed to expand",
            plural(total)
        ));
    }

    println!(
        "  {} for '{}'.",
        "All sections expand".green(),
        story.title
    );
    println!(
        "  {total} section{}, {warnings} warning{}",
        plural(total),
        plural(warnings)
    );
    Ok(())
}

/// Directives in raw section markup that point at nothing.
///
/// Links brought in by `data-replace-with` are only known once the reader
/// activates them, so they are not checked.
fn link_problems(story: &Story, callables: &Callables) -> Vec<String> {
    let mut problems = Vec::new();
    for (id, source) in &story.sections {
        let tree = markup::parse(source);
        for link in activate_links(&tree, tree.root()) {
            for directive in link.directives {
                match directive {
                    LinkDirective::GotoSection(target) if story.section(&target).is_none() => {
                        problems.push(format!(
                            "section '{id}' links to missing section '{target}'"
                        ));
                    }
                    LinkDirective::CallFunction(name) if !callables.contains(&name) => {
                        problems.push(format!("section '{id}' calls unknown function '{name}'"));
                    }
                    _ => {}
                }
            }
        }
    }
    problems
}
