pub mod check;
pub mod expand;
pub mod init;
pub mod play;
pub mod sections;

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use colored::Colorize;
use unfold_core::{Callables, Story, Variables};
use unfold_engine::MacroWarning;

/// Load and validate a story file.
fn load_story(path: &Path) -> Result<Story, String> {
    Story::load(path).map_err(|e| format!("cannot load story '{}': {e}", path.display()))
}

/// The story's initial variables.
fn story_variables(story: &Story) -> Variables {
    Variables::from_json(&story.variables)
}

/// Callables every story can use: `turn` reads the shared move counter,
/// `today` is the local date.
fn builtin_callables(turns: Rc<Cell<usize>>) -> Callables {
    Callables::new()
        .with("turn", move || turns.get().to_string())
        .with("today", || chrono::Local::now().format("%Y-%m-%d").to_string())
}

/// Print recorded warnings to stderr.
fn print_warnings(warnings: &[MacroWarning]) {
    for warning in warnings {
        eprintln!("  {} {warning}", "warning:".yellow());
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
