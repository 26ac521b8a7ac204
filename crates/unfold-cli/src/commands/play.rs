//! Interactive terminal reader.

use std::cell::Cell;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::rc::Rc;

use colored::Colorize;
use unfold_core::{Callables, ContentTree, Context, SectionStore, Story, Variables, markup};
use unfold_engine::{DisplaySurface, EngineError, Session, render_expand_error};

use crate::render::render;

const HELP: &str = "  <n>              follow link n
  :goto <section>  jump to a section
  :back            return to the section read last
  :history [on|off] show or toggle the history log
  :set <name> <value> set a variable
  :unset <name>    remove a variable
  :vars            list variables
  :quit            leave";

/// A surface that prints the current section and keeps history off screen
/// until asked for.
struct TerminalSurface {
    disabled_class: String,
    history: Vec<String>,
    history_visible: bool,
}

impl TerminalSurface {
    fn new(disabled_class: String) -> Self {
        Self {
            disabled_class,
            history: Vec::new(),
            history_visible: true,
        }
    }

    fn print_history(&self) {
        if !self.history_visible {
            println!("  History is hidden. Use :history on to show it.");
            return;
        }
        if self.history.is_empty() {
            println!("  Nothing read yet.");
            return;
        }
        for text in &self.history {
            println!("{}\n", text.dimmed());
        }
    }
}

impl DisplaySurface for TerminalSurface {
    fn mount_current(&mut self, content: &ContentTree) {
        println!("\n{}", render(content, &self.disabled_class));
    }

    fn patch_current(&mut self, content: &ContentTree) {
        println!("\n{}", render(content, &self.disabled_class));
    }

    // New output always lands at the bottom of a terminal.
    fn reset_current_scroll(&mut self) {}

    fn append_history(&mut self, markup: &str) {
        let tree = markup::parse(markup);
        self.history.push(render(&tree, &self.disabled_class));
    }

    fn scroll_history_to_end(&mut self) {}

    fn set_history_visible(&mut self, visible: bool) {
        self.history_visible = visible;
    }
}

enum Flow {
    Continue,
    Quit,
}

struct Reader {
    story: Story,
    callables: Callables,
    variables: Variables,
    turns: Rc<Cell<usize>>,
    session: Session,
    surface: TerminalSurface,
}

impl Reader {
    fn new(story: Story, hide_history: bool) -> Self {
        let mut config = story.config.clone();
        if hide_history {
            config = config.with_show_history(false);
        }
        let turns = Rc::new(Cell::new(0));
        let mut session = Session::new(config);
        let mut surface = TerminalSurface::new(session.config().disabled_link_class.clone());
        let show_history = session.history_visible();
        session.set_history_visible(&mut surface, show_history);

        Self {
            callables: super::builtin_callables(Rc::clone(&turns)),
            variables: super::story_variables(&story),
            story,
            turns,
            session,
            surface,
        }
    }

    /// Sections displayed so far, the current one included.
    fn sync_turns(&self) {
        let displayed =
            self.session.history().len() + usize::from(self.session.current_section_id().is_some());
        self.turns.set(displayed);
    }

    fn goto(&mut self, id: &str) -> Result<(), EngineError> {
        let ctx = Context::new(&self.story, &self.callables, &self.variables);
        let warnings = self.session.goto_section(&ctx, &mut self.surface, id)?;
        super::print_warnings(&warnings);
        self.sync_turns();
        Ok(())
    }

    fn follow(&mut self, n: usize) -> Result<(), String> {
        let node = n
            .checked_sub(1)
            .and_then(|i| self.session.live_links().get(i))
            .map(|link| link.node)
            .ok_or_else(|| format!("no link [{n}]"))?;
        let ctx = Context::new(&self.story, &self.callables, &self.variables);
        let warnings = self
            .session
            .activate_link(&ctx, &mut self.surface, node)
            .map_err(|e| self.describe(e))?;
        super::print_warnings(&warnings);
        self.sync_turns();
        Ok(())
    }

    /// Turn an engine error into a message, rendering expansion errors.
    fn describe(&self, error: EngineError) -> String {
        if let EngineError::Expand(e) = &error {
            if let Some(source) = self.story.section(e.section()) {
                eprint!("{}", render_expand_error(e.section(), source, e));
            }
        }
        error.to_string()
    }

    fn execute(&mut self, input: &str) -> Result<Flow, String> {
        if let Ok(n) = input.parse::<usize>() {
            self.follow(n)?;
            return Ok(Flow::Continue);
        }

        let (command, rest) = input.split_once(' ').unwrap_or((input, ""));
        let rest = rest.trim();
        match command {
            ":quit" | ":q" => return Ok(Flow::Quit),
            ":help" | ":h" => println!("{HELP}"),
            ":goto" if !rest.is_empty() => self.goto(rest).map_err(|e| self.describe(e))?,
            ":back" => {
                let previous = self
                    .session
                    .history()
                    .last()
                    .map(|entry| entry.section.clone())
                    .ok_or("nothing to go back to")?;
                self.goto(&previous).map_err(|e| self.describe(e))?;
            }
            ":history" => match rest {
                "" => self.surface.print_history(),
                "on" => self.session.set_history_visible(&mut self.surface, true),
                "off" => self.session.set_history_visible(&mut self.surface, false),
                other => return Err(format!("expected on or off, got '{other}'")),
            },
            ":set" => {
                let (name, value) = rest
                    .split_once(' ')
                    .ok_or("usage: :set <name> <value>")?;
                self.variables.set(name, value.trim());
            }
            ":unset" if !rest.is_empty() => {
                if self.variables.remove(rest).is_none() {
                    return Err(format!("no variable '{rest}'"));
                }
            }
            ":vars" => {
                if self.variables.is_empty() {
                    println!("  No variables.");
                }
                for (name, value) in self.variables.iter() {
                    println!("  {} = {value}", name.bold());
                }
            }
            _ => return Err(format!("unknown command '{input}', try :help")),
        }
        Ok(Flow::Continue)
    }
}

pub fn run(
    path: &Path,
    start: Option<&str>,
    hide_history: bool,
    transcript: Option<&Path>,
) -> Result<(), String> {
    let story = super::load_story(path)?;
    let start = start.unwrap_or(&story.start).to_string();

    println!("  {} {}", "Reading".bold(), story.title);
    println!("  Type a link number to follow it, :help for commands.");

    let mut reader = Reader::new(story, hide_history);
    reader.goto(&start).map_err(|e| reader.describe(e))?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();

    loop {
        if reader.session.live_links().is_empty() {
            println!("  {}", "(no links here)".dimmed());
        }
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let command = line.trim();
        if command.is_empty() {
            continue;
        }

        match reader.execute(command) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => println!("{}", e.yellow()),
        }
    }

    if let Some(path) = transcript {
        let json = reader
            .session
            .history()
            .to_json()
            .map_err(|e| format!("cannot serialize history: {e}"))?;
        fs::write(path, json).map_err(|e| format!("cannot write {}: {e}", path.display()))?;
    }

    Ok(())
}
