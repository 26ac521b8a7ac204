//! CLI frontend for the Unfold hypertext narrative engine.

mod commands;
mod render;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "unfold",
    about = "Unfold: read and check hypertext stories in the terminal",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a story interactively
    Play {
        /// Story file (JSON)
        story: PathBuf,

        /// Section to start from instead of the story's start section
        #[arg(short, long)]
        start: Option<String>,

        /// Start with the history region hidden
        #[arg(long)]
        hide_history: bool,

        /// Write the history log as JSON here on exit
        #[arg(short, long)]
        transcript: Option<PathBuf>,
    },

    /// Expand every section and report errors and warnings
    Check {
        /// Story file (JSON)
        story: PathBuf,
    },

    /// Print the expanded markup of one section
    Expand {
        /// Story file (JSON)
        story: PathBuf,

        /// Section id
        section: String,
    },

    /// List the sections of a story
    Sections {
        /// Story file (JSON)
        story: PathBuf,
    },

    /// Write a sample story to start from
    Init {
        /// Path of the story file to create
        path: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::ERROR };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Play {
            story,
            start,
            hide_history,
            transcript,
        } => commands::play::run(&story, start.as_deref(), hide_history, transcript.as_deref()),
        Commands::Check { story } => commands::check::run(&story),
        Commands::Expand { story, section } => commands::expand::run(&story, &section),
        Commands::Sections { story } => commands::sections::run(&story),
        Commands::Init { path } => commands::init::run(&path),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
