//! Terminal front end for the Choosing Tomorrow story.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ct_story::ResumePolicy;
use ct_story::persist::DEFAULT_SAVE_FILE;

use commands::summary::Format;

#[derive(Parser)]
#[command(
    name = "ct",
    about = "Choosing Tomorrow — a short choice-driven story about exam day",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log more (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the story in the terminal
    Play {
        /// Save file used by the `save` and `load` commands
        #[arg(short, long, default_value = DEFAULT_SAVE_FILE)]
        save: PathBuf,

        /// Resume from the save file instead of starting fresh
        #[arg(short, long)]
        resume: bool,

        /// Where a loaded save resumes: recorded, start
        #[arg(long, default_value = "recorded")]
        resume_policy: ResumePolicy,

        /// Skip every pause (visions, typewriter)
        #[arg(short, long)]
        fast: bool,

        /// Print narration one character at a time
        #[arg(short, long)]
        typewriter: bool,

        /// Write a summary here when an ending is reached
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Summary format: markdown, text, json
        #[arg(long, default_value = "markdown")]
        format: Format,
    },

    /// Validate the scene graph
    Check,

    /// List scenes, or show one scene's choices
    Scenes {
        /// Scene to show (e.g. wake, miaMeet, finalTest)
        scene: Option<String>,
    },

    /// List the endings and the rules that select them
    Endings,

    /// Print a summary of a saved run
    Summary {
        /// Save file to read
        #[arg(short, long, default_value = DEFAULT_SAVE_FILE)]
        save: PathBuf,

        /// Output format: markdown, text, json
        #[arg(long, default_value = "markdown")]
        format: Format,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Play {
            save,
            resume,
            resume_policy,
            fast,
            typewriter,
            export,
            format,
        } => commands::play::run(commands::play::PlayArgs {
            save,
            resume,
            resume_policy,
            fast,
            typewriter,
            export,
            format,
        }),
        Commands::Check => commands::check::run(),
        Commands::Scenes { scene } => commands::scenes::run(scene.as_deref()),
        Commands::Endings => commands::endings::run(),
        Commands::Summary { save, format } => commands::summary::run(&save, format),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
