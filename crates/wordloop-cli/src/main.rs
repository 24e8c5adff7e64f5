//! wordloop CLI: picture-matching vocabulary drill in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wordloop_core::model::Language;

mod commands;

#[derive(Parser)]
#[command(name = "wordloop", version, about = "Mastery-based vocabulary drill")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive drill session
    Play {
        /// Language code (de, ja, es, en)
        #[arg(long)]
        language: Option<Language>,

        /// Word package directory (defaults to the language's package under packages_dir)
        #[arg(long)]
        package: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Seed for a reproducible session
        #[arg(long)]
        seed: Option<u64>,

        /// Skip all audio
        #[arg(long)]
        silent: bool,
    },

    /// Show the words, images and skipped rows of a package
    Inspect {
        /// Word package directory
        #[arg(long)]
        package: PathBuf,

        /// Language used to normalize words
        #[arg(long, default_value = "de")]
        language: Language,
    },

    /// List supported languages
    Languages,

    /// Create a starter wordloop.toml
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wordloop=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            language,
            package,
            config,
            seed,
            silent,
        } => commands::play::execute(language, package, config, seed, silent).await,
        Commands::Inspect { package, language } => commands::inspect::execute(package, language),
        Commands::Languages => commands::languages::execute(),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
