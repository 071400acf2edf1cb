//! Fotonom CLI - Analyze photos with vision AI and rename them deterministically.
//!
//! Fotonom classifies each photo into a German (location, scene) pair via
//! external vision providers and derives a collision-free file name like
//! `Strand_sonnig_007.jpg`.
//!
//! # Usage
//!
//! ```bash
//! # Analyze a single photo
//! fotonom process image.jpg
//!
//! # Analyze a directory
//! fotonom process ./photos/ --rename
//!
//! # View configuration
//! fotonom config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Fotonom - classify photos and generate deterministic file names.
#[derive(Parser, Debug)]
#[command(name = "fotonom")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze photos and compute their final names
    Process(cli::process::ProcessArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI verbose override.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match fotonom_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `fotonom config path`."
            );
            fotonom_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Fotonom v{}", fotonom_core::VERSION);

    match cli.command {
        Commands::Process(args) => cli::process::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, config),
    }
}
