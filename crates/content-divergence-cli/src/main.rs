//! Content Divergence CLI
//!
//! Runs a content divergence analysis over a directory of text corpora.
//!
//! # Commands
//!
//! - `analyze`: Compute KL and generalized divergence matrices and write
//!   `kl_divergence.json`, `generalized_divergence.json` and `report.json`
//!
//! Exit code 1 on error.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod corpus_store;

/// Content Divergence - information-theoretic distances between text corpora
#[derive(Parser)]
#[command(name = "content-divergence")]
#[command(version)]
#[command(about = "Pairwise KL and cross-compression divergence between text corpora")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze every `*.txt` corpus in a directory
    ///
    /// Each file is one corpus; its id is the file stem, e.g.
    /// `animal_lion.txt` becomes `animal_lion` in category `animal`.
    Analyze(commands::analyze::AnalyzeArgs),
}

fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match cli.command {
        Commands::Analyze(args) => commands::analyze::handle_analyze(args),
    };

    std::process::exit(exit_code);
}
