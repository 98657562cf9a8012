//! incgraph CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod host;

#[derive(Parser)]
#[command(name = "incgraph")]
#[command(about = "Build a header include graph from compiler include traces", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Project root holding the graph cache and incgraph.toml (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    root: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a captured include trace of one source file into the graph
    Trace {
        /// The compiled source file
        file: PathBuf,

        /// Captured compiler output, `-` for stdin
        #[arg(short, long)]
        transcript: PathBuf,

        /// Include search directory, highest priority first
        #[arg(short = 'I', long = "include-dir")]
        include_dirs: Vec<PathBuf>,
    },
    /// Print the include tree of a file
    Show {
        file: PathBuf,
    },
    /// Print graph statistics
    Stats,
    /// Clear the cache
    Clear,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "incgraph={0},incgraph_core={0},incgraph_trace={0}",
            log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("incgraph v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Project root: {}", cli.root.display());

    match cli.command {
        Commands::Trace { file, transcript, include_dirs } => {
            commands::trace(cli.root, file, transcript, include_dirs).await
        }
        Commands::Show { file } => {
            commands::show(cli.root, file)
        }
        Commands::Stats => {
            commands::stats(cli.root)
        }
        Commands::Clear => {
            commands::clear(cli.root)
        }
        Commands::Version => {
            println!("incgraph v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
