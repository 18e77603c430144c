//! Narrative CLI
//!
//! Main entry point for the narrative command-line tool.
//! Cleans complaint tables and turns their narratives into searchable chunks.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::{ChunkCommand, IndexCommand, PreprocessCommand, SearchCommand};
use narrative_core::{config::AppConfig, logging};
use std::path::PathBuf;

/// Narrative CLI - chunk complaint narratives for retrieval
#[derive(Parser, Debug)]
#[command(name = "narrative")]
#[command(about = "Chunk complaint narratives for retrieval", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "NARRATIVE_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "NARRATIVE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Maximum words per chunk
    #[arg(long, global = true)]
    chunk_size: Option<usize>,

    /// Overlap between consecutive chunks
    #[arg(long, global = true)]
    chunk_overlap: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Filter and clean a raw complaint table
    Preprocess(PreprocessCommand),

    /// Split narratives into chunks
    Chunk(ChunkCommand),

    /// Embed chunks into a vector store
    Index(IndexCommand),

    /// Query a vector store
    Search(SearchCommand),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Preprocess(_) => "preprocess",
            Commands::Chunk(_) => "chunk",
            Commands::Index(_) => "index",
            Commands::Search(_) => "search",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Workspace and config file select the YAML to merge
    let config = AppConfig::load_with(cli.workspace, cli.config)
        .context("failed to load configuration")?;

    let config = config.with_overrides(
        cli.chunk_size,
        cli.chunk_overlap,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color, config.log_format)?;

    // Invalid sizes abort before any input is read
    config.validate().context("invalid configuration")?;

    tracing::info!("Narrative CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!(
        chunk_size = config.chunk_size,
        chunk_overlap = config.chunk_overlap,
        batch_size = config.batch_size,
        "Chunking settings"
    );

    let _span = tracing::info_span!("command", name = cli.command.name()).entered();

    let result = match cli.command {
        Commands::Preprocess(cmd) => cmd.execute(&config).await,
        Commands::Chunk(cmd) => cmd.execute(&config).await,
        Commands::Index(cmd) => cmd.execute(&config).await,
        Commands::Search(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    Ok(result?)
}
