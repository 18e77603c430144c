//! Chunk command handler.

use clap::Args;
use narrative_chunking::source::{read_records, write_jsonl};
use narrative_chunking::{ChunkAssembler, ProgressEvent, RunReporter};
use narrative_core::{config::AppConfig, AppResult};
use std::path::PathBuf;
use std::sync::Arc;

/// Split narratives into overlapping, budget-bounded chunks
#[derive(Args, Debug)]
pub struct ChunkCommand {
    /// Source records (JSON Lines file or directory)
    pub input: PathBuf,

    /// Where to write the chunk table
    pub output: PathBuf,

    /// Chunk records across all cores
    #[arg(long)]
    pub parallel: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ChunkCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let input = super::resolve(config, &self.input);
        let output = super::resolve(config, &self.output);
        tracing::info!("Executing chunk command on {:?}", input);

        let assembler = ChunkAssembler::from_sizes(config.chunk_size, config.chunk_overlap)?;
        let records = read_records(&input)?;

        let mut reporter = RunReporter::new(Arc::new(|event: ProgressEvent| {
            tracing::debug!("{}", event.format_simple());
        }));

        let chunks = if self.parallel {
            assembler.assemble_parallel(&records, &mut reporter)
        } else {
            assembler.assemble(&records, &mut reporter)
        };
        let summary = reporter.finish();

        write_jsonl(&output, &chunks)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!(
                "Created {} chunks from {} records ({} skipped) in {:.2}s",
                summary.chunks_produced,
                summary.records_read,
                summary.records_skipped,
                summary.elapsed_secs
            );
            println!("Wrote {:?}", output);
        }

        Ok(())
    }
}
