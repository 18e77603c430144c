//! Preprocess command handler.

use clap::Args;
use narrative_chunking::source::{read_raw_complaints, write_jsonl};
use narrative_core::{config::AppConfig, AppResult};
use std::path::PathBuf;

/// Filter raw complaints to the target products and clean their narratives
#[derive(Args, Debug)]
pub struct PreprocessCommand {
    /// Raw complaint table (JSON Lines file or directory)
    pub input: PathBuf,

    /// Where to write the cleaned records
    pub output: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl PreprocessCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let input = super::resolve(config, &self.input);
        let output = super::resolve(config, &self.output);
        tracing::info!("Executing preprocess command on {:?}", input);

        let raws = read_raw_complaints(&input)?;
        let (records, summary) = narrative_chunking::preprocess(raws);
        write_jsonl(&output, &records)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!(
                "Kept {} of {} rows ({} outside target products, {} without narrative)",
                summary.records_kept, summary.rows_read, summary.rows_filtered, summary.empty_narratives
            );
            println!("Wrote {:?}", output);
        }

        Ok(())
    }
}
