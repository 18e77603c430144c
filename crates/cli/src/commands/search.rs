//! Search command handler.

use clap::Args;
use narrative_chunking::{create_provider, MemoryVectorStore, VectorStore};
use narrative_core::{config::AppConfig, AppResult};
use std::path::PathBuf;

/// Query a vector store for the chunks closest to a text
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Vector store snapshot written by `index`
    pub store: PathBuf,

    /// Query text
    pub query: String,

    /// Number of chunks to retrieve
    #[arg(short = 'k', long, default_value = "5")]
    pub top_k: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let store_path = super::resolve(config, &self.store);
        tracing::info!("Executing search command against {:?}", store_path);

        let store = MemoryVectorStore::load(&store_path)?;
        let provider = create_provider(&config.embedding)?;

        let query = provider.embed(&self.query).await?;
        let hits = store.search(&query, self.top_k)?;

        tracing::debug!(hits = hits.len(), "Search finished");

        if self.json {
            println!("{}", serde_json::to_string_pretty(&hits)?);
        } else if hits.is_empty() {
            println!("No matching chunks");
        } else {
            for hit in &hits {
                println!(
                    "{:.3}  {}  (complaint {}, {})",
                    hit.score, hit.metadata.chunk_id, hit.metadata.source_id, hit.metadata.category
                );
            }
        }

        Ok(())
    }
}
