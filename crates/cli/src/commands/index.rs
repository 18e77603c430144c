//! Index command handler.

use clap::Args;
use narrative_chunking::source::read_chunks;
use narrative_chunking::{create_provider, index_chunks, MemoryVectorStore, VectorStore};
use narrative_core::{config::AppConfig, AppResult};
use std::path::{Path, PathBuf};

/// Embed a chunk table and upsert it into a vector store
#[derive(Args, Debug)]
pub struct IndexCommand {
    /// Chunk table written by `chunk`
    pub chunks: PathBuf,

    /// Vector store snapshot (rebuilt unless --incremental)
    pub store: PathBuf,

    /// Chunks per embedding call (overrides config)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Keep the existing store and update it in place
    #[arg(long)]
    pub incremental: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IndexCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let chunks_path = super::resolve(config, &self.chunks);
        let store_path = super::resolve(config, &self.store);
        let batch_size = self.batch_size.unwrap_or(config.batch_size);
        tracing::info!("Executing index command into {:?}", store_path);

        let chunks = read_chunks(&chunks_path)?;
        let provider = create_provider(&config.embedding)?;

        let mut store = open_store(&store_path, self.incremental)?;

        let summary = index_chunks(&chunks, provider.as_ref(), &mut store, batch_size).await?;
        store.save(&store_path)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!(
                "Embedded {} chunks in {} batches ({} new or changed, {} stale removed) in {:.2}s",
                summary.chunks_embedded,
                summary.batches,
                summary.records_changed,
                summary.records_removed,
                summary.elapsed_secs
            );
            println!("Store {:?} holds {} vectors", store_path, store.len());
        }

        Ok(())
    }
}

/// The store a run writes into: a fresh one by default, or the existing
/// snapshot when indexing incrementally.
fn open_store(path: &Path, incremental: bool) -> AppResult<MemoryVectorStore> {
    if incremental && path.exists() {
        return MemoryVectorStore::load(path);
    }
    if path.exists() {
        tracing::info!("Replacing vector store {:?}", path);
    }
    Ok(MemoryVectorStore::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use narrative_chunking::{ChunkMetadata, VectorRecord};
    use tempfile::TempDir;

    fn saved_store(path: &Path) {
        let mut store = MemoryVectorStore::new();
        store
            .upsert(&[VectorRecord {
                id: "123_5".to_string(),
                vector: vec![1.0, 0.0],
                metadata: ChunkMetadata {
                    source_id: "123".to_string(),
                    category: "Credit Card".to_string(),
                    chunk_id: "123_5".to_string(),
                },
                content_hash: "old".to_string(),
            }])
            .unwrap();
        store.save(path).unwrap();
    }

    #[test]
    fn test_default_run_replaces_store() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("vectors.json");
        saved_store(&path);

        let store = open_store(&path, false).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_incremental_run_keeps_store() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("vectors.json");
        saved_store(&path);

        let store = open_store(&path, true).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get("123_5").is_some());
    }

    #[test]
    fn test_incremental_without_snapshot_starts_empty() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp.path().join("missing.json"), true).unwrap();
        assert!(store.is_empty());
    }
}
