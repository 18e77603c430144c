//! Chunk table → embeddings → vector store.

use narrative_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::time::Instant;

use crate::embeddings::{embed_in_batches, EmbeddingProvider};
use crate::types::Chunk;
use crate::vector_store::{VectorRecord, VectorStore};

/// Counts from an indexing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSummary {
    /// Chunks sent to the embedding provider
    pub chunks_embedded: u64,

    /// Records that were new or changed in the store
    pub records_changed: u64,

    /// Stale chunks of re-indexed sources dropped from the store
    pub records_removed: u64,

    /// Provider calls made
    pub batches: u64,

    /// Wall-clock duration in seconds
    pub elapsed_secs: f64,
}

/// SHA-256 of `text` as lowercase hex.
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Embed chunks in emission order and upsert them into `store`.
///
/// Each batch of `batch_size` chunks is embedded, zipped positionally with
/// its chunk ids and metadata, and written before the next batch starts.
/// Afterwards every stored chunk of a source present in `chunks` whose id
/// is not in `chunks` is removed, so a source re-chunked into fewer pieces
/// leaves no stale ids behind.
pub async fn index_chunks(
    chunks: &[Chunk],
    provider: &dyn EmbeddingProvider,
    store: &mut dyn VectorStore,
    batch_size: usize,
) -> AppResult<IndexSummary> {
    if batch_size == 0 {
        return Err(AppError::Config(
            "batch_size must be greater than zero".to_string(),
        ));
    }

    let start = Instant::now();
    let mut records_changed = 0u64;
    let mut batches = 0u64;

    tracing::info!(
        chunks = chunks.len(),
        batch_size,
        provider = provider.provider_name(),
        "Indexing chunks"
    );

    for batch in chunks.chunks(batch_size) {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let vectors = embed_in_batches(provider, &texts, batch_size).await?;

        let records: Vec<VectorRecord> = batch
            .iter()
            .zip(vectors)
            .map(|(chunk, vector)| VectorRecord {
                id: chunk.chunk_id.clone(),
                vector,
                metadata: chunk.metadata(),
                content_hash: content_hash(&chunk.text),
            })
            .collect();

        records_changed += store.upsert(&records)? as u64;
        batches += 1;
    }

    let sources: HashSet<&str> = chunks.iter().map(|c| c.source_id.as_str()).collect();
    let current: HashSet<&str> = chunks.iter().map(|c| c.chunk_id.as_str()).collect();
    let records_removed = store.retain(&|record| {
        !sources.contains(record.metadata.source_id.as_str()) || current.contains(record.id.as_str())
    })? as u64;
    if records_removed > 0 {
        tracing::debug!(records_removed, "Dropped stale chunks");
    }

    store.flush()?;

    let summary = IndexSummary {
        chunks_embedded: chunks.len() as u64,
        records_changed,
        records_removed,
        batches,
        elapsed_secs: start.elapsed().as_secs_f64(),
    };

    tracing::info!(
        chunks_embedded = summary.chunks_embedded,
        records_changed = summary.records_changed,
        records_removed = summary.records_removed,
        batches = summary.batches,
        "Indexing finished"
    );

    Ok(summary)
}
