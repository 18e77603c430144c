//! Vector store contract and an in-memory implementation.
//!
//! Stores `(id, vector, metadata)` triples. Metadata always carries
//! `source_id`, `category` and `chunk_id`, so search hits trace back to their
//! record without a join against the chunk table.

use narrative_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::types::ChunkMetadata;

/// One stored vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Chunk id
    pub id: String,

    /// Embedding vector
    pub vector: Vec<f32>,

    /// Traceability metadata
    pub metadata: ChunkMetadata,

    /// SHA-256 of the embedded text
    pub content_hash: String,
}

/// A search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub metadata: ChunkMetadata,
}

/// Trait for vector store backends.
pub trait VectorStore: Send + Sync {
    /// Insert or replace records by id.
    ///
    /// Returns how many records were new or had different content.
    fn upsert(&mut self, records: &[VectorRecord]) -> AppResult<usize>;

    /// Top-k records by descending cosine similarity to `query`.
    fn search(&self, query: &[f32], top_k: usize) -> AppResult<Vec<SearchHit>>;

    /// Number of stored records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every record.
    fn reset(&mut self) -> AppResult<()>;

    /// Drop records for which `keep` returns false.
    ///
    /// Returns how many records were removed.
    fn retain(&mut self, keep: &dyn Fn(&VectorRecord) -> bool) -> AppResult<usize>;

    /// Commit pending writes (for backends that buffer).
    fn flush(&mut self) -> AppResult<()> {
        Ok(())
    }
}

/// Vectors held in memory, with an optional JSON snapshot on disk.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MemoryVectorStore {
    dimensions: Option<usize>,
    records: Vec<VectorRecord>,
    #[serde(skip)]
    positions: HashMap<String, usize>,
}

impl MemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot written by `save`.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Store(format!("Failed to read store {:?}: {}", path, e)))?;
        let mut store: Self = serde_json::from_str(&content)
            .map_err(|e| AppError::Store(format!("Failed to parse store {:?}: {}", path, e)))?;

        store.positions = store
            .records
            .iter()
            .enumerate()
            .map(|(pos, record)| (record.id.clone(), pos))
            .collect();

        tracing::debug!("Loaded {} vectors from {:?}", store.records.len(), path);
        Ok(store)
    }

    /// Write the store as a JSON snapshot.
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_vec(self)?)?;
        tracing::info!("Persisted {} vectors to {:?}", self.records.len(), path);
        Ok(())
    }

    /// Stored record by chunk id.
    pub fn get(&self, id: &str) -> Option<&VectorRecord> {
        self.positions.get(id).map(|&pos| &self.records[pos])
    }

    fn check_dimensions(&self, len: usize) -> AppResult<()> {
        match self.dimensions {
            Some(dims) if dims != len => Err(AppError::Store(format!(
                "Dimension mismatch: store holds {}-dimensional vectors, got {}",
                dims, len
            ))),
            _ => Ok(()),
        }
    }
}

impl VectorStore for MemoryVectorStore {
    fn upsert(&mut self, records: &[VectorRecord]) -> AppResult<usize> {
        let mut changed = 0;

        for record in records {
            self.check_dimensions(record.vector.len())?;
            self.dimensions = Some(record.vector.len());

            match self.positions.get(&record.id) {
                Some(&pos) => {
                    if self.records[pos].content_hash != record.content_hash {
                        changed += 1;
                    }
                    self.records[pos] = record.clone();
                }
                None => {
                    self.positions.insert(record.id.clone(), self.records.len());
                    self.records.push(record.clone());
                    changed += 1;
                }
            }
        }

        Ok(changed)
    }

    fn search(&self, query: &[f32], top_k: usize) -> AppResult<Vec<SearchHit>> {
        self.check_dimensions(query.len())?;

        let mut hits: Vec<SearchHit> = self
            .records
            .iter()
            .map(|record| SearchHit {
                id: record.id.clone(),
                score: cosine_similarity(query, &record.vector),
                metadata: record.metadata.clone(),
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        hits.truncate(top_k);
        Ok(hits)
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn reset(&mut self) -> AppResult<()> {
        self.records.clear();
        self.positions.clear();
        self.dimensions = None;
        Ok(())
    }

    fn retain(&mut self, keep: &dyn Fn(&VectorRecord) -> bool) -> AppResult<usize> {
        let before = self.records.len();
        self.records.retain(|record| keep(record));
        self.positions = self
            .records
            .iter()
            .enumerate()
            .map(|(pos, record)| (record.id.clone(), pos))
            .collect();
        Ok(before - self.records.len())
    }
}

/// Cosine similarity; zero when either vector has zero length.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(id: &str, vector: Vec<f32>, hash: &str) -> VectorRecord {
        let (source_id, _) = id.split_once('_').unwrap();
        VectorRecord {
            id: id.to_string(),
            vector,
            metadata: ChunkMetadata {
                source_id: source_id.to_string(),
                category: "Credit Card".to_string(),
                chunk_id: id.to_string(),
            },
            content_hash: hash.to_string(),
        }
    }

    #[test]
    fn test_upsert_and_search() {
        let mut store = MemoryVectorStore::new();
        let changed = store
            .upsert(&[
                record("1_0", vec![1.0, 0.0], "a"),
                record("1_1", vec![0.0, 1.0], "b"),
                record("2_0", vec![0.7, 0.7], "c"),
            ])
            .unwrap();
        assert_eq!(changed, 3);

        let hits = store.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "1_0");
        assert_eq!(hits[0].metadata.source_id, "1");
        assert_eq!(hits[1].id, "2_0");
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let mut store = MemoryVectorStore::new();
        store.upsert(&[record("1_0", vec![1.0, 0.0], "a")]).unwrap();

        assert_eq!(store.upsert(&[record("1_0", vec![1.0, 0.0], "a")]).unwrap(), 0);
        assert_eq!(store.upsert(&[record("1_0", vec![0.0, 1.0], "b")]).unwrap(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("1_0").unwrap().vector, vec![0.0, 1.0]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut store = MemoryVectorStore::new();
        store.upsert(&[record("1_0", vec![1.0, 0.0], "a")]).unwrap();

        assert!(matches!(
            store.upsert(&[record("1_1", vec![1.0], "b")]),
            Err(AppError::Store(_))
        ));
        assert!(store.search(&[1.0, 0.0, 0.0], 1).is_err());
    }

    #[test]
    fn test_reset() {
        let mut store = MemoryVectorStore::new();
        store.upsert(&[record("1_0", vec![1.0, 0.0], "a")]).unwrap();
        store.reset().unwrap();
        assert!(store.is_empty());
        assert!(store.upsert(&[record("1_0", vec![1.0], "a")]).is_ok());
    }

    #[test]
    fn test_retain_reindexes_positions() {
        let mut store = MemoryVectorStore::new();
        store
            .upsert(&[
                record("1_0", vec![1.0, 0.0], "a"),
                record("1_1", vec![0.0, 1.0], "b"),
                record("2_0", vec![0.7, 0.7], "c"),
            ])
            .unwrap();

        let removed = store.retain(&|r| r.id != "1_1").unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 2);
        assert!(store.get("1_1").is_none());
        assert_eq!(store.get("2_0").unwrap().content_hash, "c");
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("store").join("vectors.json");

        let mut store = MemoryVectorStore::new();
        store
            .upsert(&[record("5_0", vec![0.6, 0.8], "x"), record("5_1", vec![0.8, 0.6], "y")])
            .unwrap();
        store.save(&path).unwrap();

        let loaded = MemoryVectorStore::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("5_1").unwrap().content_hash, "y");
        assert_eq!(loaded.search(&[0.8, 0.6], 1).unwrap()[0].id, "5_1");
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 1.0], &[2.0, 2.0]) - 1.0).abs() < 1e-6);
    }
}
