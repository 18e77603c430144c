//! Chunking type definitions.

use narrative_core::{config::validate_chunking, AppResult};
use serde::{Deserialize, Deserializer, Serialize};

use crate::boundary::word_count;

/// Validated chunk budget and overlap.
///
/// Construction is the only way to obtain settings, so every splitter and
/// assembler works with `0 <= chunk_overlap < chunk_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChunkSettings {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl ChunkSettings {
    /// Create settings, failing with `AppError::Config` on an invalid pair.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> AppResult<Self> {
        validate_chunking(chunk_size, chunk_overlap)?;
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    /// Target word budget per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Overlap between adjacent chunks.
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Word advance between consecutive windows; always positive.
    pub fn stride(&self) -> usize {
        self.chunk_size - self.chunk_overlap
    }

    /// Records with fewer words than this are emitted as a single chunk.
    pub fn split_threshold(&self) -> usize {
        self.chunk_size / 2
    }
}

impl Default for ChunkSettings {
    fn default() -> Self {
        Self {
            chunk_size: narrative_core::config::DEFAULT_CHUNK_SIZE,
            chunk_overlap: narrative_core::config::DEFAULT_CHUNK_OVERLAP,
        }
    }
}

/// One input narrative with its identifier and category label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Record identifier (complaint id)
    #[serde(
        alias = "complaint_id",
        alias = "Complaint ID",
        deserialize_with = "id_from_string_or_number"
    )]
    pub id: String,

    /// Category label (product)
    #[serde(alias = "product", alias = "Product", default)]
    pub category: String,

    /// Narrative text; missing or null values are skipped by the assembler
    #[serde(alias = "clean_narrative", default)]
    pub narrative: Option<String>,

    /// Word count reported by the upstream loader
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
}

impl SourceRecord {
    /// Create a record, computing its word count.
    pub fn new(id: impl Into<String>, category: impl Into<String>, narrative: impl Into<String>) -> Self {
        let narrative = narrative.into();
        let word_count = Some(word_count(&narrative));
        Self {
            id: id.into(),
            category: category.into(),
            narrative: Some(narrative),
            word_count,
        }
    }

    /// Narrative text if present and not blank.
    pub fn usable_narrative(&self) -> Option<&str> {
        self.narrative
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

/// A bounded-size fragment of a source narrative with traceability metadata.
///
/// Serialized as one row of the output chunk table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk text content
    pub text: String,

    /// Originating record id
    #[serde(rename = "complaint_id")]
    pub source_id: String,

    /// Category label of the originating record
    #[serde(rename = "product")]
    pub category: String,

    /// Emission order within the source (0-indexed)
    pub sequence_index: usize,

    /// `sequence_index * (chunk_size - chunk_overlap)`; a true word offset
    /// only for word-window splits
    #[serde(rename = "start_index")]
    pub start_offset: usize,

    /// `"{source_id}_{sequence_index}"`
    pub chunk_id: String,
}

impl Chunk {
    /// Build a chunk, deriving its id from the source id and sequence index.
    pub fn new(
        text: String,
        source_id: &str,
        category: &str,
        sequence_index: usize,
        start_offset: usize,
    ) -> Self {
        Self {
            chunk_id: chunk_id(source_id, sequence_index),
            text,
            source_id: source_id.to_string(),
            category: category.to_string(),
            sequence_index,
            start_offset,
        }
    }

    /// Metadata attached to the chunk's vector.
    pub fn metadata(&self) -> ChunkMetadata {
        ChunkMetadata {
            source_id: self.source_id.clone(),
            category: self.category.clone(),
            chunk_id: self.chunk_id.clone(),
        }
    }
}

/// Traceability metadata stored alongside each vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    #[serde(rename = "complaint_id")]
    pub source_id: String,
    #[serde(rename = "product")]
    pub category: String,
    pub chunk_id: String,
}

/// Deterministic chunk identifier.
pub fn chunk_id(source_id: &str, sequence_index: usize) -> String {
    format!("{}_{}", source_id, sequence_index)
}

pub(crate) fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "record id must be a string or number, got {}",
            other
        ))),
    }
}
