//! Hashed trigram embeddings for offline indexing and tests.

use narrative_core::{AppError, AppResult};
use std::collections::BTreeMap;

use super::provider::EmbeddingProvider;

const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were", "for", "to", "of",
    "in", "and", "or", "but", "with", "by", "from", "this", "that", "be", "have", "has", "had",
    "it", "its", "their", "they", "them", "my", "me", "i",
];

/// Deterministic, content-dependent embeddings without a model.
///
/// Each distinct term contributes its character trigrams (weighted by the
/// square root of the term frequency) and itself (weighted by frequency) to
/// hashed buckets. The result is scaled to unit length; text with no usable
/// terms maps to the zero vector. Vectors carry no semantic guarantees.
#[derive(Debug)]
pub struct TrigramProvider {
    dimensions: usize,
    model: String,
}

impl TrigramProvider {
    /// Create a provider producing `dimensions`-long vectors.
    ///
    /// Fails with `AppError::Config` when `dimensions` is zero.
    pub fn new(dimensions: usize, model: impl Into<String>) -> AppResult<Self> {
        if dimensions == 0 {
            return Err(AppError::Config(
                "embedding dimensions must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            dimensions,
            model: model.into(),
        })
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        for (term, freq) in term_frequencies(text) {
            let freq = freq as f32;
            let chars: Vec<char> = term.chars().collect();
            for trigram in chars.windows(3) {
                vector[self.bucket(trigram.iter().copied())] += freq.sqrt();
            }
            vector[self.bucket(term.chars())] += freq;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }

    /// FNV-1a over the UTF-8 bytes of `chars`, reduced to a dimension index.
    fn bucket(&self, chars: impl Iterator<Item = char>) -> usize {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        let mut buf = [0u8; 4];
        for c in chars {
            for byte in c.encode_utf8(&mut buf).bytes() {
                hash ^= u64::from(byte);
                hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
            }
        }
        (hash % self.dimensions as u64) as usize
    }
}

/// Lowercased terms longer than two characters, minus stop words.
fn term_frequencies(text: &str) -> BTreeMap<String, u32> {
    let mut freqs = BTreeMap::new();
    for word in text.to_lowercase().split_whitespace() {
        let term = word.trim_matches(|c: char| !c.is_alphanumeric());
        if term.chars().count() > 2 && !STOP_WORDS.contains(&term) {
            *freqs.entry(term.to_string()).or_insert(0) += 1;
        }
    }
    freqs
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrigramProvider {
    fn provider_name(&self) -> &str {
        "trigram"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.vectorize(text)).collect())
    }
}
