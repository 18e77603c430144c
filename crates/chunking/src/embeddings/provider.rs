//! Embedding provider trait and factory.

use narrative_core::{config::EmbeddingSettings, AppError, AppResult};
use std::sync::Arc;

use super::trigram::TrigramProvider;

/// Trait for embedding providers.
///
/// Implementations return exactly one vector of `dimensions()` floats per
/// input text, in input order.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "trigram")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts in a batch.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Embedding("No embedding returned".to_string()))
    }
}

/// Create an embedding provider from configuration.
pub fn create_provider(settings: &EmbeddingSettings) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match settings.provider.as_str() {
        "trigram" => Ok(Arc::new(TrigramProvider::new(
            settings.dimensions,
            settings.model.clone(),
        )?)),
        other => Err(AppError::Embedding(format!(
            "Unknown embedding provider: '{}'. Supported providers: trigram",
            other
        ))),
    }
}
