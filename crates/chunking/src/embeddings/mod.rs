//! Embedding contract consumed by the indexing pipeline.
//!
//! The chunking core never computes embeddings itself; it hands chunk texts
//! to an `EmbeddingProvider` in emission order, in fixed-size batches, and
//! zips the returned vectors positionally with chunk ids.

pub mod provider;
pub mod trigram;

pub use provider::{create_provider, EmbeddingProvider};
pub use trigram::TrigramProvider;

use narrative_core::{AppError, AppResult};

/// Embed `texts` in batches of `batch_size`, preserving input order.
///
/// Fails if the provider returns a different number of vectors than it was
/// given, or vectors of the wrong dimension.
pub async fn embed_in_batches(
    provider: &dyn EmbeddingProvider,
    texts: &[String],
    batch_size: usize,
) -> AppResult<Vec<Vec<f32>>> {
    if batch_size == 0 {
        return Err(AppError::Config(
            "batch_size must be greater than zero".to_string(),
        ));
    }

    tracing::info!(
        "Processing {} chunks in batches of {} (provider: {}, model: {})",
        texts.len(),
        batch_size,
        provider.provider_name(),
        provider.model_name()
    );

    let mut vectors = Vec::with_capacity(texts.len());
    for (batch_no, batch) in texts.chunks(batch_size).enumerate() {
        let embedded = provider.embed_batch(batch).await?;

        if embedded.len() != batch.len() {
            return Err(AppError::Embedding(format!(
                "Provider returned {} vectors for a batch of {}",
                embedded.len(),
                batch.len()
            )));
        }
        if let Some(bad) = embedded.iter().find(|v| v.len() != provider.dimensions()) {
            return Err(AppError::Embedding(format!(
                "Expected {}-dimensional vectors, got {}",
                provider.dimensions(),
                bad.len()
            )));
        }

        tracing::debug!("Processed batch {}: {} embeddings", batch_no + 1, embedded.len());
        vectors.extend(embedded);
    }

    Ok(vectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns one vector fewer than requested.
    #[derive(Debug)]
    struct ShortProvider;

    #[async_trait::async_trait]
    impl EmbeddingProvider for ShortProvider {
        fn provider_name(&self) -> &str {
            "short"
        }

        fn model_name(&self) -> &str {
            "short-v0"
        }

        fn dimensions(&self) -> usize {
            2
        }

        async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
            Ok(texts.iter().skip(1).map(|_| vec![0.0, 1.0]).collect())
        }
    }

    #[tokio::test]
    async fn test_batches_preserve_order() {
        let provider = TrigramProvider::new(32, "trigram-v1").unwrap();
        let texts: Vec<String> = (0..7).map(|i| format!("complaint number {} about fees", i)).collect();

        let batched = embed_in_batches(&provider, &texts, 3).await.unwrap();
        let whole = provider.embed_batch(&texts).await.unwrap();

        assert_eq!(batched.len(), 7);
        assert_eq!(batched, whole);
    }

    #[tokio::test]
    async fn test_short_batch_is_error() {
        let texts = vec!["one".to_string(), "two".to_string()];
        let result = embed_in_batches(&ShortProvider, &texts, 256).await;
        assert!(matches!(result, Err(AppError::Embedding(_))));
    }

    #[tokio::test]
    async fn test_zero_batch_size_rejected() {
        let provider = TrigramProvider::new(8, "trigram-v1").unwrap();
        let result = embed_in_batches(&provider, &["x".to_string()], 0).await;
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let provider = TrigramProvider::new(8, "trigram-v1").unwrap();
        assert!(embed_in_batches(&provider, &[], 4).await.unwrap().is_empty());
    }
}
