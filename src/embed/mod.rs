//! Profile embeddings
//!
//! The [`Embedder`] trait is the contract the pipeline depends on: one batch
//! call maps every profile text to a dense vector, deterministically for a
//! fixed model. Implementations are constructed once and shared read-only.

pub mod client;
pub mod hashing;

use crate::config::{EmbeddingConfig, EmbeddingProvider};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub use client::EmbeddingClient;
pub use hashing::HashingEmbedder;

/// Embed errors
#[derive(Error, Debug)]
pub enum EmbedError {
    /// API error from the embedding provider
    #[error("Embedding API error: {0}")]
    ApiError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Serialization/Deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type EmbedResult<T> = Result<T, EmbedError>;

/// A batch text embedding function
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Vector length every output must have, when known up front
    fn dimension(&self) -> Option<usize>;

    /// Embed all texts in one call. The reply holds one vector per input, in
    /// input order; an empty vector means "no embedding" for that text.
    async fn embed_batch(&self, texts: &[String]) -> EmbedResult<Vec<Vec<f32>>>;
}

/// Embedder that never produces a vector
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEmbedder;

#[async_trait]
impl Embedder for NullEmbedder {
    fn name(&self) -> &str {
        "none"
    }

    fn dimension(&self) -> Option<usize> {
        None
    }

    async fn embed_batch(&self, texts: &[String]) -> EmbedResult<Vec<Vec<f32>>> {
        Ok(vec![Vec::new(); texts.len()])
    }
}

/// Build the configured embedder
pub fn from_config(config: &EmbeddingConfig) -> EmbedResult<Arc<dyn Embedder>> {
    let embedder: Arc<dyn Embedder> = match config.provider {
        EmbeddingProvider::Hashing => Arc::new(HashingEmbedder::new(config.dimension)?),
        EmbeddingProvider::None => Arc::new(NullEmbedder),
        EmbeddingProvider::OpenAI | EmbeddingProvider::Ollama | EmbeddingProvider::Gemini => {
            Arc::new(EmbeddingClient::new(config)?)
        }
    };
    Ok(embedder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_embedder_yields_empty_vectors() {
        let texts = vec!["a".to_string(), "b".to_string()];
        let out = NullEmbedder.embed_batch(&texts).await.unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|v| v.is_empty()));
    }

    #[test]
    fn test_from_config_providers() {
        let hashing = from_config(&EmbeddingConfig::default()).unwrap();
        assert_eq!(hashing.name(), "hashing");
        assert_eq!(hashing.dimension(), Some(256));

        let none = from_config(&EmbeddingConfig {
            provider: EmbeddingProvider::None,
            ..EmbeddingConfig::default()
        })
        .unwrap();
        assert_eq!(none.name(), "none");
    }
}
