//! Local feature-hashing embedder
//!
//! Each lower-cased alphanumeric token is hashed with SHA-256 into one of
//! `dimension` signed buckets; the bucket counts are L2-normalised. Output
//! depends only on the text and the dimension, so it is stable across runs
//! and platforms. Text without tokens maps to the all-zero vector.

use super::{EmbedError, EmbedResult, Embedder};
use async_trait::async_trait;
use rayon::prelude::*;
use sha2::{Digest, Sha256};

/// Deterministic bag-of-words embedder
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> EmbedResult<Self> {
        if dimension == 0 {
            return Err(EmbedError::ConfigError(
                "hashing embedder needs a dimension greater than 0".to_string(),
            ));
        }
        Ok(Self { dimension })
    }

    /// Embed a single text
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in tokens(text) {
            let digest = Sha256::digest(token.as_bytes());
            let mut bucket_bytes = [0u8; 8];
            bucket_bytes.copy_from_slice(&digest[..8]);
            let bucket = (u64::from_le_bytes(bucket_bytes) % self.dimension as u64) as usize;
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

#[async_trait]
impl Embedder for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing"
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }

    async fn embed_batch(&self, texts: &[String]) -> EmbedResult<Vec<Vec<f32>>> {
        Ok(texts.par_iter().map(|t| self.embed_text(t)).collect())
    }
}
