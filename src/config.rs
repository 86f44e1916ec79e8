//! Runtime configuration
//!
//! Every section has defaults, so an empty YAML document (or no file at all)
//! yields the reference setup: similarity, shared neighbors and seniority gap
//! weighted 1.0, location matching disabled, local hashing embeddings.

use crate::graph::EmployeeId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Weights of the candidate score terms. A weight of 0 disables its term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Cosine similarity of profile embeddings
    pub embedding_similarity: f64,
    /// Number of shared social neighbors
    pub common_neighbors: f64,
    /// `1 / rank gap` for a more senior candidate
    pub seniority_gap: f64,
    /// Multiplier of the location-match bonus
    pub location_match: f64,
    /// Bonus constant awarded when locations are equal
    pub location_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            embedding_similarity: 1.0,
            common_neighbors: 1.0,
            seniority_gap: 1.0,
            location_match: 0.0,
            location_bonus: 1.0,
        }
    }
}

impl ScoringWeights {
    fn validate(&self) -> ConfigResult<()> {
        let terms = [
            ("embedding_similarity", self.embedding_similarity),
            ("common_neighbors", self.common_neighbors),
            ("seniority_gap", self.seniority_gap),
            ("location_match", self.location_match),
            ("location_bonus", self.location_bonus),
        ];
        for (name, value) in terms {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "scoring.{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Root designation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootConfig {
    /// Employee forced to the root sentinel after assignment
    pub employee_id: Option<EmployeeId>,
    /// Without a forced id, treat a unique root-tier title as the root
    pub infer_from_title: bool,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            employee_id: None,
            infer_from_title: true,
        }
    }
}

/// Embedding backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// Local deterministic feature hashing
    Hashing,
    OpenAI,
    Ollama,
    Gemini,
    /// No embeddings; the similarity term contributes nothing
    None,
}

/// Embedding configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    /// Model name for remote providers (e.g. "text-embedding-3-small")
    pub model: Option<String>,
    /// API key; falls back to `ORGTREE_EMBED_API_KEY`
    pub api_key: Option<String>,
    /// API base URL override
    pub api_base_url: Option<String>,
    /// Vector dimension produced by the hashing embedder
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::Hashing,
            model: None,
            api_key: None,
            api_base_url: None,
            dimension: 256,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgTreeConfig {
    pub scoring: ScoringWeights,
    pub root: RootConfig,
    pub embedding: EmbeddingConfig,
    pub server: ServerConfig,
}

impl OrgTreeConfig {
    /// Load and validate a YAML config file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        let config: OrgTreeConfig = if text.trim().is_empty() {
            OrgTreeConfig::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.scoring.validate()?;
        if self.embedding.dimension == 0 {
            return Err(ConfigError::Invalid(
                "embedding.dimension must be greater than 0".to_string(),
            ));
        }
        if let Some(root) = self.root.employee_id {
            if !root.is_valid() {
                return Err(ConfigError::Invalid(format!(
                    "root.employee_id must be a positive employee id, got {}",
                    root
                )));
            }
        }
        Ok(())
    }
}
