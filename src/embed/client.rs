//! Embedding client for remote providers

use super::{EmbedError, EmbedResult, Embedder};
use crate::config::{EmbeddingConfig, EmbeddingProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Environment variable consulted when the config carries no API key
pub const API_KEY_ENV: &str = "ORGTREE_EMBED_API_KEY";

/// Client for interacting with embedding APIs
pub struct EmbeddingClient {
    client: Client,
    provider: EmbeddingProvider,
    model: String,
    api_key: Option<String>,
    api_base_url: String,
}

impl EmbeddingClient {
    /// Create a new embedding client based on configuration
    pub fn new(config: &EmbeddingConfig) -> EmbedResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| EmbedError::ConfigError(e.to_string()))?;

        let (default_base, default_model) = match config.provider {
            EmbeddingProvider::OpenAI => ("https://api.openai.com/v1", "text-embedding-3-small"),
            EmbeddingProvider::Ollama => ("http://localhost:11434", "nomic-embed-text"),
            EmbeddingProvider::Gemini => (
                "https://generativelanguage.googleapis.com/v1beta",
                "text-embedding-004",
            ),
            other => {
                return Err(EmbedError::ConfigError(format!(
                    "Provider {:?} is not a remote embedding provider",
                    other
                )))
            }
        };

        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok());

        Ok(Self {
            client,
            provider: config.provider,
            model: config.model.clone().unwrap_or_else(|| default_model.to_string()),
            api_key,
            api_base_url: config
                .api_base_url
                .clone()
                .unwrap_or_else(|| default_base.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }

    /// Generate embeddings for a batch of texts
    pub async fn generate_embeddings(&self, texts: &[String]) -> EmbedResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!(provider = ?self.provider, model = %self.model, count = texts.len(), "requesting embeddings");
        match self.provider {
            EmbeddingProvider::OpenAI => self.openai_embeddings(texts).await,
            EmbeddingProvider::Ollama => self.ollama_embeddings(texts).await,
            EmbeddingProvider::Gemini => self.gemini_embeddings(texts).await,
            _ => Err(EmbedError::ConfigError(format!(
                "Provider {:?} not supported by the remote client",
                self.provider
            ))),
        }
    }

    async fn send_json<Req: Serialize, Resp: for<'de> Deserialize<'de>>(
        &self,
        request: reqwest::RequestBuilder,
        body: &Req,
        provider_name: &str,
    ) -> EmbedResult<Resp> {
        let resp = request
            .json(body)
            .send()
            .await
            .map_err(|e| EmbedError::NetworkError(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            return Err(EmbedError::ApiError(format!(
                "{} returned {}: {}",
                provider_name, status, error_text
            )));
        }

        resp.json()
            .await
            .map_err(|e| EmbedError::SerializationError(e.to_string()))
    }

    async fn openai_embeddings(&self, texts: &[String]) -> EmbedResult<Vec<Vec<f32>>> {
        #[derive(Serialize)]
        struct OpenAIRequest<'a> {
            input: &'a [String],
            model: &'a str,
        }

        #[derive(Deserialize)]
        struct OpenAIResponse {
            data: Vec<OpenAIData>,
        }

        #[derive(Deserialize)]
        struct OpenAIData {
            index: usize,
            embedding: Vec<f32>,
        }

        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| EmbedError::ConfigError("OpenAI requires API key".to_string()))?;

        let url = format!("{}/embeddings", self.api_base_url);
        let request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key));
        let result: OpenAIResponse = self
            .send_json(
                request,
                &OpenAIRequest {
                    input: texts,
                    model: &self.model,
                },
                "OpenAI",
            )
            .await?;

        // Replies carry their input position; restore input order.
        let mut out = vec![Vec::new(); texts.len()];
        for item in result.data {
            if let Some(slot) = out.get_mut(item.index) {
                *slot = item.embedding;
            }
        }
        Ok(out)
    }

    async fn ollama_embeddings(&self, texts: &[String]) -> EmbedResult<Vec<Vec<f32>>> {
        #[derive(Serialize)]
        struct OllamaRequest<'a> {
            model: &'a str,
            input: &'a [String],
        }

        #[derive(Deserialize)]
        struct OllamaResponse {
            embeddings: Vec<Vec<f32>>,
        }

        let url = format!("{}/api/embed", self.api_base_url);
        let result: OllamaResponse = self
            .send_json(
                self.client.post(&url),
                &OllamaRequest {
                    model: &self.model,
                    input: texts,
                },
                "Ollama",
            )
            .await?;
        Ok(result.embeddings)
    }

    async fn gemini_embeddings(&self, texts: &[String]) -> EmbedResult<Vec<Vec<f32>>> {
        #[derive(Serialize)]
        struct GeminiBatchRequest<'a> {
            requests: Vec<GeminiRequest<'a>>,
        }

        #[derive(Serialize)]
        struct GeminiRequest<'a> {
            model: String,
            content: GeminiContent<'a>,
        }

        #[derive(Serialize)]
        struct GeminiContent<'a> {
            parts: Vec<GeminiPart<'a>>,
        }

        #[derive(Serialize)]
        struct GeminiPart<'a> {
            text: &'a str,
        }

        #[derive(Deserialize)]
        struct GeminiBatchResponse {
            embeddings: Vec<GeminiEmbedding>,
        }

        #[derive(Deserialize)]
        struct GeminiEmbedding {
            values: Vec<f32>,
        }

        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| EmbedError::ConfigError("Gemini requires API key".to_string()))?;

        let url = format!(
            "{}/models/{}:batchEmbedContents?key={}",
            self.api_base_url, self.model, api_key
        );

        let requests = texts
            .iter()
            .map(|t| GeminiRequest {
                model: format!("models/{}", self.model),
                content: GeminiContent {
                    parts: vec![GeminiPart { text: t }],
                },
            })
            .collect();

        let result: GeminiBatchResponse = self
            .send_json(self.client.post(&url), &GeminiBatchRequest { requests }, "Gemini")
            .await?;
        Ok(result.embeddings.into_iter().map(|e| e.values).collect())
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    fn name(&self) -> &str {
        match self.provider {
            EmbeddingProvider::OpenAI => "openai",
            EmbeddingProvider::Ollama => "ollama",
            EmbeddingProvider::Gemini => "gemini",
            _ => "remote",
        }
    }

    fn dimension(&self) -> Option<usize> {
        None
    }

    async fn embed_batch(&self, texts: &[String]) -> EmbedResult<Vec<Vec<f32>>> {
        self.generate_embeddings(texts).await
    }
}
