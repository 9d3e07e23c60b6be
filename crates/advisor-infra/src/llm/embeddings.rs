//! OpenAI-compatible embeddings client.
//!
//! `POST {base_url}/embeddings` with `{model, input, encoding_format}` and a
//! bearer token; the first vector of `data` is returned. DashScope, OpenAI
//! and most self-hosted gateways accept this shape.

use std::time::{Duration, Instant};

use advisor_core::embedding::Embedder;
use advisor_types::config::EmbeddingConfig;
use advisor_types::llm::{EmbeddingRequest, EmbeddingResponse, LlmError};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error};

/// Longest slice of an error body kept in error messages.
const ERROR_SNIPPET_LEN: usize = 300;

/// Embeddings client. Does NOT derive Debug (holds the API key).
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    url: String,
    api_key: SecretString,
    model: String,
    encoding_format: String,
}

impl OpenAiEmbedder {
    /// Build a client from the `[embedding]` config section and an API key.
    pub fn new(config: &EmbeddingConfig, api_key: SecretString) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            url: format!("{}/embeddings", config.base_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            encoding_format: config.encoding_format.clone(),
        })
    }
}

impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let started = Instant::now();
        let body = EmbeddingRequest {
            model: self.model.clone(),
            input: text.to_string(),
            encoding_format: self.encoding_format.clone(),
        };

        debug!(model = %self.model, input_len = text.len(), "POST {}", self.url);

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let snippet: String = text.chars().take(ERROR_SNIPPET_LEN).collect();
            error!(
                %status,
                url = %self.url,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "Embeddings endpoint returned non-success status"
            );
            return Err(match status.as_u16() {
                401 | 403 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited {
                    retry_after_ms: None,
                },
                503 => LlmError::Overloaded(snippet),
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {snippet}"),
                },
            });
        }

        let out: EmbeddingResponse = resp.json().await.map_err(|e| {
            LlmError::Deserialization(format!("{e}; expected `data[0].embedding`"))
        })?;

        let first = out
            .data
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Deserialization("empty `data` array".to_string()))?;

        debug!(
            dim = first.embedding.len(),
            latency_ms = started.elapsed().as_millis(),
            "Embedding received"
        );
        Ok(first.embedding)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
