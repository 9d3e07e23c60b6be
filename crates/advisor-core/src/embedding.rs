//! Embedder trait for text-to-vector conversion.
//!
//! Implementations (e.g., an OpenAI-compatible `/embeddings` client) live in
//! advisor-infra. The chat pipeline does not use embeddings; this port backs
//! the connectivity check exposed by the CLI.

use advisor_types::llm::LlmError;

/// Trait for converting text into an embedding vector.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait Embedder: Send + Sync {
    /// Embed a single text.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, LlmError>> + Send;

    /// The model name used for embeddings (e.g., "text-embedding-v3").
    fn model_name(&self) -> &str;
}

/// Short human-readable report of an embedding: its length and leading values.
pub fn preview(vector: &[f32], count: usize) -> (usize, &[f32]) {
    (vector.len(), &vector[..count.min(vector.len())])
}
