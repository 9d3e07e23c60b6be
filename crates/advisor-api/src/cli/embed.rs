//! `advisor embed-check`: one round trip to the embeddings endpoint.

use advisor_core::embedding::{Embedder, preview};
use advisor_infra::llm::embeddings::OpenAiEmbedder;
use advisor_types::config::EmbeddingConfig;
use anyhow::Context;
use secrecy::SecretString;

/// Sample text embedded when `--text` is not given.
pub const DEFAULT_TEXT: &str = "Who is the Prime Minister of India?";

/// Number of leading vector components printed.
const PREVIEW_LEN: usize = 10;

/// Embed `text` and print the vector length and its first values.
pub async fn embed_check(
    config: &EmbeddingConfig,
    api_key: SecretString,
    text: &str,
) -> anyhow::Result<()> {
    let embedder = OpenAiEmbedder::new(config, api_key)?;

    let vector = embedder
        .embed(text)
        .await
        .with_context(|| format!("embedding request to {} failed", config.base_url))?;

    println!("{}", render_report(embedder.model_name(), &vector));
    Ok(())
}

fn render_report(model: &str, vector: &[f32]) -> String {
    let (len, head) = preview(vector, PREVIEW_LEN);
    format!("Model: {model}\nEmbedding length: {len}\nFirst {} values: {head:?}", head.len())
}
