//! LLM provider implementations.
//!
//! Contains concrete implementations of the [`LlmProvider`] and [`Embedder`]
//! traits defined in `advisor-core`, plus a factory ([`create_provider`])
//! that builds the QA chain's provider from the `[llm]` config section.
//!
//! [`LlmProvider`]: advisor_core::llm::provider::LlmProvider
//! [`Embedder`]: advisor_core::embedding::Embedder

pub mod embeddings;
pub mod openai_compat;

use secrecy::SecretString;

use advisor_core::llm::box_provider::BoxLlmProvider;
use advisor_types::config::LlmConfig;

use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] from the `[llm]` config section.
///
/// Every supported backend speaks the OpenAI chat completions protocol, so
/// the provider name only selects the capability table.
pub fn create_provider(config: &LlmConfig, api_key: SecretString) -> BoxLlmProvider {
    let provider = OpenAiCompatibleProvider::new(openai_compat::config::from_llm_config(
        config, api_key,
    ));
    BoxLlmProvider::new(provider)
}
