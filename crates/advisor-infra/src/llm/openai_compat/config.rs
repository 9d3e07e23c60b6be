//! Configuration types and per-provider defaults for OpenAI-compatible providers.
//!
//! Each provider that speaks the OpenAI chat completions protocol gets a factory
//! function returning an [`OpenAiCompatConfig`] with the correct base URL,
//! capabilities, and defaults.

use advisor_types::config::{DASHSCOPE_BASE_URL, LlmConfig};
use advisor_types::llm::ProviderCapabilities;
use secrecy::SecretString;

/// OpenAI's public API base URL.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai", "dashscope").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    /// API key for authentication.
    pub api_key: SecretString,
    /// Model identifier (e.g., "gpt-4o-mini", "qwen-plus").
    pub model: String,
    /// What this provider supports.
    pub capabilities: ProviderCapabilities,
}

/// OpenAI default configuration.
///
/// Base URL: `https://api.openai.com/v1`
/// Capabilities: JSON mode; 128K context, 16K output.
pub fn openai_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: OPENAI_BASE_URL.into(),
        api_key,
        model: model.into(),
        capabilities: ProviderCapabilities {
            json_mode: true,
            max_context_tokens: 128_000,
            max_output_tokens: 16_384,
        },
    }
}

/// Alibaba DashScope default configuration (OpenAI-compatible mode).
///
/// Base URL: `https://dashscope-intl.aliyuncs.com/compatible-mode/v1`
/// Capabilities: JSON mode; 128K context, 8K output.
pub fn dashscope_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "dashscope".into(),
        base_url: DASHSCOPE_BASE_URL.into(),
        api_key,
        model: model.into(),
        capabilities: ProviderCapabilities {
            json_mode: true,
            max_context_tokens: 131_072,
            max_output_tokens: 8_192,
        },
    }
}

/// Build a provider configuration from the `[llm]` section of `config.toml`.
///
/// Known provider names pick up their capability table; the configured
/// base URL always wins so a proxy or regional endpoint can be used.
pub fn from_llm_config(llm: &LlmConfig, api_key: SecretString) -> OpenAiCompatConfig {
    let mut config = match llm.provider_name.as_str() {
        "openai" => openai_defaults(api_key, &llm.model),
        "dashscope" => dashscope_defaults(api_key, &llm.model),
        other => OpenAiCompatConfig {
            provider_name: other.to_string(),
            base_url: llm.base_url.clone(),
            api_key,
            model: llm.model.clone(),
            capabilities: ProviderCapabilities {
                json_mode: false,
                max_context_tokens: 32_768,
                max_output_tokens: 4_096,
            },
        },
    };
    config.base_url = llm.base_url.clone();
    config
}
