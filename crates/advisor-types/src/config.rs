//! Application configuration types for Advisor.
//!
//! `AppConfig` represents the top-level `config.toml`. It is loaded once at
//! startup and passed explicitly to the components that need it. API keys
//! are not part of this file; they are read from the environment by the
//! infrastructure layer.

use serde::{Deserialize, Serialize};

/// DashScope's OpenAI-compatible endpoint (international region).
pub const DASHSCOPE_BASE_URL: &str = "https://dashscope-intl.aliyuncs.com/compatible-mode/v1";

/// Top-level configuration. All sections have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Where the SQLite database lives. `None` means `{data_dir}/advisor.db`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,
}

/// Chat-completion provider settings for the QA chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_provider_name")]
    pub provider_name: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_chat_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: Option<f64>,
}

fn default_provider_name() -> String {
    "dashscope".to_string()
}

fn default_base_url() -> String {
    DASHSCOPE_BASE_URL.to_string()
}

fn default_chat_model() -> String {
    "qwen-plus".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider_name: default_provider_name(),
            base_url: default_base_url(),
            model: default_chat_model(),
            max_tokens: default_max_tokens(),
            temperature: None,
        }
    }
}

/// Embeddings endpoint settings used by `advisor embed-check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_encoding_format")]
    pub encoding_format: String,
}

fn default_embedding_model() -> String {
    "text-embedding-v3".to_string()
}

fn default_encoding_format() -> String {
    "float".to_string()
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_embedding_model(),
            encoding_format: default_encoding_format(),
        }
    }
}

/// Turn-processing knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Number of most recent messages sent to the chain as history.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
    /// Owner recorded on new sessions. There is no authentication.
    #[serde(default = "default_user_id")]
    pub default_user_id: i64,
}

fn default_history_limit() -> u32 {
    10
}

fn default_user_id() -> i64 {
    1
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            default_user_id: default_user_id(),
        }
    }
}
