//! Configuration loader for Advisor.
//!
//! Reads `config.toml` from the data directory (`~/.advisor/` in production)
//! and deserializes it into [`AppConfig`]. Falls back to sensible defaults
//! when the file is missing or malformed. A handful of `ADVISOR_*`
//! environment variables override file values, and the API key is only ever
//! read from the environment.

use std::path::{Path, PathBuf};

use advisor_types::config::AppConfig;
use secrecy::SecretString;

use crate::sqlite::pool::database_url_for;

/// Environment variables checked for the API key, in priority order.
pub const API_KEY_VARS: [&str; 3] = ["ADVISOR_API_KEY", "OPENAI_API_KEY", "DASHSCOPE_API_KEY"];

/// Load configuration from `{data_dir}/config.toml` and apply environment overrides.
pub async fn load_app_config(data_dir: &Path) -> AppConfig {
    let mut config = load_config_file(data_dir).await;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// Read `{data_dir}/config.toml` without applying overrides.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_config_file(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// Overlay environment values onto a loaded config.
///
/// `lookup` is `std::env::var` in production; tests pass a map.
pub fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = non_empty("ADVISOR_DATABASE_URL") {
        config.database.url = Some(url);
    }
    if let Some(base_url) = non_empty("ADVISOR_LLM_BASE_URL") {
        config.llm.base_url = base_url.clone();
        config.embedding.base_url = base_url;
    }
    if let Some(model) = non_empty("ADVISOR_LLM_MODEL") {
        config.llm.model = model;
    }
    if let Some(model) = non_empty("ADVISOR_EMBEDDING_MODEL") {
        config.embedding.model = model;
    }
}

/// Resolve the API key shared by the chat and embeddings endpoints.
///
/// Returns `None` when none of [`API_KEY_VARS`] is set to a non-empty value.
pub fn resolve_api_key() -> Option<SecretString> {
    resolve_api_key_with(|key| std::env::var(key).ok())
}

fn resolve_api_key_with(lookup: impl Fn(&str) -> Option<String>) -> Option<SecretString> {
    API_KEY_VARS
        .iter()
        .filter_map(|var| lookup(var))
        .find(|v| !v.trim().is_empty())
        .map(SecretString::from)
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `ADVISOR_DATA_DIR` environment variable
/// 2. `~/.advisor`
/// 3. `.advisor` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ADVISOR_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".advisor");
    }

    PathBuf::from(".advisor")
}

/// The configured database URL, or the default file inside `data_dir`.
///
/// Must name a file: the reader and writer pools open separate connections,
/// so an in-memory URL would give the reader an empty database.
///
/// `?mode=rwc` lets SQLite create the file on first start.
pub fn resolve_database_url(config: &AppConfig, data_dir: &Path) -> String {
    match &config.database.url {
        Some(url) => url.clone(),
        None => format!("{}?mode=rwc", database_url_for(data_dir)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config_file(tmp.path()).await;
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.llm.model, "qwen-plus");
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[server]
host = "0.0.0.0"
port = 8080

[llm]
model = "qwen-max"

[chat]
history_limit = 6
"#,
        )
        .await
        .unwrap();

        let config = load_config_file(tmp.path()).await;
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.llm.model, "qwen-max");
        assert_eq!(config.chat.history_limit, 6);
        assert_eq!(config.embedding.model, "text-embedding-v3");
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config_file(tmp.path()).await;
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = AppConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("ADVISOR_DATABASE_URL", "sqlite:///tmp/x.db"),
                ("ADVISOR_LLM_BASE_URL", "http://localhost:4000/v1"),
                ("ADVISOR_LLM_MODEL", "gpt-4o-mini"),
                ("ADVISOR_EMBEDDING_MODEL", "text-embedding-3-small"),
            ]),
        );
        assert_eq!(config.database.url.as_deref(), Some("sqlite:///tmp/x.db"));
        assert_eq!(config.llm.base_url, "http://localhost:4000/v1");
        assert_eq!(config.embedding.base_url, "http://localhost:4000/v1");
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.embedding.model, "text-embedding-3-small");
    }

    #[test]
    fn env_overrides_ignore_blank_values() {
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, env(&[("ADVISOR_LLM_MODEL", "  ")]));
        assert_eq!(config.llm.model, "qwen-plus");
    }

    #[test]
    fn api_key_priority_order() {
        let key = resolve_api_key_with(env(&[
            ("DASHSCOPE_API_KEY", "sk-dash"),
            ("OPENAI_API_KEY", "sk-openai"),
        ]))
        .unwrap();
        assert_eq!(key.expose_secret(), "sk-openai");

        let key = resolve_api_key_with(env(&[
            ("ADVISOR_API_KEY", ""),
            ("DASHSCOPE_API_KEY", "sk-dash"),
        ]))
        .unwrap();
        assert_eq!(key.expose_secret(), "sk-dash");

        assert!(resolve_api_key_with(env(&[])).is_none());
    }

    #[test]
    fn database_url_defaults_to_data_dir() {
        let config = AppConfig::default();
        let url = resolve_database_url(&config, Path::new("/var/lib/advisor"));
        assert_eq!(url, "sqlite:///var/lib/advisor/advisor.db?mode=rwc");

        let mut config = AppConfig::default();
        config.database.url = Some("sqlite:///srv/advisor/chat.db?mode=rwc".to_string());
        assert_eq!(
            resolve_database_url(&config, Path::new("/x")),
            "sqlite:///srv/advisor/chat.db?mode=rwc"
        );
    }
}
