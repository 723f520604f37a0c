//! Configuration loader for ArkAgents.
//!
//! Reads `config.toml` from the data directory (`~/.arkagents/` by default)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the
//! file is missing or malformed, then applies environment overrides.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use arkagents_types::config::{AppConfig, ProviderSettings};

use crate::sqlite::pool::default_database_url;

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `ARKAGENTS_DATA_DIR` environment variable
/// 2. `~/.arkagents`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ARKAGENTS_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".arkagents");
    }

    // Last resort: current directory
    PathBuf::from(".arkagents")
}

/// Load configuration from `{data_dir}/config.toml` and the process environment.
pub async fn load_app_config(data_dir: &Path) -> AppConfig {
    let mut config = read_config_file(data_dir).await;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    clamp_provider_timeout(&mut config);
    config
}

/// Replace a zero `provider.timeout_secs` with the default; a zero timeout fails every chat.
pub fn clamp_provider_timeout(config: &mut AppConfig) {
    if config.provider.timeout_secs == 0 {
        let fallback = ProviderSettings::default().timeout_secs;
        tracing::warn!("Ignoring provider.timeout_secs = 0, using {fallback}s");
        config.provider.timeout_secs = fallback;
    }
}

/// Read `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn read_config_file(data_dir: &Path) -> AppConfig {
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

/// Apply `PORT` and `DATABASE_URL` overrides using the given lookup.
pub fn apply_env_overrides(config: &mut AppConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(port) = env("PORT") {
        match port.parse() {
            Ok(port) => config.server.port = port,
            Err(err) => tracing::warn!("Ignoring invalid PORT '{port}': {err}"),
        }
    }
    if let Some(url) = env("DATABASE_URL").filter(|u| !u.trim().is_empty()) {
        config.database.url = Some(url);
    }
}

/// Database URL: the configured one, or `sqlite://{data_dir}/arkagents.db?mode=rwc`.
pub fn database_url(config: &AppConfig, data_dir: &Path) -> String {
    config
        .database
        .url
        .clone()
        .unwrap_or_else(|| default_database_url(data_dir))
}

/// Read the provider API key from the environment variable named in the config.
///
/// Returns `None` when the variable is unset or blank.
pub fn resolve_api_key(settings: &ProviderSettings) -> Option<SecretString> {
    std::env::var(&settings.api_key_env)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .map(SecretString::from)
}
