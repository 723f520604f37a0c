//! Application configuration types for ArkAgents.
//!
//! `AppConfig` represents the top-level `config.toml` in the data directory.
//! Every section and field has a default, so an empty file is valid.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8001
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database settings. `url = None` means `{data_dir}/arkagents.db`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,
}

/// Completion provider settings (OpenAI-compatible endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_provider_name")]
    pub name: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Upper bound on a single completion call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_provider_name() -> String {
    "groq".to_string()
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            api_key_env: default_api_key_env(),
        }
    }
}

/// Conversation handling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Number of prior messages sent to the provider with each new turn.
    #[serde(default = "default_context_window")]
    pub context_window: usize,
    #[serde(default = "default_user_id")]
    pub default_user_id: String,
}

fn default_context_window() -> usize {
    10
}

fn default_user_id() -> String {
    crate::agent::DEFAULT_USER_ID.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            context_window: default_context_window(),
            default_user_id: default_user_id(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Export spans to stdout through OpenTelemetry.
    #[serde(default)]
    pub otel_stdout: bool,
}
