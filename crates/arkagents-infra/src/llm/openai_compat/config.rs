//! Configuration for the OpenAI-compatible provider.

use secrecy::SecretString;

use arkagents_types::config::ProviderSettings;

/// Configuration for an OpenAI-compatible completion provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`]. Does not derive
/// Debug so the key cannot end up in a log line.
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "groq", "openai").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.groq.com/openai/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Model used when a request does not name one.
    pub model: String,
}

impl OpenAiCompatConfig {
    /// Build from the `[provider]` config section and a resolved key.
    pub fn from_settings(settings: &ProviderSettings, api_key: SecretString) -> Self {
        Self {
            provider_name: settings.name.clone(),
            base_url: settings.base_url.clone(),
            api_key,
            model: settings.model.clone(),
        }
    }
}
