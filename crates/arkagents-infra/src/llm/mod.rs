//! Completion provider implementations.
//!
//! Contains the concrete implementation of the [`LlmProvider`] trait defined
//! in `arkagents-core` and a factory ([`create_provider`]) that builds the
//! configured provider at startup.

pub mod openai_compat;

use secrecy::SecretString;

use arkagents_core::llm::box_provider::BoxLlmProvider;
use arkagents_core::llm::provider::LlmProvider;
use arkagents_types::config::ProviderSettings;
use arkagents_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::OpenAiCompatConfig;

/// Create a [`BoxLlmProvider`] from the `[provider]` config section.
///
/// Without an API key the server still starts: the returned provider fails
/// every request with [`LlmError::NotConfigured`].
pub fn create_provider(settings: &ProviderSettings, api_key: Option<SecretString>) -> BoxLlmProvider {
    match api_key {
        Some(key) => {
            tracing::info!(
                provider = %settings.name,
                base_url = %settings.base_url,
                model = %settings.model,
                "completion provider configured"
            );
            BoxLlmProvider::new(OpenAiCompatibleProvider::new(
                OpenAiCompatConfig::from_settings(settings, key),
            ))
        }
        None => {
            tracing::warn!(
                env_var = %settings.api_key_env,
                "no API key set, chat requests will fail until it is provided"
            );
            BoxLlmProvider::new(UnconfiguredProvider {
                name: settings.name.clone(),
                api_key_env: settings.api_key_env.clone(),
            })
        }
    }
}

/// Stand-in provider used when no API key is available.
pub struct UnconfiguredProvider {
    name: String,
    api_key_env: String,
}

impl LlmProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::NotConfigured(format!(
            "set {} to enable chat",
            self.api_key_env
        )))
    }
}
