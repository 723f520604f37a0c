//! Chat orchestrator: one user utterance in, one assistant reply out.
//!
//! The turn walks through `start -> agent_loaded -> user_turn_persisted ->
//! context_assembled -> provider_responded -> assistant_turn_persisted ->
//! done`, logging each state at debug level. The user turn and the assistant
//! turn are committed independently: when the provider fails the user turn
//! stays in history and no assistant turn is written.

use std::time::Duration;

use tracing::{Instrument, debug, info, info_span, warn};

use arkagents_types::agent::AgentId;
use arkagents_types::chat::{ChatReply, MessageRole, NewChatMessage};
use arkagents_types::config::ProviderSettings;
use arkagents_types::error::AgentError;
use arkagents_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use crate::llm::box_provider::BoxLlmProvider;
use crate::repository::agent::AgentRepository;
use crate::repository::message::MessageRepository;

use super::context::ContextAssembler;

/// Per-request completion parameters shared by every chat turn.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub model: String,
    pub temperature: Option<f64>,
    pub max_tokens: u32,
    /// Upper bound on a single provider call.
    pub timeout: Duration,
}

impl ChatSettings {
    pub fn from_config(provider: &ProviderSettings) -> Self {
        Self {
            model: provider.model.clone(),
            temperature: Some(provider.temperature),
            max_tokens: provider.max_tokens,
            timeout: Duration::from_secs(provider.timeout_secs),
        }
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self::from_config(&ProviderSettings::default())
    }
}

/// Orchestrates a chat turn across the agent registry, the message store and
/// the completion provider.
///
/// Generic over the repository traits so the same logic runs against SQLite
/// and the in-memory store.
pub struct ChatService<A: AgentRepository, M: MessageRepository> {
    agent_repo: A,
    message_repo: M,
    provider: BoxLlmProvider,
    assembler: ContextAssembler,
    settings: ChatSettings,
}

impl<A: AgentRepository, M: MessageRepository> ChatService<A, M> {
    pub fn new(
        agent_repo: A,
        message_repo: M,
        provider: BoxLlmProvider,
        assembler: ContextAssembler,
        settings: ChatSettings,
    ) -> Self {
        Self {
            agent_repo,
            message_repo,
            provider,
            assembler,
            settings,
        }
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Number of prior turns sent with each message.
    pub fn context_window(&self) -> usize {
        self.assembler.window_size()
    }

    /// Send one user message to an agent and persist both sides of the turn.
    ///
    /// Errors:
    /// - `InvalidMessage` for a blank message (nothing written)
    /// - `NotFound` if the agent does not exist (nothing written)
    /// - `Inactive` if the agent is disabled (nothing written)
    /// - `Provider` if the completion fails or times out (user turn kept)
    pub async fn send_message(
        &self,
        agent_id: AgentId,
        message: &str,
    ) -> Result<ChatReply, AgentError> {
        debug!(agent_id = agent_id.0, state = "start", "chat turn");

        if message.trim().is_empty() {
            return Err(AgentError::InvalidMessage(
                "message cannot be empty".to_string(),
            ));
        }

        let agent = self
            .agent_repo
            .get_by_id(agent_id)
            .await?
            .ok_or(AgentError::NotFound)?;
        if !agent.is_active {
            return Err(AgentError::Inactive(agent.name));
        }
        debug!(agent_id = agent_id.0, state = "agent_loaded", "chat turn");

        let user_turn = self
            .message_repo
            .append(&NewChatMessage {
                agent_id,
                user_id: agent.user_id.clone(),
                role: MessageRole::User,
                content: message.to_string(),
                tool_calls: None,
            })
            .await?;
        debug!(
            agent_id = agent_id.0,
            message_id = user_turn.id,
            state = "user_turn_persisted",
            "chat turn"
        );

        // Prior turns only: the row just written and anything appended
        // concurrently after it stay out of the window.
        let prior: Vec<_> = self
            .message_repo
            .history(agent_id)
            .await?
            .into_iter()
            .filter(|m| m.id < user_turn.id)
            .collect();
        let messages = self
            .assembler
            .assemble(Some(&agent.system_prompt), &prior, message);
        debug!(
            agent_id = agent_id.0,
            context_messages = messages.len(),
            state = "context_assembled",
            "chat turn"
        );

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let response = match self.complete(agent_id, &request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    agent_id = agent_id.0,
                    user_message_id = user_turn.id,
                    error = %e,
                    state = "failed",
                    "completion failed, user turn kept"
                );
                return Err(AgentError::Provider(e));
            }
        };
        debug!(agent_id = agent_id.0, state = "provider_responded", "chat turn");

        let assistant_turn = self
            .message_repo
            .append(&NewChatMessage {
                agent_id,
                user_id: agent.user_id.clone(),
                role: MessageRole::Assistant,
                content: response.content.clone(),
                tool_calls: None,
            })
            .await?;
        debug!(
            agent_id = agent_id.0,
            message_id = assistant_turn.id,
            state = "assistant_turn_persisted",
            "chat turn"
        );

        info!(
            agent_id = agent_id.0,
            agent_name = %agent.name,
            message_id = assistant_turn.id,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "chat turn completed"
        );
        debug!(agent_id = agent_id.0, state = "done", "chat turn");

        Ok(ChatReply {
            message: response.content,
            agent_name: agent.name,
            message_id: assistant_turn.id,
        })
    }

    /// Call the provider inside a GenAI span, bounded by the configured timeout.
    async fn complete(
        &self,
        agent_id: AgentId,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        let span = info_span!(
            "gen_ai.chat",
            otel.name = %format!("chat {}", request.model),
            gen_ai.system = self.provider.name(),
            gen_ai.operation.name = "chat",
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
            arkagents.agent.id = agent_id.0,
        );

        let call = tokio::time::timeout(self.settings.timeout, self.provider.complete(request));
        let response = match call.instrument(span.clone()).await {
            Ok(result) => result?,
            Err(_) => return Err(LlmError::Timeout(self.settings.timeout.as_secs())),
        };

        span.record("gen_ai.usage.input_tokens", response.usage.input_tokens);
        span.record("gen_ai.usage.output_tokens", response.usage.output_tokens);
        Ok(response)
    }
}
