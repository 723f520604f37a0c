//! LlmProvider trait definition.
//!
//! This is the single seam between the chat orchestrator and any external
//! completion service.

use arkagents_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for completion provider backends (Groq, any OpenAI-compatible API).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in arkagents-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "groq", "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    ///
    /// The system prompt, when present, is the first message of the request.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
