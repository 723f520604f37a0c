//! Message store trait definition.
//!
//! The message store is an append-only log of chat turns keyed by agent.
//! Conversation summaries are aggregates over this log, never stored rows.

use arkagents_types::agent::AgentId;
use arkagents_types::chat::{ChatMessage, ConversationSummary, NewChatMessage};
use arkagents_types::error::RepositoryError;

/// Repository trait for chat message persistence.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait MessageRepository: Send + Sync {
    /// Append a chat turn, assigning its id and timestamp.
    ///
    /// Returns `NotFound` if the agent does not exist and `Query` if the role
    /// is not `user` or `assistant`.
    fn append(
        &self,
        message: &NewChatMessage,
    ) -> impl std::future::Future<Output = Result<ChatMessage, RepositoryError>> + Send;

    /// Full history of an agent, ordered by created_at ASC then id ASC.
    fn history(
        &self,
        agent_id: AgentId,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Remove every message of an agent. Returns the number removed (0 if none).
    fn delete_all(
        &self,
        agent_id: AgentId,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// One summary per agent with at least one message, newest activity first.
    fn summaries(
        &self,
        agent_id: Option<AgentId>,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationSummary>, RepositoryError>> + Send;

    /// Total number of messages across all agents.
    fn count_messages(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
