//! Chat message and derived conversation types for ArkAgents.
//!
//! Messages form a flat, append-only log keyed by agent. Conversations are
//! not stored: a [`ConversationSummary`] is recomputed from the log on every
//! listing request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::AgentId;

// Re-export MessageRole from llm module (it's used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// A single persisted chat turn.
///
/// Ordered by `created_at`, ties broken by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub agent_id: AgentId,
    pub user_id: String,
    /// Either `user` or `assistant`; the store rejects `system`.
    pub role: MessageRole,
    pub content: String,
    /// Reserved structured payload. Stored and returned, never populated by chat.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// A chat turn about to be appended to the store.
#[derive(Debug, Clone)]
pub struct NewChatMessage {
    pub agent_id: AgentId,
    pub user_id: String,
    pub role: MessageRole,
    pub content: String,
    pub tool_calls: Option<serde_json::Value>,
}

/// Derived pseudo-conversation: every message of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// Pseudo id, `agent_{agent_id}`.
    pub id: String,
    pub agent_id: AgentId,
    pub title: String,
    pub message_count: u64,
    /// Timestamp of the first message.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last message.
    pub updated_at: DateTime<Utc>,
}

impl ConversationSummary {
    /// Build a summary from the aggregate of one agent's messages.
    pub fn from_aggregate(
        agent_id: AgentId,
        first_message: DateTime<Utc>,
        last_message: DateTime<Utc>,
        message_count: u64,
    ) -> Self {
        Self {
            id: conversation_id(agent_id),
            agent_id,
            title: session_title(&first_message),
            message_count,
            created_at: first_message,
            updated_at: last_message,
        }
    }
}

/// Full message history of an agent, presented as one conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub agent_id: AgentId,
    pub title: String,
    pub messages: Vec<ChatMessage>,
}

/// Outcome of a successful send: the assistant reply and where it was stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub message: String,
    pub agent_name: String,
    pub message_id: i64,
}

/// Pseudo conversation id for an agent.
pub fn conversation_id(agent_id: AgentId) -> String {
    format!("agent_{agent_id}")
}

/// Human-readable title derived from the first message time, e.g. `Chat - Oct 11, 02:05 PM`.
pub fn session_title(first_message: &DateTime<Utc>) -> String {
    format!("Chat - {}", first_message.format("%b %d, %I:%M %p"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_session_title_format() {
        let t = Utc.with_ymd_and_hms(2025, 10, 11, 14, 5, 0).unwrap();
        assert_eq!(session_title(&t), "Chat - Oct 11, 02:05 PM");
    }

    #[test]
    fn test_summary_from_aggregate() {
        let t1 = Utc.with_ymd_and_hms(2025, 1, 2, 9, 0, 0).unwrap();
        let t3 = Utc.with_ymd_and_hms(2025, 1, 2, 9, 30, 0).unwrap();
        let summary = ConversationSummary::from_aggregate(AgentId(3), t1, t3, 3);
        assert_eq!(summary.id, "agent_3");
        assert_eq!(summary.created_at, t1);
        assert_eq!(summary.updated_at, t3);
        assert_eq!(summary.message_count, 3);
        assert!(summary.title.starts_with("Chat - Jan 02"));
    }

    #[test]
    fn test_message_role_reexport() {
        let role = MessageRole::Assistant;
        assert_eq!(role.to_string(), "assistant");
    }

    #[test]
    fn test_chat_message_omits_empty_tool_calls() {
        let msg = ChatMessage {
            id: 1,
            agent_id: AgentId(1),
            user_id: "default_user".to_string(),
            role: MessageRole::User,
            content: "hi".to_string(),
            tool_calls: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("tool_calls"));
        assert!(json.contains("\"role\":\"user\""));
    }
}
