//! Conversation views derived from the message store.
//!
//! There is no conversation table: every message of one agent forms a single
//! pseudo-conversation whose id is `agent_{id}`.

use arkagents_types::agent::AgentId;
use arkagents_types::chat::{ChatMessage, Conversation, ConversationSummary, conversation_id};
use arkagents_types::error::AgentError;

use crate::repository::agent::AgentRepository;
use crate::repository::message::MessageRepository;

pub struct ConversationService<A: AgentRepository, M: MessageRepository> {
    agent_repo: A,
    message_repo: M,
}

impl<A: AgentRepository, M: MessageRepository> ConversationService<A, M> {
    pub fn new(agent_repo: A, message_repo: M) -> Self {
        Self {
            agent_repo,
            message_repo,
        }
    }

    /// One summary per agent that has messages, most recently active first.
    pub async fn list_sessions(
        &self,
        agent_id: Option<AgentId>,
    ) -> Result<Vec<ConversationSummary>, AgentError> {
        Ok(self.message_repo.summaries(agent_id).await?)
    }

    /// Every message of an agent as one conversation. Unknown agents yield
    /// an empty conversation.
    pub async fn conversation(&self, agent_id: AgentId) -> Result<Conversation, AgentError> {
        let messages = self.message_repo.history(agent_id).await?;
        Ok(Conversation {
            id: conversation_id(agent_id),
            agent_id,
            title: format!("Chat with Agent {agent_id}"),
            messages,
        })
    }

    /// Full history of an existing agent. `NotFound` if the agent is absent.
    pub async fn history(&self, agent_id: AgentId) -> Result<Vec<ChatMessage>, AgentError> {
        self.agent_repo
            .get_by_id(agent_id)
            .await?
            .ok_or(AgentError::NotFound)?;
        Ok(self.message_repo.history(agent_id).await?)
    }

    /// Remove all messages of an agent, keeping the agent. Returns the count.
    pub async fn clear(&self, agent_id: AgentId) -> Result<u64, AgentError> {
        let deleted = self.message_repo.delete_all(agent_id).await?;
        tracing::info!(agent_id = agent_id.0, deleted, "conversation cleared");
        Ok(deleted)
    }

    pub async fn count_messages(&self) -> Result<u64, AgentError> {
        Ok(self.message_repo.count_messages().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arkagents_types::agent::NewAgent;
    use arkagents_types::chat::{MessageRole, NewChatMessage};
    use chrono::Utc;

    use crate::repository::in_memory::InMemoryStore;

    async fn setup() -> (ConversationService<InMemoryStore, InMemoryStore>, InMemoryStore, AgentId) {
        let store = InMemoryStore::new();
        let agent = store
            .create(&NewAgent {
                user_id: "default_user".to_string(),
                name: "Luna".to_string(),
                description: String::new(),
                system_prompt: "You are Luna.".to_string(),
                is_active: true,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        let svc = ConversationService::new(store.clone(), store.clone());
        (svc, store, agent.id)
    }

    async fn say(store: &InMemoryStore, agent_id: AgentId, role: MessageRole, content: &str) {
        store
            .append(&NewChatMessage {
                agent_id,
                user_id: "default_user".to_string(),
                role,
                content: content.to_string(),
                tool_calls: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_session_spans_first_to_last_message() {
        let (svc, store, agent_id) = setup().await;
        say(&store, agent_id, MessageRole::User, "one").await;
        say(&store, agent_id, MessageRole::Assistant, "two").await;
        say(&store, agent_id, MessageRole::User, "three").await;

        let history = store.history(agent_id).await.unwrap();
        let sessions = svc.list_sessions(None).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].message_count, 3);
        assert_eq!(sessions[0].created_at, history[0].created_at);
        assert_eq!(sessions[0].updated_at, history[2].created_at);
    }

    #[tokio::test]
    async fn test_conversation_view() {
        let (svc, store, agent_id) = setup().await;
        say(&store, agent_id, MessageRole::User, "hello").await;

        let conversation = svc.conversation(agent_id).await.unwrap();
        assert_eq!(conversation.id, "agent_1");
        assert_eq!(conversation.title, "Chat with Agent 1");
        assert_eq!(conversation.messages.len(), 1);

        let empty = svc.conversation(AgentId(50)).await.unwrap();
        assert!(empty.messages.is_empty());
    }

    #[tokio::test]
    async fn test_history_requires_agent() {
        let (svc, _store, _agent_id) = setup().await;
        assert!(matches!(
            svc.history(AgentId(50)).await,
            Err(AgentError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_clear_keeps_agent_and_drops_session() {
        let (svc, store, agent_id) = setup().await;
        say(&store, agent_id, MessageRole::User, "a").await;
        say(&store, agent_id, MessageRole::Assistant, "b").await;

        assert_eq!(svc.clear(agent_id).await.unwrap(), 2);
        assert_eq!(svc.clear(agent_id).await.unwrap(), 0);
        assert!(svc.list_sessions(Some(agent_id)).await.unwrap().is_empty());
        assert!(svc.history(agent_id).await.unwrap().is_empty());
    }
}
