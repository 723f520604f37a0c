//! Volatile storage backend implementing both repository traits.
//!
//! Data lives in concurrent maps and disappears with the process. Cloning an
//! `InMemoryStore` yields another handle to the same data.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use dashmap::DashMap;

use arkagents_types::agent::{Agent, AgentId, AgentTool, CreateAgentToolRequest, NewAgent};
use arkagents_types::chat::{ChatMessage, ConversationSummary, MessageRole, NewChatMessage};
use arkagents_types::error::RepositoryError;

use super::agent::AgentRepository;
use super::message::MessageRepository;

#[derive(Default)]
struct Inner {
    agents: DashMap<AgentId, Agent>,
    messages: DashMap<AgentId, Vec<ChatMessage>>,
    tools: DashMap<AgentId, Vec<AgentTool>>,
    next_agent_id: AtomicI64,
    next_message_id: AtomicI64,
    next_tool_id: AtomicI64,
}

/// In-process store for agents, their tools and their messages.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id(counter: &AtomicI64) -> i64 {
    counter.fetch_add(1, Ordering::SeqCst) + 1
}

impl AgentRepository for InMemoryStore {
    async fn create(&self, agent: &NewAgent) -> Result<Agent, RepositoryError> {
        let id = AgentId(next_id(&self.inner.next_agent_id));
        let created = Agent {
            id,
            user_id: agent.user_id.clone(),
            name: agent.name.clone(),
            description: agent.description.clone(),
            system_prompt: agent.system_prompt.clone(),
            is_active: agent.is_active,
            created_at: agent.created_at,
            updated_at: agent.created_at,
        };
        self.inner.agents.insert(id, created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: AgentId) -> Result<Option<Agent>, RepositoryError> {
        Ok(self.inner.agents.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list(&self, owner: Option<&str>) -> Result<Vec<Agent>, RepositoryError> {
        let mut agents: Vec<Agent> = self
            .inner
            .agents
            .iter()
            .filter(|entry| owner.is_none_or(|o| entry.value().user_id == o))
            .map(|entry| entry.value().clone())
            .collect();
        agents.sort_by_key(|a| a.id);
        Ok(agents)
    }

    async fn update(&self, agent: &Agent) -> Result<Agent, RepositoryError> {
        let mut entry = self
            .inner
            .agents
            .get_mut(&agent.id)
            .ok_or(RepositoryError::NotFound)?;
        let stored = entry.value_mut();
        stored.name = agent.name.clone();
        stored.description = agent.description.clone();
        stored.system_prompt = agent.system_prompt.clone();
        stored.is_active = agent.is_active;
        stored.updated_at = agent.updated_at;
        Ok(stored.clone())
    }

    async fn delete(&self, id: AgentId) -> Result<(), RepositoryError> {
        // Agent first: a concurrent append holding the agent entry finishes
        // before the remove, so its message is swept below.
        self.inner
            .agents
            .remove(&id)
            .ok_or(RepositoryError::NotFound)?;
        self.inner.messages.remove(&id);
        self.inner.tools.remove(&id);
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.inner.agents.len() as u64)
    }

    async fn add_tool(
        &self,
        agent_id: AgentId,
        tool: &CreateAgentToolRequest,
    ) -> Result<AgentTool, RepositoryError> {
        let _agent = self
            .inner
            .agents
            .get(&agent_id)
            .ok_or(RepositoryError::NotFound)?;
        let created = AgentTool {
            id: next_id(&self.inner.next_tool_id),
            agent_id,
            tool_name: tool.tool_name.clone(),
            tool_description: tool.tool_description.clone(),
            webhook_url: tool.webhook_url.clone(),
            parameters: tool.parameters.clone(),
            created_at: Utc::now(),
        };
        self.inner
            .tools
            .entry(agent_id)
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn list_tools(&self, agent_id: AgentId) -> Result<Vec<AgentTool>, RepositoryError> {
        Ok(self
            .inner
            .tools
            .get(&agent_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}

impl MessageRepository for InMemoryStore {
    async fn append(&self, message: &NewChatMessage) -> Result<ChatMessage, RepositoryError> {
        if message.role == MessageRole::System {
            return Err(RepositoryError::Query(
                "system messages are not stored".to_string(),
            ));
        }

        // Holding the agent entry keeps a concurrent delete from interleaving.
        let _agent = self
            .inner
            .agents
            .get(&message.agent_id)
            .ok_or(RepositoryError::NotFound)?;

        let stored = ChatMessage {
            id: next_id(&self.inner.next_message_id),
            agent_id: message.agent_id,
            user_id: message.user_id.clone(),
            role: message.role,
            content: message.content.clone(),
            tool_calls: message.tool_calls.clone(),
            created_at: Utc::now(),
        };
        self.inner
            .messages
            .entry(message.agent_id)
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn history(&self, agent_id: AgentId) -> Result<Vec<ChatMessage>, RepositoryError> {
        let mut history = self
            .inner
            .messages
            .get(&agent_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();
        history.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(history)
    }

    async fn delete_all(&self, agent_id: AgentId) -> Result<u64, RepositoryError> {
        Ok(self
            .inner
            .messages
            .remove(&agent_id)
            .map(|(_, messages)| messages.len() as u64)
            .unwrap_or(0))
    }

    async fn summaries(
        &self,
        agent_id: Option<AgentId>,
    ) -> Result<Vec<ConversationSummary>, RepositoryError> {
        let mut summaries: Vec<ConversationSummary> = self
            .inner
            .messages
            .iter()
            .filter(|entry| agent_id.is_none_or(|id| *entry.key() == id))
            .filter_map(|entry| {
                let messages = entry.value();
                let first = messages.iter().map(|m| m.created_at).min()?;
                let last = messages.iter().map(|m| m.created_at).max()?;
                Some(ConversationSummary::from_aggregate(
                    *entry.key(),
                    first,
                    last,
                    messages.len() as u64,
                ))
            })
            .collect();
        summaries.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then(a.agent_id.cmp(&b.agent_id))
        });
        Ok(summaries)
    }

    async fn count_messages(&self) -> Result<u64, RepositoryError> {
        Ok(self
            .inner
            .messages
            .iter()
            .map(|entry| entry.value().len() as u64)
            .sum())
    }
}
