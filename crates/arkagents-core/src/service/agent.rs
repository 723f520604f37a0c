//! Agent management service.
//!
//! Validates requests, synthesizes default system prompts, and delegates
//! persistence to an [`AgentRepository`].

use chrono::Utc;

use arkagents_types::agent::{
    Agent, AgentId, AgentTool, CreateAgentRequest, CreateAgentToolRequest, DEFAULT_USER_ID,
    NewAgent, UpdateAgentRequest, resolve_system_prompt,
};
use arkagents_types::error::AgentError;

use crate::repository::agent::AgentRepository;

/// Service orchestrating the agent lifecycle.
pub struct AgentService<A: AgentRepository> {
    repo: A,
    /// Owner assigned to newly created agents.
    owner: String,
}

impl<A: AgentRepository> AgentService<A> {
    pub fn new(repo: A) -> Self {
        Self::with_owner(repo, DEFAULT_USER_ID)
    }

    pub fn with_owner(repo: A, owner: impl Into<String>) -> Self {
        Self {
            repo,
            owner: owner.into(),
        }
    }

    /// Create a new agent.
    ///
    /// The name must not be blank. When no system prompt is given (or it is
    /// blank) one is synthesized from the name and description.
    pub async fn create_agent(&self, request: CreateAgentRequest) -> Result<Agent, AgentError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(AgentError::InvalidName("name cannot be empty".to_string()));
        }

        let system_prompt =
            resolve_system_prompt(request.system_prompt.as_deref(), &name, &request.description);

        let agent = self
            .repo
            .create(&NewAgent {
                user_id: self.owner.clone(),
                name,
                description: request.description,
                system_prompt,
                is_active: true,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(agent_id = agent.id.0, name = %agent.name, "agent created");
        Ok(agent)
    }

    /// Get an agent by id.
    pub async fn get_agent(&self, id: AgentId) -> Result<Agent, AgentError> {
        self.repo.get_by_id(id).await?.ok_or(AgentError::NotFound)
    }

    /// List agents ordered by id, optionally filtered by owner.
    pub async fn list_agents(&self, owner: Option<&str>) -> Result<Vec<Agent>, AgentError> {
        Ok(self.repo.list(owner).await?)
    }

    /// Update an existing agent's fields.
    ///
    /// Only the fields present in the request change. A blank system prompt
    /// is replaced by the default built from the resulting name and
    /// description.
    pub async fn update_agent(
        &self,
        id: AgentId,
        request: UpdateAgentRequest,
    ) -> Result<Agent, AgentError> {
        let mut agent = self.get_agent(id).await?;

        if let Some(name) = request.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AgentError::InvalidName("name cannot be empty".to_string()));
            }
            agent.name = name;
        }
        if let Some(description) = request.description {
            agent.description = description;
        }
        if let Some(prompt) = request.system_prompt {
            agent.system_prompt =
                resolve_system_prompt(Some(&prompt), &agent.name, &agent.description);
        }
        if let Some(is_active) = request.is_active {
            agent.is_active = is_active;
        }
        agent.updated_at = Utc::now();

        let agent = self.repo.update(&agent).await?;
        tracing::info!(agent_id = agent.id.0, "agent updated");
        Ok(agent)
    }

    /// Delete an agent together with its messages and tools.
    pub async fn delete_agent(&self, id: AgentId) -> Result<(), AgentError> {
        self.repo.delete(id).await?;
        tracing::info!(agent_id = id.0, "agent deleted");
        Ok(())
    }

    pub async fn count_agents(&self) -> Result<u64, AgentError> {
        Ok(self.repo.count().await?)
    }

    /// Register a tool definition on an agent. Tools are stored, never invoked.
    pub async fn add_tool(
        &self,
        id: AgentId,
        request: CreateAgentToolRequest,
    ) -> Result<AgentTool, AgentError> {
        if request.tool_name.trim().is_empty() {
            return Err(AgentError::InvalidName(
                "tool name cannot be empty".to_string(),
            ));
        }
        let tool = self.repo.add_tool(id, &request).await?;
        tracing::info!(agent_id = id.0, tool = %tool.tool_name, "tool registered");
        Ok(tool)
    }

    /// List the tools registered on an agent. `NotFound` if the agent is absent.
    pub async fn list_tools(&self, id: AgentId) -> Result<Vec<AgentTool>, AgentError> {
        self.get_agent(id).await?;
        Ok(self.repo.list_tools(id).await?)
    }
}
