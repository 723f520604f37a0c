//! Agent repository trait definition.

use arkagents_types::agent::{Agent, AgentId, AgentTool, CreateAgentToolRequest, NewAgent};
use arkagents_types::error::RepositoryError;

/// Repository trait for agent persistence.
///
/// The repository owns identity assignment: `create` returns the agent with
/// its new id. Deleting an agent must also remove its messages and tools.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait AgentRepository: Send + Sync {
    /// Persist a new agent and return it with its assigned id.
    fn create(
        &self,
        agent: &NewAgent,
    ) -> impl std::future::Future<Output = Result<Agent, RepositoryError>> + Send;

    /// Get an agent by id.
    fn get_by_id(
        &self,
        id: AgentId,
    ) -> impl std::future::Future<Output = Result<Option<Agent>, RepositoryError>> + Send;

    /// List agents ordered by id, optionally restricted to one owner.
    fn list(
        &self,
        owner: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Vec<Agent>, RepositoryError>> + Send;

    /// Overwrite the mutable fields of an existing agent. `NotFound` if absent.
    fn update(
        &self,
        agent: &Agent,
    ) -> impl std::future::Future<Output = Result<Agent, RepositoryError>> + Send;

    /// Delete an agent together with its messages and tools. `NotFound` if absent.
    fn delete(
        &self,
        id: AgentId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Total number of agents.
    fn count(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Register a tool on an agent. `NotFound` if the agent does not exist.
    fn add_tool(
        &self,
        agent_id: AgentId,
        tool: &CreateAgentToolRequest,
    ) -> impl std::future::Future<Output = Result<AgentTool, RepositoryError>> + Send;

    /// List the tools of an agent, oldest first.
    fn list_tools(
        &self,
        agent_id: AgentId,
    ) -> impl std::future::Future<Output = Result<Vec<AgentTool>, RepositoryError>> + Send;
}
