//! SQLite agent repository implementation.
//!
//! Implements `AgentRepository` from `arkagents-core` using sqlx with split
//! read/write pools. Agent tools live in the `agent_tools` table and are
//! removed with their agent through `ON DELETE CASCADE`, as are messages.

use arkagents_core::repository::agent::AgentRepository;
use arkagents_types::agent::{Agent, AgentId, AgentTool, CreateAgentToolRequest, NewAgent};
use arkagents_types::error::RepositoryError;
use chrono::Utc;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, map_write_error, parse_datetime};

/// SQLite-backed implementation of `AgentRepository`.
#[derive(Clone)]
pub struct SqliteAgentRepository {
    pool: DatabasePool,
}

impl SqliteAgentRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Agent.
struct AgentRow {
    id: i64,
    user_id: String,
    name: String,
    description: String,
    system_prompt: String,
    is_active: bool,
    created_at: String,
    updated_at: String,
}

impl AgentRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            system_prompt: row.try_get("system_prompt")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_agent(self) -> Result<Agent, RepositoryError> {
        Ok(Agent {
            id: AgentId(self.id),
            user_id: self.user_id,
            name: self.name,
            description: self.description,
            system_prompt: self.system_prompt,
            is_active: self.is_active,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

struct ToolRow {
    id: i64,
    agent_id: i64,
    tool_name: String,
    tool_description: String,
    webhook_url: Option<String>,
    parameters: Option<String>,
    created_at: String,
}

impl ToolRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            agent_id: row.try_get("agent_id")?,
            tool_name: row.try_get("tool_name")?,
            tool_description: row.try_get("tool_description")?,
            webhook_url: row.try_get("webhook_url")?,
            parameters: row.try_get("parameters")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_tool(self) -> Result<AgentTool, RepositoryError> {
        let parameters = self
            .parameters
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| RepositoryError::Query(format!("invalid parameters JSON: {e}")))?;

        Ok(AgentTool {
            id: self.id,
            agent_id: AgentId(self.agent_id),
            tool_name: self.tool_name,
            tool_description: self.tool_description,
            webhook_url: self.webhook_url,
            parameters,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl AgentRepository for SqliteAgentRepository {
    async fn create(&self, agent: &NewAgent) -> Result<Agent, RepositoryError> {
        let created_at = format_datetime(&agent.created_at);

        let result = sqlx::query(
            "INSERT INTO agents (user_id, name, description, system_prompt, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&agent.user_id)
        .bind(&agent.name)
        .bind(&agent.description)
        .bind(&agent.system_prompt)
        .bind(agent.is_active)
        .bind(&created_at)
        .bind(&created_at)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Agent {
            id: AgentId(result.last_insert_rowid()),
            user_id: agent.user_id.clone(),
            name: agent.name.clone(),
            description: agent.description.clone(),
            system_prompt: agent.system_prompt.clone(),
            is_active: agent.is_active,
            created_at: parse_datetime(&created_at)?,
            updated_at: parse_datetime(&created_at)?,
        })
    }

    async fn get_by_id(&self, id: AgentId) -> Result<Option<Agent>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM agents WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let agent_row =
                    AgentRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(agent_row.into_agent()?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self, owner: Option<&str>) -> Result<Vec<Agent>, RepositoryError> {
        let rows = match owner {
            Some(owner) => {
                sqlx::query("SELECT * FROM agents WHERE user_id = ? ORDER BY id ASC")
                    .bind(owner)
                    .fetch_all(&self.pool.reader)
                    .await
            }
            None => {
                sqlx::query("SELECT * FROM agents ORDER BY id ASC")
                    .fetch_all(&self.pool.reader)
                    .await
            }
        }
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut agents = Vec::with_capacity(rows.len());
        for row in &rows {
            let agent_row =
                AgentRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            agents.push(agent_row.into_agent()?);
        }

        Ok(agents)
    }

    async fn update(&self, agent: &Agent) -> Result<Agent, RepositoryError> {
        let result = sqlx::query(
            "UPDATE agents SET name = ?, description = ?, system_prompt = ?, is_active = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&agent.name)
        .bind(&agent.description)
        .bind(&agent.system_prompt)
        .bind(agent.is_active)
        .bind(format_datetime(&agent.updated_at))
        .bind(agent.id.0)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(agent.clone())
    }

    async fn delete(&self, id: AgentId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM agents WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM agents")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count as u64)
    }

    async fn add_tool(
        &self,
        agent_id: AgentId,
        tool: &CreateAgentToolRequest,
    ) -> Result<AgentTool, RepositoryError> {
        let parameters = tool
            .parameters
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let created_at = format_datetime(&Utc::now());

        let result = sqlx::query(
            "INSERT INTO agent_tools (agent_id, tool_name, tool_description, webhook_url, parameters, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(agent_id.0)
        .bind(&tool.tool_name)
        .bind(&tool.tool_description)
        .bind(&tool.webhook_url)
        .bind(&parameters)
        .bind(&created_at)
        .execute(&self.pool.writer)
        .await
        .map_err(map_write_error)?;

        Ok(AgentTool {
            id: result.last_insert_rowid(),
            agent_id,
            tool_name: tool.tool_name.clone(),
            tool_description: tool.tool_description.clone(),
            webhook_url: tool.webhook_url.clone(),
            parameters: tool.parameters.clone(),
            created_at: parse_datetime(&created_at)?,
        })
    }

    async fn list_tools(&self, agent_id: AgentId) -> Result<Vec<AgentTool>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM agent_tools WHERE agent_id = ? ORDER BY id ASC")
            .bind(agent_id.0)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut tools = Vec::with_capacity(rows.len());
        for row in &rows {
            let tool_row =
                ToolRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            tools.push(tool_row.into_tool()?);
        }

        Ok(tools)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::{DatabasePool, default_database_url};

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let url = default_database_url(dir.path());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn make_agent(name: &str) -> NewAgent {
        NewAgent {
            user_id: "default_user".to_string(),
            name: name.to_string(),
            description: format!("A {name} agent"),
            system_prompt: format!("You are {name}."),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_by_id() {
        let repo = SqliteAgentRepository::new(test_pool().await);

        let created = repo.create(&make_agent("Luna")).await.unwrap();
        assert_eq!(created.id, AgentId(1));

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_nonexistent_returns_none() {
        let repo = SqliteAgentRepository::new(test_pool().await);
        assert!(repo.get_by_id(AgentId(404)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_ordered_by_id_and_filtered() {
        let repo = SqliteAgentRepository::new(test_pool().await);
        repo.create(&make_agent("Alpha")).await.unwrap();
        let mut other = make_agent("Beta");
        other.user_id = "someone_else".to_string();
        repo.create(&other).await.unwrap();
        repo.create(&make_agent("Gamma")).await.unwrap();

        let all = repo.list(None).await.unwrap();
        let names: Vec<&str> = all.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Gamma"]);

        let mine = repo.list(Some("default_user")).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_update_agent() {
        let repo = SqliteAgentRepository::new(test_pool().await);
        let mut agent = repo.create(&make_agent("Luna")).await.unwrap();

        agent.name = "Luna Prime".to_string();
        agent.is_active = false;
        agent.updated_at = Utc::now();
        repo.update(&agent).await.unwrap();

        let fetched = repo.get_by_id(agent.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Luna Prime");
        assert!(!fetched.is_active);
        assert_eq!(fetched.created_at, agent.created_at);
    }

    #[tokio::test]
    async fn test_update_nonexistent_returns_not_found() {
        let repo = SqliteAgentRepository::new(test_pool().await);
        let mut agent = repo.create(&make_agent("Luna")).await.unwrap();
        agent.id = AgentId(77);
        assert!(matches!(
            repo.update(&agent).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_agent() {
        let repo = SqliteAgentRepository::new(test_pool().await);
        let agent = repo.create(&make_agent("Luna")).await.unwrap();

        repo.delete(agent.id).await.unwrap();
        assert!(repo.get_by_id(agent.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(agent.id).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_tools_roundtrip_and_cascade() {
        let repo = SqliteAgentRepository::new(test_pool().await);
        let agent = repo.create(&make_agent("Luna")).await.unwrap();

        let tool = repo
            .add_tool(
                agent.id,
                &CreateAgentToolRequest {
                    tool_name: "weather".to_string(),
                    tool_description: "Current weather".to_string(),
                    webhook_url: Some("https://hooks.example.com/weather".to_string()),
                    parameters: Some(serde_json::json!({"city": {"type": "string"}})),
                },
            )
            .await
            .unwrap();

        let tools = repo.list_tools(agent.id).await.unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].id, tool.id);
        assert_eq!(
            tools[0].parameters,
            Some(serde_json::json!({"city": {"type": "string"}}))
        );

        repo.delete(agent.id).await.unwrap();
        assert!(repo.list_tools(agent.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_tool_to_missing_agent() {
        let repo = SqliteAgentRepository::new(test_pool().await);
        let result = repo
            .add_tool(
                AgentId(12),
                &CreateAgentToolRequest {
                    tool_name: "weather".to_string(),
                    tool_description: String::new(),
                    webhook_url: None,
                    parameters: None,
                },
            )
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }
}
