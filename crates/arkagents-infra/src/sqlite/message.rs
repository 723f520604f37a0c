//! SQLite message repository implementation.
//!
//! Implements `MessageRepository` over the `agent_messages` table. Session
//! summaries are computed with a grouped aggregate, never stored.

use arkagents_core::repository::message::MessageRepository;
use arkagents_types::agent::AgentId;
use arkagents_types::chat::{ChatMessage, ConversationSummary, MessageRole, NewChatMessage};
use arkagents_types::error::RepositoryError;
use chrono::Utc;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, map_write_error, parse_datetime};

/// SQLite-backed implementation of `MessageRepository`.
#[derive(Clone)]
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct MessageRow {
    id: i64,
    agent_id: i64,
    user_id: String,
    role: String,
    content: String,
    tool_calls: Option<String>,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            agent_id: row.try_get("agent_id")?,
            user_id: row.try_get("user_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            tool_calls: row.try_get("tool_calls")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let tool_calls = self
            .tool_calls
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| RepositoryError::Query(format!("invalid tool_calls JSON: {e}")))?;

        Ok(ChatMessage {
            id: self.id,
            agent_id: AgentId(self.agent_id),
            user_id: self.user_id,
            role,
            content: self.content,
            tool_calls,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl MessageRepository for SqliteMessageRepository {
    async fn append(&self, message: &NewChatMessage) -> Result<ChatMessage, RepositoryError> {
        if message.role == MessageRole::System {
            return Err(RepositoryError::Query(
                "system messages are not stored".to_string(),
            ));
        }

        let tool_calls = message
            .tool_calls
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let created_at = format_datetime(&Utc::now());

        let result = sqlx::query(
            "INSERT INTO agent_messages (agent_id, user_id, role, content, tool_calls, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(message.agent_id.0)
        .bind(&message.user_id)
        .bind(message.role.to_string())
        .bind(&message.content)
        .bind(&tool_calls)
        .bind(&created_at)
        .execute(&self.pool.writer)
        .await
        .map_err(map_write_error)?;

        Ok(ChatMessage {
            id: result.last_insert_rowid(),
            agent_id: message.agent_id,
            user_id: message.user_id.clone(),
            role: message.role,
            content: message.content.clone(),
            tool_calls: message.tool_calls.clone(),
            created_at: parse_datetime(&created_at)?,
        })
    }

    async fn history(&self, agent_id: AgentId) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM agent_messages WHERE agent_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(agent_id.0)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let message_row =
                MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(message_row.into_message()?);
        }

        Ok(messages)
    }

    async fn delete_all(&self, agent_id: AgentId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM agent_messages WHERE agent_id = ?")
            .bind(agent_id.0)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn summaries(
        &self,
        agent_id: Option<AgentId>,
    ) -> Result<Vec<ConversationSummary>, RepositoryError> {
        const AGGREGATE: &str = "SELECT agent_id, MIN(created_at) AS first_at, MAX(created_at) AS last_at, COUNT(*) AS message_count
             FROM agent_messages";
        const ORDER: &str = " GROUP BY agent_id ORDER BY last_at DESC, agent_id ASC";

        let sql = match agent_id {
            Some(_) => format!("{AGGREGATE} WHERE agent_id = ?{ORDER}"),
            None => format!("{AGGREGATE}{ORDER}"),
        };
        let mut query = sqlx::query(&sql);
        if let Some(id) = agent_id {
            query = query.bind(id.0);
        }
        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in &rows {
            let agent_id: i64 = row
                .try_get("agent_id")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let first_at: String = row
                .try_get("first_at")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let last_at: String = row
                .try_get("last_at")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let count: i64 = row
                .try_get("message_count")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;

            summaries.push(ConversationSummary::from_aggregate(
                AgentId(agent_id),
                parse_datetime(&first_at)?,
                parse_datetime(&last_at)?,
                count as u64,
            ));
        }

        Ok(summaries)
    }

    async fn count_messages(&self) -> Result<u64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM agent_messages")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count as u64)
    }
}
