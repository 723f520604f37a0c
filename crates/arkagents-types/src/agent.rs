use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Placeholder owner used until authentication exists.
pub const DEFAULT_USER_ID: &str = "default_user";

/// Unique identifier for an agent, assigned by the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub i64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AgentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<i64> for AgentId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// An agent: a named persona defined by a system prompt.
///
/// `system_prompt` is never empty once the agent has been created; see
/// [`default_system_prompt`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    /// Owner of the agent. Always [`DEFAULT_USER_ID`] until auth exists.
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub system_prompt: String,
    /// Inactive agents are visible but cannot chat.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An agent that has not been persisted yet (no id).
#[derive(Debug, Clone)]
pub struct NewAgent {
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub system_prompt: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Request to create a new agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAgentRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
}

/// Request to update an existing agent. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAgentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub system_prompt: Option<String>,
    pub is_active: Option<bool>,
}

/// A named capability attached to an agent, backed by an external webhook.
///
/// Tools are registered and listed only; nothing invokes them yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTool {
    pub id: i64,
    pub agent_id: AgentId,
    pub tool_name: String,
    pub tool_description: String,
    pub webhook_url: Option<String>,
    pub parameters: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Request to register a tool on an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAgentToolRequest {
    pub tool_name: String,
    pub tool_description: String,
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub parameters: Option<serde_json::Value>,
}

/// Synthesize the system prompt used when an agent is created without one.
pub fn default_system_prompt(name: &str, description: &str) -> String {
    format!(
        "You are {name}, an AI assistant that helps with {description}.\n\n\
         You are helpful, accurate, and efficient. Always provide clear and actionable responses.\n\
         If you're not sure about something, ask for clarification."
    )
}

/// Return the provided prompt, or the synthesized default when it is absent or blank.
pub fn resolve_system_prompt(prompt: Option<&str>, name: &str, description: &str) -> String {
    match prompt.map(str::trim) {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => default_system_prompt(name, description),
    }
}
