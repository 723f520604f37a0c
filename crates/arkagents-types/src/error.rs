use thiserror::Error;

use crate::llm::LlmError;

/// Errors related to agent and chat operations.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent not found")]
    NotFound,

    #[error("invalid agent name: {0}")]
    InvalidName(String),

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("agent '{0}' is inactive and cannot chat")]
    Inactive(String),

    #[error("completion provider error: {0}")]
    Provider(#[from] LlmError),

    #[error("storage error: {0}")]
    StorageError(String),
}

impl From<RepositoryError> for AgentError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => AgentError::NotFound,
            other => AgentError::StorageError(other.to_string()),
        }
    }
}

/// Errors from repository operations (used by trait definitions in arkagents-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}
