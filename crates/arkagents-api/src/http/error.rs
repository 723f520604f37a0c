//! Application error type mapping to HTTP status codes and the error envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use arkagents_types::error::AgentError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Agent, chat and storage errors from the services.
    Agent(AgentError),
}

impl From<AgentError> for AppError {
    fn from(e: AgentError) -> Self {
        AppError::Agent(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Agent(AgentError::NotFound) => {
                (StatusCode::NOT_FOUND, "AGENT_NOT_FOUND", "Agent not found".to_string())
            }
            AppError::Agent(
                e @ (AgentError::InvalidName(_)
                | AgentError::InvalidMessage(_)
                | AgentError::Inactive(_)),
            ) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),
            AppError::Agent(AgentError::Provider(e)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "PROVIDER_ERROR", e.to_string())
            }
            AppError::Agent(e @ AgentError::StorageError(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(code, "{message}");
        }

        let body = json!({
            "errors": [{
                "code": code,
                "message": message,
            }],
            "meta": {
                "request_id": uuid::Uuid::now_v7().to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}
