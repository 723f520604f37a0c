//! Banner and health check handlers.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use arkagents_core::repository::agent::AgentRepository;
use arkagents_core::repository::message::MessageRepository;

use crate::state::AppState;

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "ArkAgents API is running!" }))
}

/// GET /health - Liveness plus whether chat can reach a provider.
pub async fn health<A, M>(State(state): State<AppState<A, M>>) -> Json<Value>
where
    A: AgentRepository + 'static,
    M: MessageRepository + 'static,
{
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "provider_key_set": state.provider_key_set,
    }))
}
