//! Conversation listing, viewing and clearing handlers.
//!
//! Conversations are derived from the message log, one per agent.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use arkagents_core::repository::agent::AgentRepository;
use arkagents_core::repository::message::MessageRepository;
use arkagents_types::agent::AgentId;
use arkagents_types::chat::{ChatReply, Conversation};

use crate::http::error::AppError;
use crate::http::handlers::agent::ChatRequest;
use crate::state::AppState;

/// Query parameters for listing conversations.
#[derive(Debug, Default, Deserialize)]
pub struct ConversationListQuery {
    pub agent_id: Option<AgentId>,
}

/// GET /api/conversations - Summaries, most recently active first.
pub async fn list_conversations<A, M>(
    State(state): State<AppState<A, M>>,
    Query(query): Query<ConversationListQuery>,
) -> Result<Json<Value>, AppError>
where
    A: AgentRepository + 'static,
    M: MessageRepository + 'static,
{
    let conversations = state
        .conversation_service
        .list_sessions(query.agent_id)
        .await?;
    Ok(Json(json!({ "conversations": conversations })))
}

/// GET /api/conversations/agent/{id} - One agent's messages as a conversation.
pub async fn get_conversation<A, M>(
    State(state): State<AppState<A, M>>,
    Path(id): Path<AgentId>,
) -> Result<Json<Conversation>, AppError>
where
    A: AgentRepository + 'static,
    M: MessageRepository + 'static,
{
    let conversation = state.conversation_service.conversation(id).await?;
    Ok(Json(conversation))
}

/// POST /api/conversations/agent/{id}/message - Same as the agent chat endpoint.
pub async fn send_message<A, M>(
    State(state): State<AppState<A, M>>,
    Path(id): Path<AgentId>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError>
where
    A: AgentRepository + 'static,
    M: MessageRepository + 'static,
{
    let reply = state.chat_service.send_message(id, &body.message).await?;
    Ok(Json(reply))
}

/// DELETE /api/conversations/agent/{id} - Remove every message of an agent.
pub async fn clear_conversation<A, M>(
    State(state): State<AppState<A, M>>,
    Path(id): Path<AgentId>,
) -> Result<Json<Value>, AppError>
where
    A: AgentRepository + 'static,
    M: MessageRepository + 'static,
{
    let deleted = state.conversation_service.clear(id).await?;
    Ok(Json(json!({
        "success": true,
        "deleted": deleted,
        "message": format!("Deleted {deleted} messages"),
    })))
}
