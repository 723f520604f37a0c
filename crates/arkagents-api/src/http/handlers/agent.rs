//! Agent CRUD, tool registry and chat handlers for the REST API.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use arkagents_core::repository::agent::AgentRepository;
use arkagents_core::repository::message::MessageRepository;
use arkagents_types::agent::{
    Agent, AgentId, AgentTool, CreateAgentRequest, CreateAgentToolRequest, UpdateAgentRequest,
};
use arkagents_types::chat::ChatReply;

use crate::http::error::AppError;
use crate::state::AppState;

/// Body of a chat request.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// POST /api/agents - Create a new agent.
pub async fn create_agent<A, M>(
    State(state): State<AppState<A, M>>,
    Json(body): Json<CreateAgentRequest>,
) -> Result<(StatusCode, Json<Agent>), AppError>
where
    A: AgentRepository + 'static,
    M: MessageRepository + 'static,
{
    let agent = state.agent_service.create_agent(body).await?;
    Ok((StatusCode::CREATED, Json(agent)))
}

/// GET /api/agents - List all agents in id order.
pub async fn list_agents<A, M>(
    State(state): State<AppState<A, M>>,
) -> Result<Json<Value>, AppError>
where
    A: AgentRepository + 'static,
    M: MessageRepository + 'static,
{
    let agents = state.agent_service.list_agents(None).await?;
    Ok(Json(json!({ "agents": agents })))
}

/// GET /api/agents/{id} - Get a single agent.
pub async fn get_agent<A, M>(
    State(state): State<AppState<A, M>>,
    Path(id): Path<AgentId>,
) -> Result<Json<Agent>, AppError>
where
    A: AgentRepository + 'static,
    M: MessageRepository + 'static,
{
    let agent = state.agent_service.get_agent(id).await?;
    Ok(Json(agent))
}

/// PUT /api/agents/{id} - Update the fields present in the body.
pub async fn update_agent<A, M>(
    State(state): State<AppState<A, M>>,
    Path(id): Path<AgentId>,
    Json(body): Json<UpdateAgentRequest>,
) -> Result<Json<Agent>, AppError>
where
    A: AgentRepository + 'static,
    M: MessageRepository + 'static,
{
    let agent = state.agent_service.update_agent(id, body).await?;
    Ok(Json(agent))
}

/// DELETE /api/agents/{id} - Delete an agent with its messages and tools.
pub async fn delete_agent<A, M>(
    State(state): State<AppState<A, M>>,
    Path(id): Path<AgentId>,
) -> Result<Json<Value>, AppError>
where
    A: AgentRepository + 'static,
    M: MessageRepository + 'static,
{
    state.agent_service.delete_agent(id).await?;
    Ok(Json(json!({ "message": "Agent deleted successfully" })))
}

/// POST /api/agents/{id}/chat - Send a message and wait for the reply.
pub async fn chat<A, M>(
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

/// GET /api/agents/{id}/conversation - Full message history of one agent.
pub async fn get_conversation<A, M>(
    State(state): State<AppState<A, M>>,
    Path(id): Path<AgentId>,
) -> Result<Json<Value>, AppError>
where
    A: AgentRepository + 'static,
    M: MessageRepository + 'static,
{
    let history = state.conversation_service.history(id).await?;
    Ok(Json(json!({ "agent_id": id, "conversation": history })))
}

/// GET /api/agents/{id}/tools - List the tools registered on an agent.
pub async fn list_tools<A, M>(
    State(state): State<AppState<A, M>>,
    Path(id): Path<AgentId>,
) -> Result<Json<Value>, AppError>
where
    A: AgentRepository + 'static,
    M: MessageRepository + 'static,
{
    let tools = state.agent_service.list_tools(id).await?;
    Ok(Json(json!({ "tools": tools })))
}

/// POST /api/agents/{id}/tools - Register a tool on an agent.
pub async fn add_tool<A, M>(
    State(state): State<AppState<A, M>>,
    Path(id): Path<AgentId>,
    Json(body): Json<CreateAgentToolRequest>,
) -> Result<(StatusCode, Json<AgentTool>), AppError>
where
    A: AgentRepository + 'static,
    M: MessageRepository + 'static,
{
    let tool = state.agent_service.add_tool(id, body).await?;
    Ok((StatusCode::CREATED, Json(tool)))
}
