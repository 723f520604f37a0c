//! Axum router configuration with middleware.
//!
//! Agent and conversation routes are under `/api/`; the banner and health
//! check sit at the root. Middleware: CORS (any origin) and request tracing.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use arkagents_core::repository::agent::AgentRepository;
use arkagents_core::repository::message::MessageRepository;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router<A, M>(state: AppState<A, M>) -> Router
where
    A: AgentRepository + 'static,
    M: MessageRepository + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Agent CRUD
        .route(
            "/agents",
            post(handlers::agent::create_agent::<A, M>).get(handlers::agent::list_agents::<A, M>),
        )
        .route("/agents/create", post(handlers::agent::create_agent::<A, M>))
        .route("/agents/list", get(handlers::agent::list_agents::<A, M>))
        .route(
            "/agents/{id}",
            get(handlers::agent::get_agent::<A, M>)
                .put(handlers::agent::update_agent::<A, M>)
                .delete(handlers::agent::delete_agent::<A, M>),
        )
        // Chat
        .route("/agents/{id}/chat", post(handlers::agent::chat::<A, M>))
        .route(
            "/agents/{id}/conversation",
            get(handlers::agent::get_conversation::<A, M>),
        )
        // Tools
        .route(
            "/agents/{id}/tools",
            get(handlers::agent::list_tools::<A, M>).post(handlers::agent::add_tool::<A, M>),
        )
        // Conversations
        .route(
            "/conversations",
            get(handlers::conversation::list_conversations::<A, M>),
        )
        .route(
            "/conversations/list",
            get(handlers::conversation::list_conversations::<A, M>),
        )
        .route(
            "/conversations/agent/{id}",
            get(handlers::conversation::get_conversation::<A, M>)
                .delete(handlers::conversation::clear_conversation::<A, M>),
        )
        .route(
            "/conversations/agent/{id}/message",
            post(handlers::conversation::send_message::<A, M>),
        );

    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health::<A, M>))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::future::Future;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use arkagents_core::llm::box_provider::BoxLlmProvider;
    use arkagents_core::llm::provider::LlmProvider;
    use arkagents_core::repository::in_memory::InMemoryStore;
    use arkagents_types::config::AppConfig;
    use arkagents_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

    use crate::state::InMemoryState;

    struct FixedProvider {
        reply: Option<&'static str>,
    }

    impl LlmProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        fn complete(
            &self,
            request: &CompletionRequest,
        ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send {
            let reply = self.reply;
            let model = request.model.clone();
            async move {
                match reply {
                    Some(content) => Ok(CompletionResponse {
                        id: "resp-1".to_string(),
                        content: content.to_string(),
                        model,
                        usage: Usage {
                            input_tokens: 5,
                            output_tokens: 3,
                        },
                    }),
                    None => Err(LlmError::Provider {
                        message: "upstream exploded".to_string(),
                    }),
                }
            }
        }
    }

    fn app(reply: Option<&'static str>) -> Router {
        let store = InMemoryStore::new();
        let state: InMemoryState = AppState::new(
            store.clone(),
            store,
            BoxLlmProvider::new(FixedProvider { reply }),
            &AppConfig::default(),
            true,
        );
        build_router(state)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_luna(app: &Router) -> i64 {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/agents",
            Some(json!({"name": "Luna", "description": "A helpful cat"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let app = app(Some("hi"));

        let (status, body) = send(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "ArkAgents API is running!");

        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["provider_key_set"], true);
    }

    #[tokio::test]
    async fn test_create_list_and_get_agent() {
        let app = app(Some("hi"));
        let id = create_luna(&app).await;

        let (status, body) = send(&app, Method::GET, "/api/agents/list", None).await;
        assert_eq!(status, StatusCode::OK);
        let agents = body["agents"].as_array().unwrap();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0]["name"], "Luna");

        let (status, body) = send(&app, Method::GET, &format!("/api/agents/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let prompt = body["system_prompt"].as_str().unwrap();
        assert!(prompt.contains("Luna"));
        assert!(prompt.contains("A helpful cat"));
    }

    #[tokio::test]
    async fn test_unknown_agent_is_404() {
        let app = app(Some("hi"));

        let (status, body) = send(&app, Method::GET, "/api/agents/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errors"][0]["code"], "AGENT_NOT_FOUND");

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/agents/999/chat",
            Some(json!({"message": "hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, "/api/agents/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_blank_name_is_validation_error() {
        let app = app(Some("hi"));
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/agents/create",
            Some(json!({"name": "   ", "description": "nobody"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_chat_persists_both_turns() {
        let app = app(Some("Meow, hello!"));
        let id = create_luna(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/agents/{id}/chat"),
            Some(json!({"message": "Hi Luna"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Meow, hello!");
        assert_eq!(body["agent_name"], "Luna");
        assert!(body["message_id"].as_i64().is_some());

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/agents/{id}/conversation"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let turns = body["conversation"].as_array().unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0]["role"], "user");
        assert_eq!(turns[0]["content"], "Hi Luna");
        assert_eq!(turns[1]["role"], "assistant");
    }

    #[tokio::test]
    async fn test_blank_chat_message_is_rejected() {
        let app = app(Some("unused"));
        let id = create_luna(&app).await;

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/agents/{id}/chat"),
            Some(json!({"message": "  "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_provider_failure_keeps_user_turn() {
        let app = app(None);
        let id = create_luna(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/conversations/agent/{id}/message"),
            Some(json!({"message": "Are you there?"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["errors"][0]["code"], "PROVIDER_ERROR");
        assert!(
            body["errors"][0]["message"]
                .as_str()
                .unwrap()
                .contains("upstream exploded")
        );

        let (_, body) = send(
            &app,
            Method::GET,
            &format!("/api/conversations/agent/{id}"),
            None,
        )
        .await;
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
    }

    #[tokio::test]
    async fn test_conversation_list_and_clear() {
        let app = app(Some("ok"));
        let id = create_luna(&app).await;

        for text in ["one", "two"] {
            let (status, _) = send(
                &app,
                Method::POST,
                &format!("/api/agents/{id}/chat"),
                Some(json!({"message": text})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/conversations?agent_id={id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let conversations = body["conversations"].as_array().unwrap();
        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0]["id"], format!("agent_{id}"));
        assert_eq!(conversations[0]["message_count"], 4);

        let (status, body) = send(
            &app,
            Method::DELETE,
            &format!("/api/conversations/agent/{id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["deleted"], 4);
        assert_eq!(body["message"], "Deleted 4 messages");

        let (_, body) = send(&app, Method::GET, "/api/conversations/list", None).await;
        assert!(body["conversations"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete_agent() {
        let app = app(Some("ok"));
        let id = create_luna(&app).await;

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/agents/{id}"),
            Some(json!({"is_active": false})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_active"], false);
        assert_eq!(body["name"], "Luna");

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/agents/{id}/chat"),
            Some(json!({"message": "hello?"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, Method::DELETE, &format!("/api/agents/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Agent deleted successfully");

        let (status, _) = send(&app, Method::GET, &format!("/api/agents/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_register_and_list_tools() {
        let app = app(Some("ok"));
        let id = create_luna(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/agents/{id}/tools"),
            Some(json!({
                "tool_name": "weather",
                "tool_description": "Look up the forecast",
                "webhook_url": "https://example.invalid/weather",
                "parameters": {"city": "string"}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["tool_name"], "weather");

        let (status, body) = send(&app, Method::GET, &format!("/api/agents/{id}/tools"), None).await;
        assert_eq!(status, StatusCode::OK);
        let tools = body["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["parameters"]["city"], "string");

        let (status, _) = send(&app, Method::GET, "/api/agents/999/tools", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
