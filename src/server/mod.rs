//! Server module - the inbound HTTP boundary
//!
//! Thin plumbing around the agent loop: `POST /api/chat` accepts the
//! caller's message history and returns the final assistant reply,
//! `GET /api/leads` lists the lead store, and `GET /` is a health check.
//! CORS is permissive because the chat UI is served from a separate
//! origin.
//!
//! Fatal orchestration errors never leak internals to the end user: the
//! handler logs the real error for operators and responds with a single
//! apologetic sentence plus a machine-readable code.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::agent::AgentLoop;
use crate::config::Config;
use crate::conversation::{Conversation, Message};
use crate::error::Result;
use crate::tools::lead_management::{Lead, LeadStore};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<AgentLoop>,
    pub lead_store: LeadStore,
    pub system_prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<IncomingMessage>,
}

#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub role: &'static str,
    pub content: String,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/chat", post(chat))
        .route("/api/leads", get(leads))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn run(config: &Config, state: AppState) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "flydesk listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(json!({"message": "Fly Your Tech API is running"}))
}

async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Response {
    if request.messages.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Messages array is required",
            "bad_request",
        );
    }

    let mut history = vec![Message::system(state.system_prompt.as_str())];
    for incoming in &request.messages {
        let message = match incoming.role.as_str() {
            "user" => Message::user(incoming.content.as_str()),
            "assistant" => Message::assistant(incoming.content.as_str()),
            other => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &format!("unsupported role '{}'", other),
                    "bad_request",
                );
            }
        };
        history.push(message);
    }

    let conversation = Conversation::from_messages(history);
    match state.agent.run(conversation, CancellationToken::new()).await {
        Ok(reply) => {
            let content = if reply.content.is_empty() {
                "I'm sorry, I don't have an answer for that right now.".to_string()
            } else {
                reply.content
            };
            Json(ChatResponse {
                role: "assistant",
                content,
            })
            .into_response()
        }
        Err(e) => {
            // Operator-facing detail stays in the logs.
            error!(error = %e, code = e.code(), "chat request failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Sorry, something went wrong while processing your message. Please try again.",
                e.code(),
            )
        }
    }
}

async fn leads(State(state): State<AppState>) -> Response {
    match state.lead_store.read_all().await {
        Ok(leads) => Json::<Vec<Lead>>(leads).into_response(),
        Err(e) => {
            error!(error = %e, "failed to read lead store");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read leads",
                e.code(),
            )
        }
    }
}

fn error_response(status: StatusCode, message: &str, code: &str) -> Response {
    (status, Json(json!({"error": message, "code": code}))).into_response()
}
