//! Chat assistant endpoints

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use super::{ok, with_common_layers, ApiJson, ApiResponse, ApiResult};
use crate::conversational::ChatService;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    pub session_id: Option<String>,
    pub user_id: Option<String>,
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ChatState {
    pub chat: ChatService,
}

/// =============================
/// Handlers
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "Do-Flow Chat Assistant",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn send_message(
    State(state): State<ChatState>,
    ApiJson(req): ApiJson<ChatRequest>,
) -> ApiResult {
    info!(
        session_id = ?req.session_id,
        user_id = req.user_id.as_deref().unwrap_or("user"),
        "Received chat message"
    );

    let exchange = state
        .chat
        .send(req.session_id.as_deref(), &req.message)
        .await?;

    ok(ApiResponse::success(exchange))
}

async fn history(State(state): State<ChatState>, Path(session_id): Path<String>) -> ApiResult {
    let messages = state.chat.history(&session_id).await;

    ok(ApiResponse::success(serde_json::json!({
        "sessionId": session_id,
        "total": messages.len(),
        "messages": messages,
    })))
}

async fn sessions(State(state): State<ChatState>) -> ApiResult {
    ok(ApiResponse::success(state.chat.sessions().await))
}

/// =============================
/// Router
/// =============================

pub fn create_router(chat: ChatService, cors_permissive: bool) -> Router {
    let state = ChatState { chat };

    let router = Router::new()
        .route("/health", get(health))
        .route("/api/v1/chat/message", post(send_message))
        .route("/api/v1/chat/history/:session_id", get(history))
        .route("/api/v1/chat/sessions", get(sessions))
        .with_state(state);

    with_common_layers(router, cors_permissive)
}
