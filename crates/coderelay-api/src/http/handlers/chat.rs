//! Chat HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/init-chat               - Bind a chat id to a bot
//! - POST   /api/chat                    - Run one conversation turn
//! - GET    /api/chat/{chatId}/history   - Messages, oldest first
//! - DELETE /api/chat/{chatId}           - Delete a chat and its messages
//! - DELETE /api/chat/{chatId}/clear     - Alias of the above

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use coderelay_types::chat::{Message, MessageRole};

use crate::http::error::AppError;
use crate::http::response::success;
use crate::state::AppState;

/// Request body for `POST /api/init-chat`. Absent fields read as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InitChatRequest {
    pub chat_id: String,
    pub bot_id: String,
    pub bot_model: String,
}

/// Request body for `POST /api/chat`. Absent fields read as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatRequest {
    pub chat_id: String,
    pub message: String,
    pub bot_id: String,
    pub bot_model: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// A message as exposed in history responses.
#[derive(Debug, Serialize)]
struct MessageView {
    role: MessageRole,
    content: String,
    timestamp: DateTime<Utc>,
}

impl From<Message> for MessageView {
    fn from(message: Message) -> Self {
        Self {
            role: message.role,
            content: message.content,
            timestamp: message.timestamp,
        }
    }
}

/// POST /api/init-chat
pub async fn init_chat(
    State(state): State<AppState>,
    payload: Result<Json<InitChatRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;

    let chat = state
        .chat_service
        .init_chat(&req.chat_id, &req.bot_id, &req.bot_model)
        .await?;

    success(json!({ "chatId": chat.id }))
}

/// POST /api/chat
///
/// Returns 200 with a best-effort reply whenever the request is valid and
/// storage works; `warning` is present only when the reply is a fallback.
pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;

    let reply = state
        .chat_service
        .send_message(&req.chat_id, &req.message, &req.bot_id, &req.bot_model)
        .await?;

    let mut body = json!({
        "response": reply.response,
        "botId": reply.bot_id,
    });
    if reply.warning {
        body["warning"] = Value::Bool(true);
    }
    success(body)
}

/// GET /api/chat/{chatId}/history
pub async fn get_history(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Value>, AppError> {
    let messages: Vec<MessageView> = state
        .chat_service
        .history(&chat_id, query.limit)
        .await?
        .into_iter()
        .map(MessageView::from)
        .collect();

    success(json!({ "messages": messages }))
}

/// DELETE /api/chat/{chatId}
pub async fn clear_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.chat_service.clear_chat(&chat_id).await?;

    success(json!({ "cleared": true, "chatId": chat_id }))
}
