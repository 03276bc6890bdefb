//! GET /api/stats - Aggregate store statistics.

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use serde_json::{Value, json};

use crate::http::error::AppError;
use crate::http::response::success;
use crate::state::AppState;

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let stats = state.chat_service.stats().await?;

    success(json!({
        "totalChats": stats.total_chats,
        "totalMessages": stats.total_messages,
        "popularBots": stats.popular_bots,
        "availableBots": state.registry.len(),
        "timestamp": Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::replying;

    #[tokio::test]
    async fn test_empty_store() {
        let (state, _dir) = replying("ok").await;
        let Json(body) = get_stats(State(state)).await.unwrap();

        assert_eq!(body["success"], true);
        assert_eq!(body["totalChats"], 0);
        assert_eq!(body["totalMessages"], 0);
        assert_eq!(body["popularBots"], json!([]));
        assert_eq!(body["availableBots"], 10);
    }

    #[tokio::test]
    async fn test_counts_after_a_turn() {
        let (state, _dir) = replying("hello!").await;
        state
            .chat_service
            .init_chat("c1", "starcoder2-3b", "bigcode/starcoder2-3b")
            .await
            .unwrap();
        state
            .chat_service
            .send_message("c1", "hi", "starcoder2-3b", "bigcode/starcoder2-3b")
            .await
            .unwrap();

        let Json(body) = get_stats(State(state)).await.unwrap();
        assert_eq!(body["totalChats"], 1);
        assert_eq!(body["totalMessages"], 2);
        assert_eq!(
            body["popularBots"],
            json!([{"botId": "starcoder2-3b", "messageCount": 2}])
        );
    }
}
