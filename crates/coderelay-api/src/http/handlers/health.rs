//! GET /api/health - Liveness plus a quick dependency check.
//!
//! Always answers 200; `status` is `degraded` when storage does not answer a
//! ping or no inference API key was found at startup.

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use serde_json::{Value, json};

use coderelay_core::chat::repository::ChatRepository;

use crate::http::error::AppError;
use crate::http::response::success;
use crate::state::AppState;

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let storage_ok = match state.chat_service.chat_repo().ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Storage ping failed");
            false
        }
    };

    let status = if storage_ok && state.api_key_configured {
        "healthy"
    } else {
        "degraded"
    };
    let storage = if storage_ok { "connected" } else { "unavailable" };

    success(json!({
        "status": status,
        "storage": storage,
        "apiKeyConfigured": state.api_key_configured,
        "botsCount": state.registry.len(),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now(),
    }))
}
