//! GET /api/bots - The registered bot catalog.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::http::error::AppError;
use crate::http::response::success;
use crate::state::AppState;

pub async fn list_bots(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    success(json!({ "bots": state.registry.all() }))
}
