//! Success body format for API responses.
//!
//! Every JSON success response is a flat object carrying `"success": true`
//! next to the payload fields:
//! ```json
//! { "success": true, "chatId": "c1" }
//! ```

use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::http::error::AppError;

/// Serialize `payload` (which must be a JSON object) and mark it successful.
pub fn success<T: Serialize>(payload: T) -> Result<Json<Value>, AppError> {
    let mut value = serde_json::to_value(payload)
        .map_err(|e| AppError::Internal(format!("failed to serialize response: {e}")))?;

    match value.as_object_mut() {
        Some(map) => {
            map.insert("success".to_string(), Value::Bool(true));
            Ok(Json(value))
        }
        None => Err(AppError::Internal(
            "response payload is not a JSON object".to_string(),
        )),
    }
}
