//! HTTP request handlers.

use axum::http::HeaderMap;
use axum::http::header::ACCEPT;

pub mod bots;
pub mod chat;
pub mod diagnostics;
pub mod health;
pub mod pages;
pub mod stats;

/// True when the client asked for an HTML page.
pub(crate) fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}
