//! GET /test - Probe registered models and report per-bot results.
//!
//! `?bot=<id>` limits the sweep to one bot. Browsers (`Accept: text/html`)
//! get a dashboard; everything else gets JSON.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;

use crate::html::diagnostics_page;
use crate::http::error::AppError;
use crate::http::handlers::wants_html;
use crate::http::response::success;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DiagnosticsQuery {
    pub bot: Option<String>,
}

pub async fn run_diagnostics(
    State(state): State<AppState>,
    Query(query): Query<DiagnosticsQuery>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let bot = query.bot.as_deref().filter(|b| !b.trim().is_empty());
    let report = state.diagnostics.run(bot).await?;

    if wants_html(&headers) {
        Ok(Html(diagnostics_page(&report)).into_response())
    } else {
        Ok(success(&report)?.into_response())
    }
}
