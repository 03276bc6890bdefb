//! GET / - Landing page.

use axum::extract::State;
use axum::response::Html;

use crate::html::landing_page;
use crate::state::AppState;

/// Serve `{web_dir}/index.html` when present, otherwise the built-in page.
pub async fn landing(State(state): State<AppState>) -> Html<String> {
    let index = state.web_dir.join("index.html");
    match tokio::fs::read_to_string(&index).await {
        Ok(content) => Html(content),
        Err(_) => Html(landing_page(&state.registry)),
    }
}
