//! Axum router configuration with middleware.
//!
//! JSON API routes live under `/api`. Middleware: CORS (any origin), tracing.
//!
//! When the web directory exists, paths not matched by a route are served
//! from it as static files.

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Chat lifecycle
        .route("/init-chat", post(handlers::chat::init_chat))
        .route("/chat", post(handlers::chat::send_message))
        .route("/chat/{chat_id}", delete(handlers::chat::clear_chat))
        .route("/chat/{chat_id}/clear", delete(handlers::chat::clear_chat))
        .route("/chat/{chat_id}/history", get(handlers::chat::get_history))
        // Catalog and status
        .route("/bots", get(handlers::bots::list_bots))
        .route("/health", get(handlers::health::health_check))
        .route("/stats", get(handlers::stats::get_stats));

    let web_dir = state.web_dir.clone();

    let mut router = Router::new()
        .route("/", get(handlers::pages::landing))
        .route("/test", get(handlers::diagnostics::run_diagnostics))
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if web_dir.is_dir() {
        router = router.fallback_service(ServeDir::new(&web_dir));
        tracing::info!(path = %web_dir.display(), "Static file serving enabled");
    }

    router
}
