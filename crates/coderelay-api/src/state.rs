//! Application state wiring all services together.
//!
//! Services are generic over repository/gateway traits; AppState pins them to
//! the SQLite repository and a type-erased gateway handle.

use std::path::PathBuf;
use std::sync::Arc;

use coderelay_core::chat::service::ChatService;
use coderelay_core::diagnostics::DiagnosticsService;
use coderelay_core::gateway::box_gateway::BoxModelGateway;
use coderelay_core::registry::BotRegistry;
use coderelay_infra::config::load_config;
use coderelay_infra::credentials::resolve_api_key;
use coderelay_infra::huggingface::HuggingFaceGateway;
use coderelay_infra::sqlite::chat::SqliteChatRepository;
use coderelay_infra::sqlite::pool::DatabasePool;
use coderelay_types::config::AppConfig;

use crate::cli::ServeArgs;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteChatService = ChatService<SqliteChatRepository, BoxModelGateway>;

pub type ConcreteDiagnosticsService = DiagnosticsService<BoxModelGateway>;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub diagnostics: Arc<ConcreteDiagnosticsService>,
    pub registry: Arc<BotRegistry>,
    pub api_key_configured: bool,
    pub web_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: load config, open the DB, wire services.
    pub async fn init(args: &ServeArgs) -> anyhow::Result<Self> {
        let config = load_config(args.config.as_deref()).await;

        if let Some(parent) = args.database.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let db_pool = DatabasePool::open(&args.database).await?;
        tracing::info!(path = %args.database.display(), "Database ready");

        let api_key = resolve_api_key();
        match &api_key {
            Some(resolved) => tracing::info!(source = resolved.source, "Inference API key configured"),
            None => tracing::warn!("No inference API key found; model calls will likely be rejected"),
        }
        let api_key_configured = api_key.is_some();

        let gateway = HuggingFaceGateway::new(api_key.map(|r| r.key), &config.gateway)?;

        Ok(Self::from_parts(
            SqliteChatRepository::new(db_pool),
            BoxModelGateway::new(gateway),
            Arc::new(BotRegistry::builtin()),
            &config,
            api_key_configured,
            args.web_dir.clone(),
        ))
    }

    /// Wire services from already-built parts.
    pub fn from_parts(
        chat_repo: SqliteChatRepository,
        gateway: BoxModelGateway,
        registry: Arc<BotRegistry>,
        config: &AppConfig,
        api_key_configured: bool,
        web_dir: PathBuf,
    ) -> Self {
        let chat_service = ChatService::new(chat_repo, gateway.clone(), registry.clone(), &config.chat);
        let diagnostics = DiagnosticsService::new(gateway, registry.clone(), &config.diagnostics);

        Self {
            chat_service: Arc::new(chat_service),
            diagnostics: Arc::new(diagnostics),
            registry,
            api_key_configured,
            web_dir,
        }
    }
}
