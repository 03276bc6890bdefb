use thiserror::Error;

/// Errors surfaced by the chat service to its callers.
///
/// Gateway failures are deliberately absent: a failed inference call is turned
/// into a stored fallback reply, never an error.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("chat '{0}' not found")]
    ChatNotFound(String),

    #[error("cannot switch bots mid-chat: chat is bound to '{bound}', got '{requested}'")]
    BotMismatch { bound: String, requested: String },

    #[error("invalid bot configuration: {0}")]
    InvalidBotConfig(String),

    #[error("storage unavailable: {0}")]
    StorageFault(#[from] RepositoryError),
}

/// Errors from repository operations (used by trait definitions in coderelay-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),
}
