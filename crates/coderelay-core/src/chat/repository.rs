//! ChatRepository trait definition.
//!
//! Provides persistence for chats and their append-only message log.
//! Each operation commits on its own; nothing spans multiple calls.

use coderelay_types::chat::{Chat, Message, MessageRole, StoreStats};
use coderelay_types::error::RepositoryError;

/// Repository trait for chat and message persistence.
///
/// Implementations live in coderelay-infra (e.g., `SqliteChatRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ChatRepository: Send + Sync {
    /// Insert a chat, or replace the bot binding of an existing one.
    ///
    /// Messages already stored under the id are kept.
    fn create_or_replace_chat(
        &self,
        id: &str,
        bot_id: &str,
        bot_model: &str,
    ) -> impl std::future::Future<Output = Result<Chat, RepositoryError>> + Send;

    /// Get a chat by id.
    fn get_chat(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Chat>, RepositoryError>> + Send;

    /// Append a message to a chat, returning the stored row.
    fn append_message(
        &self,
        chat_id: &str,
        role: MessageRole,
        content: &str,
    ) -> impl std::future::Future<Output = Result<Message, RepositoryError>> + Send;

    /// List messages for a chat in ascending timestamp order.
    ///
    /// With a limit, only the most recent `limit` messages are returned
    /// (still oldest first).
    fn list_messages(
        &self,
        chat_id: &str,
        limit: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// Delete a chat and all of its messages. Returns whether the chat existed.
    fn delete_chat(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Aggregate counts across all chats.
    fn stats(&self) -> impl std::future::Future<Output = Result<StoreStats, RepositoryError>> + Send;

    /// Cheap liveness probe for the storage backend.
    fn ping(&self) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
