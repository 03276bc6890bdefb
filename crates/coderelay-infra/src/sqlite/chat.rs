//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `coderelay-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, writes on the
//! single-connection writer, reads on the reader pool.

use chrono::{DateTime, SecondsFormat, Utc};
use coderelay_core::chat::repository::ChatRepository;
use coderelay_types::chat::{BotUsage, Chat, Message, MessageRole, StoreStats};
use coderelay_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;

/// Number of bots reported in [`StoreStats::popular_bots`].
const POPULAR_BOTS_LIMIT: i64 = 5;

/// SQLite-backed implementation of `ChatRepository`.
#[derive(Clone)]
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ChatRow {
    id: String,
    bot_id: String,
    bot_model: String,
    created_at: String,
}

impl ChatRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            bot_id: row.try_get("bot_id")?,
            bot_model: row.try_get("bot_model")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_chat(self) -> Result<Chat, RepositoryError> {
        Ok(Chat {
            created_at: parse_datetime(&self.created_at)?,
            id: self.id,
            bot_id: self.bot_id,
            bot_model: self.bot_model,
        })
    }
}

struct MessageRow {
    id: i64,
    chat_id: String,
    role: String,
    content: String,
    timestamp: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            chat_id: row.try_get("chat_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(Message {
            id: self.id,
            chat_id: self.chat_id,
            role,
            content: self.content,
            timestamp: parse_datetime(&self.timestamp)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width UTC form so that lexical order matches time order.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn query_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

// ---------------------------------------------------------------------------
// ChatRepository implementation
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn create_or_replace_chat(
        &self,
        id: &str,
        bot_id: &str,
        bot_model: &str,
    ) -> Result<Chat, RepositoryError> {
        let created_at = Utc::now();

        // Upsert rather than REPLACE: a REPLACE deletes the row first, which
        // would cascade to the chat's messages.
        sqlx::query(
            r#"INSERT INTO chats (id, bot_id, bot_model, created_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   bot_id = excluded.bot_id,
                   bot_model = excluded.bot_model,
                   created_at = excluded.created_at"#,
        )
        .bind(id)
        .bind(bot_id)
        .bind(bot_model)
        .bind(format_datetime(&created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        Ok(Chat {
            id: id.to_string(),
            bot_id: bot_id.to_string(),
            bot_model: bot_model.to_string(),
            created_at,
        })
    }

    async fn get_chat(&self, id: &str) -> Result<Option<Chat>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chats WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        match row {
            Some(row) => {
                let chat_row = ChatRow::from_row(&row).map_err(query_err)?;
                Ok(Some(chat_row.into_chat()?))
            }
            None => Ok(None),
        }
    }

    async fn append_message(
        &self,
        chat_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<Message, RepositoryError> {
        let timestamp = Utc::now();

        // The chat's current bot is stamped on the row.
        let result = sqlx::query(
            r#"INSERT INTO messages (chat_id, role, content, timestamp, bot_id)
               VALUES (?, ?, ?, ?, (SELECT bot_id FROM chats WHERE id = ?))"#,
        )
        .bind(chat_id)
        .bind(role.to_string())
        .bind(content)
        .bind(format_datetime(&timestamp))
        .bind(chat_id)
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        Ok(Message {
            id: result.last_insert_rowid(),
            chat_id: chat_id.to_string(),
            role,
            content: content.to_string(),
            timestamp,
        })
    }

    async fn list_messages(
        &self,
        chat_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, RepositoryError> {
        let rows = match limit {
            Some(limit) => {
                sqlx::query(
                    r#"SELECT * FROM (
                           SELECT * FROM messages WHERE chat_id = ?
                           ORDER BY timestamp DESC, id DESC LIMIT ?
                       ) ORDER BY timestamp ASC, id ASC"#,
                )
                .bind(chat_id)
                .bind(limit.max(0))
                .fetch_all(&self.pool.reader)
                .await
            }
            None => {
                sqlx::query("SELECT * FROM messages WHERE chat_id = ? ORDER BY timestamp ASC, id ASC")
                    .bind(chat_id)
                    .fetch_all(&self.pool.reader)
                    .await
            }
        }
        .map_err(query_err)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row = MessageRow::from_row(row).map_err(query_err)?;
            messages.push(msg_row.into_message()?);
        }

        Ok(messages)
    }

    async fn delete_chat(&self, id: &str) -> Result<bool, RepositoryError> {
        // Messages go with the chat through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM chats WHERE id = ?")
            .bind(id)
            .execute(&self.pool.writer)
            .await
            .map_err(query_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn stats(&self) -> Result<StoreStats, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT (SELECT COUNT(*) FROM chats) AS chats,
                      (SELECT COUNT(*) FROM messages) AS messages"#,
        )
        .fetch_one(&self.pool.reader)
        .await
        .map_err(query_err)?;

        let total_chats: i64 = row.try_get("chats").map_err(query_err)?;
        let total_messages: i64 = row.try_get("messages").map_err(query_err)?;

        let rows = sqlx::query(
            r#"SELECT bot_id, COUNT(id) AS message_count
               FROM messages
               WHERE bot_id IS NOT NULL
               GROUP BY bot_id
               ORDER BY message_count DESC, bot_id ASC
               LIMIT ?"#,
        )
        .bind(POPULAR_BOTS_LIMIT)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        let mut popular_bots = Vec::with_capacity(rows.len());
        for row in &rows {
            let count: i64 = row.try_get("message_count").map_err(query_err)?;
            popular_bots.push(BotUsage {
                bot_id: row.try_get("bot_id").map_err(query_err)?,
                message_count: count as u64,
            });
        }

        Ok(StoreStats {
            total_chats: total_chats as u64,
            total_messages: total_messages as u64,
            popular_bots,
        })
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool.reader)
            .await
            .map_err(|_| RepositoryError::Connection)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_repo() -> (SqliteChatRepository, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::open(&dir.path().join("test.db")).await.unwrap();
        (SqliteChatRepository::new(pool), dir)
    }

    #[tokio::test]
    async fn test_create_and_get_chat() {
        let (repo, _dir) = test_repo().await;

        let created = repo
            .create_or_replace_chat("c1", "starcoder2-3b", "bigcode/starcoder2-3b")
            .await
            .unwrap();
        assert_eq!(created.id, "c1");

        let found = repo.get_chat("c1").await.unwrap().unwrap();
        assert_eq!(found.bot_id, "starcoder2-3b");
        assert_eq!(found.bot_model, "bigcode/starcoder2-3b");

        assert!(repo.get_chat("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reinit_replaces_binding_and_keeps_messages() {
        let (repo, _dir) = test_repo().await;
        repo.create_or_replace_chat("c1", "starcoder2-3b", "bigcode/starcoder2-3b")
            .await
            .unwrap();
        repo.append_message("c1", MessageRole::User, "hi").await.unwrap();

        repo.create_or_replace_chat("c1", "codellama-13b", "codellama/CodeLlama-13b-Instruct-hf")
            .await
            .unwrap();

        let chat = repo.get_chat("c1").await.unwrap().unwrap();
        assert_eq!(chat.bot_id, "codellama-13b");
        assert_eq!(repo.list_messages("c1", None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_append_and_list_in_order() {
        let (repo, _dir) = test_repo().await;
        repo.create_or_replace_chat("c1", "starcoder2-3b", "bigcode/starcoder2-3b")
            .await
            .unwrap();

        let first = repo.append_message("c1", MessageRole::User, "q1").await.unwrap();
        let second = repo
            .append_message("c1", MessageRole::Assistant, "a1")
            .await
            .unwrap();
        assert!(second.id > first.id);
        repo.append_message("c1", MessageRole::User, "q2").await.unwrap();
        repo.append_message("c1", MessageRole::Assistant, "a2").await.unwrap();

        let all = repo.list_messages("c1", None).await.unwrap();
        let contents: Vec<&str> = all.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["q1", "a1", "q2", "a2"]);
        assert_eq!(all[1].role, MessageRole::Assistant);
    }

    #[tokio::test]
    async fn test_limit_returns_most_recent_ascending() {
        let (repo, _dir) = test_repo().await;
        repo.create_or_replace_chat("c1", "starcoder2-3b", "bigcode/starcoder2-3b")
            .await
            .unwrap();
        for i in 0..5 {
            repo.append_message("c1", MessageRole::User, &format!("m{i}"))
                .await
                .unwrap();
        }

        let recent = repo.list_messages("c1", Some(2)).await.unwrap();
        let contents: Vec<&str> = recent.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m3", "m4"]);

        assert!(repo.list_messages("c1", Some(0)).await.unwrap().is_empty());
        assert_eq!(repo.list_messages("c1", Some(50)).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_message_for_unknown_chat_rejected() {
        let (repo, _dir) = test_repo().await;
        let result = repo.append_message("ghost", MessageRole::User, "hi").await;
        assert!(matches!(result, Err(RepositoryError::Query(_))));
    }

    #[tokio::test]
    async fn test_delete_chat_cascades() {
        let (repo, _dir) = test_repo().await;
        repo.create_or_replace_chat("c1", "starcoder2-3b", "bigcode/starcoder2-3b")
            .await
            .unwrap();
        repo.append_message("c1", MessageRole::User, "hi").await.unwrap();

        assert!(repo.delete_chat("c1").await.unwrap());
        assert!(repo.get_chat("c1").await.unwrap().is_none());
        assert!(repo.list_messages("c1", None).await.unwrap().is_empty());
        assert!(!repo.delete_chat("c1").await.unwrap());
    }

    #[tokio::test]
    async fn test_stats() {
        let (repo, _dir) = test_repo().await;
        assert_eq!(repo.stats().await.unwrap(), StoreStats::default());

        repo.create_or_replace_chat("c1", "starcoder2-3b", "bigcode/starcoder2-3b")
            .await
            .unwrap();
        repo.create_or_replace_chat("c2", "codellama-13b", "codellama/CodeLlama-13b-Instruct-hf")
            .await
            .unwrap();
        for content in ["a", "b", "c"] {
            repo.append_message("c1", MessageRole::User, content).await.unwrap();
        }
        repo.append_message("c2", MessageRole::User, "d").await.unwrap();

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.total_chats, 2);
        assert_eq!(stats.total_messages, 4);
        assert_eq!(
            stats.popular_bots,
            vec![
                BotUsage {
                    bot_id: "starcoder2-3b".to_string(),
                    message_count: 3
                },
                BotUsage {
                    bot_id: "codellama-13b".to_string(),
                    message_count: 1
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_stats_credit_the_bot_that_answered() {
        let (repo, _dir) = test_repo().await;
        repo.create_or_replace_chat("c1", "starcoder2-3b", "bigcode/starcoder2-3b")
            .await
            .unwrap();
        repo.append_message("c1", MessageRole::User, "hi").await.unwrap();
        repo.append_message("c1", MessageRole::Assistant, "hello!").await.unwrap();

        repo.create_or_replace_chat("c1", "codellama-13b", "codellama/CodeLlama-13b-Instruct-hf")
            .await
            .unwrap();
        repo.append_message("c1", MessageRole::User, "again").await.unwrap();

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.total_chats, 1);
        assert_eq!(
            stats.popular_bots,
            vec![
                BotUsage {
                    bot_id: "starcoder2-3b".to_string(),
                    message_count: 2
                },
                BotUsage {
                    bot_id: "codellama-13b".to_string(),
                    message_count: 1
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_ping() {
        let (repo, _dir) = test_repo().await;
        repo.ping().await.unwrap();
    }

    #[test]
    fn test_datetime_format_is_fixed_width() {
        let a = format_datetime(&DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z").unwrap().with_timezone(&Utc));
        assert_eq!(a, "2025-01-01T00:00:00.000000Z");
        assert_eq!(parse_datetime(&a).unwrap().to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }
}
