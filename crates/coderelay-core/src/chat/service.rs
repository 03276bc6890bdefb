//! Chat service orchestrating chat setup and single conversation turns.
//!
//! ChatService coordinates between the ChatRepository, the BotRegistry and a
//! ModelGateway: it validates the request against the stored chat binding,
//! persists both sides of the exchange, and absorbs gateway failures into a
//! canned reply flagged with `warning`.

use std::sync::Arc;

use coderelay_types::chat::{Chat, ChatReply, Message, MessageRole, StoreStats};
use coderelay_types::config::ChatConfig;
use coderelay_types::error::ChatError;
use tracing::{debug, info, warn};

use crate::chat::cleaner::ResponseCleaner;
use crate::chat::fallback::fallback_reply;
use crate::chat::prompt::PromptBuilder;
use crate::chat::repository::ChatRepository;
use crate::gateway::provider::ModelGateway;
use crate::registry::BotRegistry;

/// Orchestrates chat lifecycle and message persistence.
///
/// Generic over `ChatRepository` and `ModelGateway` so coderelay-core never
/// depends on coderelay-infra.
pub struct ChatService<C: ChatRepository, G: ModelGateway> {
    chat_repo: C,
    gateway: G,
    registry: Arc<BotRegistry>,
    prompt: PromptBuilder,
    cleaner: ResponseCleaner,
}

impl<C: ChatRepository, G: ModelGateway> ChatService<C, G> {
    pub fn new(chat_repo: C, gateway: G, registry: Arc<BotRegistry>, config: &ChatConfig) -> Self {
        Self {
            chat_repo,
            gateway,
            registry,
            prompt: PromptBuilder::new(config),
            cleaner: ResponseCleaner::new(config),
        }
    }

    /// Access the chat repository.
    pub fn chat_repo(&self) -> &C {
        &self.chat_repo
    }

    pub fn registry(&self) -> &BotRegistry {
        &self.registry
    }

    /// Bind a chat id to a bot, creating the chat or replacing its binding.
    ///
    /// The bot must be registered and `bot_model` must be its model path.
    pub async fn init_chat(
        &self,
        chat_id: &str,
        bot_id: &str,
        bot_model: &str,
    ) -> Result<Chat, ChatError> {
        require_fields(&[("chatId", chat_id), ("botId", bot_id), ("botModel", bot_model)])?;

        let bot = self
            .registry
            .get(bot_id)
            .ok_or_else(|| ChatError::InvalidBotConfig(format!("unknown bot '{bot_id}'")))?;
        if bot.model != bot_model {
            return Err(ChatError::InvalidBotConfig(format!(
                "bot '{bot_id}' uses model '{}', not '{bot_model}'",
                bot.model
            )));
        }

        let chat = self
            .chat_repo
            .create_or_replace_chat(chat_id, bot_id, bot_model)
            .await?;
        info!(chat_id = %chat.id, bot_id = %chat.bot_id, "Chat initialized");
        Ok(chat)
    }

    /// Run one conversation turn.
    ///
    /// Two messages are stored per successful call: the user message, then the
    /// assistant reply (generated or fallback). Gateway failures never surface
    /// as errors.
    pub async fn send_message(
        &self,
        chat_id: &str,
        message: &str,
        bot_id: &str,
        bot_model: &str,
    ) -> Result<ChatReply, ChatError> {
        require_fields(&[
            ("chatId", chat_id),
            ("message", message),
            ("botId", bot_id),
            ("botModel", bot_model),
        ])?;

        let chat = self
            .chat_repo
            .get_chat(chat_id)
            .await?
            .ok_or_else(|| ChatError::ChatNotFound(chat_id.to_string()))?;

        if chat.bot_id != bot_id {
            return Err(ChatError::BotMismatch {
                bound: chat.bot_id,
                requested: bot_id.to_string(),
            });
        }

        let bot = self
            .registry
            .get(&chat.bot_id)
            .ok_or_else(|| ChatError::InvalidBotConfig(format!("unknown bot '{}'", chat.bot_id)))?;

        let window = i64::try_from(self.prompt.history_window()).unwrap_or(i64::MAX);
        let history = self.chat_repo.list_messages(chat_id, Some(window)).await?;
        self.chat_repo
            .append_message(chat_id, MessageRole::User, message)
            .await?;

        let prompt = self.prompt.build(&chat.bot_id, &history, message);
        debug!(chat_id = %chat_id, history = history.len(), prompt_chars = prompt.len(), "Prompt built");

        let (response, warning) = match self
            .gateway
            .invoke(&chat.bot_model, &prompt, &bot.params)
            .await
        {
            Ok(raw) => {
                let cleaned = self.cleaner.clean(&raw);
                if cleaned.substituted {
                    debug!(chat_id = %chat_id, "Model reply too short, substituted");
                }
                (cleaned.text, false)
            }
            Err(err) => {
                warn!(
                    chat_id = %chat_id,
                    bot_id = %chat.bot_id,
                    model = %chat.bot_model,
                    error_kind = %err.kind(),
                    error = %err,
                    "Gateway call failed, using fallback reply"
                );
                (fallback_reply(&err).to_string(), true)
            }
        };

        self.chat_repo
            .append_message(chat_id, MessageRole::Assistant, &response)
            .await?;
        info!(chat_id = %chat_id, bot_id = %chat.bot_id, warning, "Chat turn completed");

        Ok(ChatReply {
            response,
            bot_id: chat.bot_id,
            warning,
        })
    }

    /// Messages for a chat, oldest first. With a limit, only the most recent ones.
    pub async fn history(
        &self,
        chat_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, ChatError> {
        Ok(self.chat_repo.list_messages(chat_id, limit).await?)
    }

    /// Delete a chat and its messages.
    pub async fn clear_chat(&self, chat_id: &str) -> Result<(), ChatError> {
        if self.chat_repo.delete_chat(chat_id).await? {
            info!(chat_id = %chat_id, "Chat cleared");
            Ok(())
        } else {
            Err(ChatError::ChatNotFound(chat_id.to_string()))
        }
    }

    pub async fn stats(&self) -> Result<StoreStats, ChatError> {
        Ok(self.chat_repo.stats().await?)
    }
}

fn require_fields(fields: &[(&'static str, &str)]) -> Result<(), ChatError> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ChatError::MissingFields(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;
    use coderelay_types::chat::BotUsage;
    use coderelay_types::error::RepositoryError;
    use coderelay_types::gateway::{GatewayError, GenerationParams};

    use crate::chat::cleaner::SHORT_REPLY_FALLBACK;
    use crate::chat::fallback::NOT_FOUND_REPLY;
    use crate::chat::prompt::ASSISTANT_CUE;

    // --- In-memory repository ---

    #[derive(Default)]
    struct MemoryRepo {
        chats: Mutex<Vec<Chat>>,
        messages: Mutex<Vec<Message>>,
    }

    impl ChatRepository for MemoryRepo {
        async fn create_or_replace_chat(
            &self,
            id: &str,
            bot_id: &str,
            bot_model: &str,
        ) -> Result<Chat, RepositoryError> {
            let chat = Chat {
                id: id.to_string(),
                bot_id: bot_id.to_string(),
                bot_model: bot_model.to_string(),
                created_at: Utc::now(),
            };
            let mut chats = self.chats.lock().unwrap();
            chats.retain(|c| c.id != id);
            chats.push(chat.clone());
            Ok(chat)
        }

        async fn get_chat(&self, id: &str) -> Result<Option<Chat>, RepositoryError> {
            Ok(self.chats.lock().unwrap().iter().find(|c| c.id == id).cloned())
        }

        async fn append_message(
            &self,
            chat_id: &str,
            role: MessageRole,
            content: &str,
        ) -> Result<Message, RepositoryError> {
            let mut messages = self.messages.lock().unwrap();
            let message = Message {
                id: messages.len() as i64 + 1,
                chat_id: chat_id.to_string(),
                role,
                content: content.to_string(),
                timestamp: Utc::now(),
            };
            messages.push(message.clone());
            Ok(message)
        }

        async fn list_messages(
            &self,
            chat_id: &str,
            limit: Option<i64>,
        ) -> Result<Vec<Message>, RepositoryError> {
            let all: Vec<Message> = self
                .messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.chat_id == chat_id)
                .cloned()
                .collect();
            let skip = match limit {
                Some(n) => all.len().saturating_sub(n as usize),
                None => 0,
            };
            Ok(all[skip..].to_vec())
        }

        async fn delete_chat(&self, id: &str) -> Result<bool, RepositoryError> {
            let mut chats = self.chats.lock().unwrap();
            let before = chats.len();
            chats.retain(|c| c.id != id);
            self.messages.lock().unwrap().retain(|m| m.chat_id != id);
            Ok(chats.len() != before)
        }

        async fn stats(&self) -> Result<StoreStats, RepositoryError> {
            Ok(StoreStats {
                total_chats: self.chats.lock().unwrap().len() as u64,
                total_messages: self.messages.lock().unwrap().len() as u64,
                popular_bots: Vec::<BotUsage>::new(),
            })
        }

        async fn ping(&self) -> Result<(), RepositoryError> {
            Ok(())
        }
    }

    // --- Stub gateway ---

    struct StubGateway {
        reply: Result<String, GatewayError>,
        calls: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
        last_model: Mutex<Option<String>>,
    }

    impl StubGateway {
        fn replying(text: &str) -> Self {
            Self::with(Ok(text.to_string()))
        }

        fn failing(err: GatewayError) -> Self {
            Self::with(Err(err))
        }

        fn with(reply: Result<String, GatewayError>) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
                last_model: Mutex::new(None),
            }
        }
    }

    impl ModelGateway for StubGateway {
        fn name(&self) -> &str {
            "stub"
        }

        async fn invoke(
            &self,
            model_path: &str,
            prompt: &str,
            _params: &GenerationParams,
        ) -> Result<String, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            *self.last_model.lock().unwrap() = Some(model_path.to_string());
            self.reply.clone()
        }
    }

    const BOT: &str = "starcoder2-3b";
    const MODEL: &str = "bigcode/starcoder2-3b";

    fn service(gateway: StubGateway) -> ChatService<MemoryRepo, StubGateway> {
        ChatService::new(
            MemoryRepo::default(),
            gateway,
            Arc::new(BotRegistry::builtin()),
            &ChatConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_turn_returns_model_reply_and_stores_two_rows() {
        let svc = service(StubGateway::replying("hello!"));
        let chat = svc.init_chat("c1", BOT, MODEL).await.unwrap();
        assert_eq!(chat.id, "c1");

        let reply = svc.send_message("c1", "hi", BOT, MODEL).await.unwrap();
        assert_eq!(reply.response, "hello!");
        assert_eq!(reply.bot_id, BOT);
        assert!(!reply.warning);

        let history = svc.history("c1", None).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, MessageRole::User);
        assert_eq!(history[0].content, "hi");
        assert_eq!(history[1].role, MessageRole::Assistant);
        assert_eq!(history[1].content, "hello!");
    }

    #[tokio::test]
    async fn test_gateway_called_with_bound_model_and_prompt_cue() {
        let svc = service(StubGateway::replying("sure, here you go"));
        svc.init_chat("c1", BOT, MODEL).await.unwrap();
        svc.send_message("c1", "write fizzbuzz", BOT, MODEL).await.unwrap();

        let gateway = &svc.gateway;
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.last_model.lock().unwrap().as_deref(), Some(MODEL));
        let prompt = gateway.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.ends_with(&format!("User: write fizzbuzz\n{ASSISTANT_CUE}")));
        // New message appears exactly once.
        assert_eq!(prompt.matches("write fizzbuzz").count(), 1);
    }

    #[tokio::test]
    async fn test_history_grows_in_order_over_turns() {
        let svc = service(StubGateway::replying("an answer"));
        svc.init_chat("c1", BOT, MODEL).await.unwrap();
        for i in 0..3 {
            svc.send_message("c1", &format!("q{i}"), BOT, MODEL).await.unwrap();
        }

        let history = svc.history("c1", None).await.unwrap();
        assert_eq!(history.len(), 6);
        for (i, pair) in history.chunks(2).enumerate() {
            assert_eq!(pair[0].role, MessageRole::User);
            assert_eq!(pair[0].content, format!("q{i}"));
            assert_eq!(pair[1].role, MessageRole::Assistant);
        }
        assert!(history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

        let recent = svc.history("c1", Some(2)).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].content, "q2");
    }

    #[tokio::test]
    async fn test_gateway_failure_becomes_fallback_with_warning() {
        let svc = service(StubGateway::failing(GatewayError::NotFound));
        svc.init_chat("c1", BOT, MODEL).await.unwrap();

        let reply = svc.send_message("c1", "hi", BOT, MODEL).await.unwrap();
        assert!(reply.warning);
        assert_eq!(reply.response, NOT_FOUND_REPLY);

        let history = svc.history("c1", None).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].content, NOT_FOUND_REPLY);
    }

    #[tokio::test]
    async fn test_short_reply_substituted_without_warning() {
        let svc = service(StubGateway::replying("Assistant: k"));
        svc.init_chat("c1", BOT, MODEL).await.unwrap();

        let reply = svc.send_message("c1", "hi", BOT, MODEL).await.unwrap();
        assert_eq!(reply.response, SHORT_REPLY_FALLBACK);
        assert!(!reply.warning);
    }

    #[tokio::test]
    async fn test_unknown_chat_is_not_found() {
        let svc = service(StubGateway::replying("hello!"));
        let err = svc
            .send_message("nope", "hi", "anything", "any/model")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::ChatNotFound(id) if id == "nope"));
        assert_eq!(svc.gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reinit_with_other_bot_causes_mismatch() {
        let svc = service(StubGateway::replying("hello!"));
        svc.init_chat("c1", BOT, MODEL).await.unwrap();
        svc.init_chat("c1", "codellama-13b", "codellama/CodeLlama-13b-Instruct-hf")
            .await
            .unwrap();

        let err = svc.send_message("c1", "hi", BOT, MODEL).await.unwrap_err();
        match err {
            ChatError::BotMismatch { bound, requested } => {
                assert_eq!(bound, "codellama-13b");
                assert_eq!(requested, BOT);
            }
            other => panic!("expected BotMismatch, got {other:?}"),
        }
        // Nothing stored for the rejected turn.
        assert!(svc.history("c1", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_fields_are_listed() {
        let svc = service(StubGateway::replying("hello!"));
        let err = svc.send_message("c1", "  ", "", MODEL).await.unwrap_err();
        match err {
            ChatError::MissingFields(fields) => assert_eq!(fields, vec!["message", "botId"]),
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_init_rejects_unknown_bot_and_wrong_model() {
        let svc = service(StubGateway::replying("hello!"));
        assert!(matches!(
            svc.init_chat("c1", "gpt-4", "openai/gpt-4").await,
            Err(ChatError::InvalidBotConfig(_))
        ));
        assert!(matches!(
            svc.init_chat("c1", BOT, "bigcode/starcoder2-15b").await,
            Err(ChatError::InvalidBotConfig(_))
        ));
        assert!(svc.chat_repo().get_chat("c1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_chat() {
        let svc = service(StubGateway::replying("hello!"));
        svc.init_chat("c1", BOT, MODEL).await.unwrap();
        svc.send_message("c1", "hi", BOT, MODEL).await.unwrap();

        svc.clear_chat("c1").await.unwrap();
        assert!(svc.history("c1", None).await.unwrap().is_empty());
        assert!(matches!(
            svc.clear_chat("c1").await,
            Err(ChatError::ChatNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_stats_counts() {
        let svc = service(StubGateway::replying("hello!"));
        svc.init_chat("c1", BOT, MODEL).await.unwrap();
        svc.send_message("c1", "hi", BOT, MODEL).await.unwrap();

        let stats = svc.stats().await.unwrap();
        assert_eq!(stats.total_chats, 1);
        assert_eq!(stats.total_messages, 2);
    }
}
