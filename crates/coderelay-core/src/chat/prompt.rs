//! Prompt assembly for completion-style models.
//!
//! The remote models take a single text blob, so the conversation is flattened
//! into a transcript:
//!
//! ```text
//! {preamble}
//! User: ...
//! Assistant: ...
//! User: {new message}
//! Assistant:
//! ```
//!
//! History is bounded by message count only. Individual messages are not
//! guarded against overflowing the model's context.

use coderelay_types::bot::is_code_bot_id;
use coderelay_types::chat::{Message, MessageRole};
use coderelay_types::config::ChatConfig;

/// Preamble for bots following the "code" naming convention.
pub const CODE_PREAMBLE: &str = "You are an expert programming assistant. \
Answer with correct, idiomatic code and keep explanations short.";

/// Preamble for every other bot.
pub const GENERAL_PREAMBLE: &str = "You are a helpful and knowledgeable assistant. \
Answer clearly and concisely.";

/// Trailing cue the model is expected to continue from.
pub const ASSISTANT_CUE: &str = "Assistant:";

/// Marker appended to replayed messages cut by `max_history_chars`.
const TRUNCATION_MARKER: &str = "...";

/// Builds transcripts from stored history.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    history_window: usize,
    max_history_chars: Option<usize>,
}

impl PromptBuilder {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            history_window: config.history_window,
            max_history_chars: config.max_history_chars,
        }
    }

    /// How many stored messages the builder will replay.
    pub fn history_window(&self) -> usize {
        self.history_window
    }

    /// The preamble chosen for a bot id.
    pub fn preamble_for(bot_id: &str) -> &'static str {
        if is_code_bot_id(bot_id) {
            CODE_PREAMBLE
        } else {
            GENERAL_PREAMBLE
        }
    }

    /// Render the full prompt.
    ///
    /// `history` is expected oldest first; only its last `history_window`
    /// entries are used. `user_message` is always included verbatim.
    pub fn build(&self, bot_id: &str, history: &[Message], user_message: &str) -> String {
        let skip = history.len().saturating_sub(self.history_window);
        let mut lines = Vec::with_capacity(history.len() - skip + 3);

        lines.push(Self::preamble_for(bot_id).to_string());

        for message in &history[skip..] {
            lines.push(format!(
                "{}: {}",
                message.role.label(),
                self.clip(message.content.trim())
            ));
        }

        lines.push(format!("{}: {}", MessageRole::User.label(), user_message.trim()));
        lines.push(ASSISTANT_CUE.to_string());

        lines.join("\n")
    }

    fn clip(&self, content: &str) -> String {
        match self.max_history_chars {
            Some(max) if content.chars().count() > max => {
                let mut clipped: String = content.chars().take(max).collect();
                clipped.push_str(TRUNCATION_MARKER);
                clipped
            }
            _ => content.to_string(),
        }
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(&ChatConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn msg(id: i64, role: MessageRole, content: &str) -> Message {
        Message {
            id,
            chat_id: "c1".to_string(),
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }

    fn builder(window: usize, max_chars: Option<usize>) -> PromptBuilder {
        PromptBuilder::new(&ChatConfig {
            history_window: window,
            max_history_chars: max_chars,
            ..ChatConfig::default()
        })
    }

    #[test]
    fn test_empty_history() {
        let prompt = PromptBuilder::default().build("starcoder2-3b", &[], "hi");
        assert_eq!(prompt, format!("{CODE_PREAMBLE}\nUser: hi\nAssistant:"));
    }

    #[test]
    fn test_ends_with_cue_after_newest_user_message() {
        let history = vec![
            msg(1, MessageRole::User, "first"),
            msg(2, MessageRole::Assistant, "reply"),
        ];
        let prompt = PromptBuilder::default().build("starcoder2-3b", &history, "second");
        assert!(prompt.ends_with("User: second\nAssistant:"));
        assert!(prompt.contains("User: first\nAssistant: reply\nUser: second"));
    }

    #[test]
    fn test_preamble_depends_on_bot_naming() {
        let code = PromptBuilder::default().build("codellama-13b", &[], "x");
        let general = PromptBuilder::default().build("kurage-multilingual", &[], "x");
        assert!(code.starts_with(CODE_PREAMBLE));
        assert!(general.starts_with(GENERAL_PREAMBLE));
    }

    #[test]
    fn test_history_window_keeps_most_recent() {
        let history: Vec<Message> = (0..10)
            .map(|i| {
                let role = if i % 2 == 0 {
                    MessageRole::User
                } else {
                    MessageRole::Assistant
                };
                msg(i, role, &format!("m{i}"))
            })
            .collect();

        let prompt = builder(4, None).build("starcoder2-3b", &history, "new");
        assert!(!prompt.contains("m5"));
        for kept in ["m6", "m7", "m8", "m9"] {
            assert!(prompt.contains(kept), "missing {kept}");
        }
        // preamble + 4 history lines + user + cue
        assert_eq!(prompt.lines().count(), 7);
    }

    #[test]
    fn test_zero_window_replays_nothing() {
        let history = vec![msg(1, MessageRole::User, "old")];
        let prompt = builder(0, None).build("starcoder2-3b", &history, "new");
        assert!(!prompt.contains("old"));
        assert!(prompt.ends_with("User: new\nAssistant:"));
    }

    #[test]
    fn test_history_clipped_but_new_message_is_not() {
        let long = "x".repeat(50);
        let history = vec![msg(1, MessageRole::User, &long)];
        let prompt = builder(6, Some(10)).build("starcoder2-3b", &history, &long);

        assert!(prompt.contains(&format!("User: {}...", "x".repeat(10))));
        assert!(prompt.ends_with(&format!("User: {long}\nAssistant:")));
    }

    #[test]
    fn test_very_long_message_passes_through_unbounded() {
        let huge = "fn main() {}\n".repeat(10_000);
        let prompt = PromptBuilder::default().build("starcoder2-3b", &[], &huge);
        assert!(prompt.len() > huge.trim().len());
        assert!(prompt.ends_with(ASSISTANT_CUE));
    }
}
