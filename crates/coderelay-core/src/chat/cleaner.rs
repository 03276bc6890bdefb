//! Post-processing of generated text.
//!
//! Completion models tend to echo the transcript format back: a repeated
//! preamble, bare role labels, the user's own turn, a leading `Assistant:`
//! or an invented next `User:` turn. They also loop on a line. The cleaner
//! strips those artifacts and replaces replies that end up too short to be
//! useful.

use coderelay_types::config::ChatConfig;

use super::prompt::{CODE_PREAMBLE, GENERAL_PREAMBLE};

/// Substituted when the cleaned reply is shorter than the configured minimum.
pub const SHORT_REPLY_FALLBACK: &str =
    "I'm not sure how to answer that. Could you rephrase or add more detail?";

const ROLE_LABELS: [&str; 3] = ["user:", "assistant:", "system:"];

/// Result of cleaning one reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedReply {
    pub text: String,
    /// True when the model output was replaced by [`SHORT_REPLY_FALLBACK`].
    pub substituted: bool,
}

#[derive(Debug, Clone)]
pub struct ResponseCleaner {
    min_chars: usize,
}

impl ResponseCleaner {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            min_chars: config.min_response_chars,
        }
    }

    pub fn clean(&self, raw: &str) -> CleanedReply {
        let normalized = raw.replace("\r\n", "\n");
        // Leading echo of the preamble and bare role markers.
        let mut lines: Vec<String> = normalized
            .lines()
            .skip_while(|line| is_artifact_line(line))
            .map(str::to_string)
            .collect();

        // Echoed user turn ahead of the answer: resume at the first
        // `Assistant:` marker, or just drop the echo when there is none.
        if lines.first().is_some_and(|line| is_labelled(line, "user:")) {
            match lines.iter().position(|line| is_labelled(line, "assistant:")) {
                Some(answer) => drop(lines.drain(..answer)),
                None => drop(lines.remove(0)),
            }
        }

        // "Assistant: actual answer" on the first line.
        if let Some(first) = lines.first_mut() {
            if let Some(rest) = strip_label(first.trim_start(), "assistant:") {
                *first = rest.trim_start().to_string();
            }
        }
        while lines.first().is_some_and(|line| line.trim().is_empty()) {
            lines.remove(0);
        }

        // The model started writing the user's next turn.
        if let Some(cut) = lines.iter().position(|line| is_labelled(line, "user:")) {
            lines.truncate(cut);
        }

        lines.dedup();

        let text = lines.join("\n").trim().to_string();
        if text.chars().count() < self.min_chars {
            return CleanedReply {
                text: SHORT_REPLY_FALLBACK.to_string(),
                substituted: true,
            };
        }

        CleanedReply {
            text,
            substituted: false,
        }
    }
}

impl Default for ResponseCleaner {
    fn default() -> Self {
        Self::new(&ChatConfig::default())
    }
}

fn is_artifact_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed == CODE_PREAMBLE || trimmed == GENERAL_PREAMBLE {
        return true;
    }
    let lower = trimmed.to_lowercase();
    ROLE_LABELS.contains(&lower.as_str())
}

fn is_labelled(line: &str, label: &str) -> bool {
    strip_label(line.trim_start(), label).is_some()
}

/// Case-insensitive label prefix strip.
fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let head = line.get(..label.len())?;
    if head.eq_ignore_ascii_case(label) {
        Some(&line[label.len()..])
    } else {
        None
    }
}
