use serde::{Deserialize, Serialize};

use std::fmt;

use crate::gateway::GenerationParams;

/// Speed tier of a bot, used for grouping in the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotCategory {
    Lightning,
    Balanced,
    Power,
}

impl fmt::Display for BotCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotCategory::Lightning => write!(f, "lightning"),
            BotCategory::Balanced => write!(f, "balanced"),
            BotCategory::Power => write!(f, "power"),
        }
    }
}

/// A named configuration pointing at one remote model plus its generation
/// parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    /// Short registry key, e.g. `starcoder2-3b`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Remote model path on the inference API, e.g. `bigcode/starcoder2-3b`.
    pub model: String,
    pub category: BotCategory,
    /// Relative strength, 1 (fastest) to 3 (strongest).
    pub power: u8,
    pub description: String,
    pub specs: String,
    #[serde(skip)]
    pub params: GenerationParams,
}

/// The naming convention check on a raw bot id.
pub fn is_code_bot_id(bot_id: &str) -> bool {
    bot_id.to_lowercase().contains("code")
}
