//! Tuning configuration for coderelay.
//!
//! `AppConfig` mirrors the optional TOML tuning file. Every key has a default,
//! so an empty or missing file yields `AppConfig::default()`. The bot registry
//! is not part of this file; it is a static table.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level tuning configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Prompt construction and reply cleaning knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// How many stored messages are replayed into the prompt.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Optional cap on the characters kept from each replayed message.
    /// The new user message is never truncated.
    #[serde(default)]
    pub max_history_chars: Option<usize>,

    /// Cleaned replies shorter than this are replaced by a fallback phrase.
    #[serde(default = "default_min_response_chars")]
    pub min_response_chars: usize,
}

fn default_history_window() -> usize {
    6
}

fn default_min_response_chars() -> usize {
    5
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            max_history_chars: None,
            min_response_chars: default_min_response_chars(),
        }
    }
}

/// Remote inference API settings and retry policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base sleep after a 503; multiplied by the attempt number.
    #[serde(default = "default_loading_delay_secs")]
    pub loading_delay_secs: u64,
    /// Base sleep after a 429; multiplied by the attempt number.
    #[serde(default = "default_rate_limit_delay_secs")]
    pub rate_limit_delay_secs: u64,
    /// Base sleep after a connect error or timeout; multiplied by the attempt number.
    #[serde(default = "default_network_delay_secs")]
    pub network_delay_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_loading_delay_secs() -> u64 {
    5
}

fn default_rate_limit_delay_secs() -> u64 {
    10
}

fn default_network_delay_secs() -> u64 {
    2
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_attempts: default_max_attempts(),
            loading_delay_secs: default_loading_delay_secs(),
            rate_limit_delay_secs: default_rate_limit_delay_secs(),
            network_delay_secs: default_network_delay_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Diagnostics sweep pacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Pause between consecutive model calls, to stay under the API rate limit.
    #[serde(default = "default_sweep_delay_ms")]
    pub sweep_delay_ms: u64,
}

fn default_sweep_delay_ms() -> u64 {
    1_000
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            sweep_delay_ms: default_sweep_delay_ms(),
        }
    }
}

impl DiagnosticsConfig {
    pub fn sweep_delay(&self) -> Duration {
        Duration::from_millis(self.sweep_delay_ms)
    }
}
