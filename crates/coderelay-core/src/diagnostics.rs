//! Model diagnostics sweep.
//!
//! Sends a fixed prompt to one or every registered bot, strictly one after the
//! other, and records latency and outcome per bot. A failing bot is recorded
//! and the sweep moves on.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use coderelay_types::bot::BotConfig;
use coderelay_types::config::DiagnosticsConfig;
use coderelay_types::diagnostics::{DiagnosticsReport, DiagnosticsSummary, ProbeResult, ProbeStatus};
use coderelay_types::error::ChatError;
use coderelay_types::gateway::GenerationParams;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::gateway::provider::ModelGateway;
use crate::registry::BotRegistry;

pub const PROBE_PROMPT: &str = "Write a Python function that returns the sum of two numbers.";

/// Probes use a small budget; the answer is only previewed.
const PROBE_PARAMS: GenerationParams = GenerationParams {
    max_tokens: 64,
    temperature: 0.2,
};

const PREVIEW_CHARS: usize = 120;

pub struct DiagnosticsService<G: ModelGateway> {
    gateway: G,
    registry: Arc<BotRegistry>,
    sweep_delay: Duration,
}

impl<G: ModelGateway> DiagnosticsService<G> {
    pub fn new(gateway: G, registry: Arc<BotRegistry>, config: &DiagnosticsConfig) -> Self {
        Self {
            gateway,
            registry,
            sweep_delay: config.sweep_delay(),
        }
    }

    /// Probe a single bot, or all of them when `bot_id` is `None`.
    pub async fn run(&self, bot_id: Option<&str>) -> Result<DiagnosticsReport, ChatError> {
        let selected: Vec<&BotConfig> = match bot_id {
            Some(id) => vec![
                self.registry
                    .get(id)
                    .ok_or_else(|| ChatError::InvalidBotConfig(format!("unknown bot '{id}'")))?,
            ],
            None => self.registry.all().iter().collect(),
        };

        info!(bots = selected.len(), "Starting diagnostics sweep");

        let mut results = Vec::with_capacity(selected.len());
        for (i, bot) in selected.iter().enumerate() {
            if i > 0 && !self.sweep_delay.is_zero() {
                tokio::time::sleep(self.sweep_delay).await;
            }
            results.push(self.probe(bot).await);
        }

        let summary = DiagnosticsSummary::from_results(&results);
        info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            "Diagnostics sweep finished"
        );

        Ok(DiagnosticsReport {
            summary,
            results,
            timestamp: Utc::now(),
        })
    }

    async fn probe(&self, bot: &BotConfig) -> ProbeResult {
        let started = Instant::now();
        let outcome = self.gateway.invoke(&bot.model, PROBE_PROMPT, &PROBE_PARAMS).await;
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let mut result = ProbeResult {
            bot_id: bot.id.clone(),
            name: bot.name.clone(),
            model: bot.model.clone(),
            category: bot.category,
            status: ProbeStatus::Success,
            latency_ms,
            response: None,
            error: None,
            error_kind: None,
        };

        match outcome {
            Ok(text) => result.response = Some(preview(&text)),
            Err(err) => {
                warn!(bot_id = %bot.id, error_kind = %err.kind(), "Probe failed");
                result.status = ProbeStatus::Failed;
                result.error_kind = Some(err.kind());
                result.error = Some(err.to_string());
            }
        }
        result
    }
}

fn preview(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= PREVIEW_CHARS {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(PREVIEW_CHARS).collect();
    out.push_str("...");
    out
}
