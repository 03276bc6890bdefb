//! Report types for the model diagnostics sweep.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bot::BotCategory;
use crate::gateway::GatewayErrorKind;

/// Pass/fail outcome for one bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Success,
    Failed,
}

/// Result of exercising a single bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub bot_id: String,
    pub name: String,
    pub model: String,
    pub category: BotCategory,
    pub status: ProbeStatus,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<GatewayErrorKind>,
}

/// Totals over a sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Mean latency of the successful probes; `None` when nothing passed.
    pub average_latency_ms: Option<u64>,
}

impl DiagnosticsSummary {
    pub fn from_results(results: &[ProbeResult]) -> Self {
        let passed: Vec<u64> = results
            .iter()
            .filter(|r| r.status == ProbeStatus::Success)
            .map(|r| r.latency_ms)
            .collect();

        let average_latency_ms = if passed.is_empty() {
            None
        } else {
            Some(passed.iter().sum::<u64>() / passed.len() as u64)
        };

        Self {
            total: results.len(),
            passed: passed.len(),
            failed: results.len() - passed.len(),
            average_latency_ms,
        }
    }
}

/// Full output of `GET /test`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsReport {
    pub summary: DiagnosticsSummary,
    pub results: Vec<ProbeResult>,
    pub timestamp: DateTime<Utc>,
}
