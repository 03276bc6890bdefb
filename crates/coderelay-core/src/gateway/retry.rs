//! Retry policy for inference calls.
//!
//! Stateless decision logic: given the outcome of attempt `n`, should the
//! gateway sleep and try again, and for how long. The delays grow linearly
//! with the attempt number.

use std::time::Duration;

use coderelay_types::config::GatewayConfig;
use coderelay_types::gateway::GatewayError;

/// Why an attempt failed, from the retry loop's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// The remote service answered with a classified error.
    Remote(GatewayError),
    /// The request never produced a response (connect error, timeout).
    Network(String),
}

impl AttemptFailure {
    /// The error reported to the caller once retries are exhausted.
    pub fn into_gateway_error(self) -> GatewayError {
        match self {
            AttemptFailure::Remote(err) => err,
            AttemptFailure::Network(msg) => GatewayError::Unknown(msg),
        }
    }
}

/// Attempt budget and base delays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub loading_delay: Duration,
    pub rate_limit_delay: Duration,
    pub network_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&GatewayConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            loading_delay: Duration::from_secs(config.loading_delay_secs),
            rate_limit_delay: Duration::from_secs(config.rate_limit_delay_secs),
            network_delay: Duration::from_secs(config.network_delay_secs),
        }
    }

    /// A policy that retries with no sleeping at all.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            loading_delay: Duration::ZERO,
            rate_limit_delay: Duration::ZERO,
            network_delay: Duration::ZERO,
        }
    }

    /// How long to wait before the next attempt, or `None` to give up.
    ///
    /// `attempt` is 1-based (the first request is attempt 1). Not-found,
    /// unauthorized and unclassified remote errors are never retried.
    pub fn backoff(&self, failure: &AttemptFailure, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }

        let base = match failure {
            AttemptFailure::Remote(GatewayError::Loading) => self.loading_delay,
            AttemptFailure::Remote(GatewayError::RateLimited) => self.rate_limit_delay,
            AttemptFailure::Network(_) => self.network_delay,
            AttemptFailure::Remote(_) => return None,
        };

        Some(base * attempt)
    }
}
