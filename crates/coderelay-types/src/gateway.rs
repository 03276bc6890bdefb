//! Types for calls to the remote inference API.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Generation parameters forwarded with every inference request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            temperature: 0.7,
        }
    }
}

/// Ways an inference call can fail.
///
/// `Loading` and `RateLimited` are transient and retried by the gateway;
/// the rest are returned as soon as they are seen.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("inference API rejected the credential")]
    Unauthorized,

    #[error("model not found on the inference API")]
    NotFound,

    #[error("model is still loading")]
    Loading,

    #[error("rate limited by the inference API")]
    RateLimited,

    #[error("inference call failed: {0}")]
    Unknown(String),
}

impl GatewayError {
    /// Short machine-readable kind, used in diagnostics output and logs.
    pub fn kind(&self) -> GatewayErrorKind {
        match self {
            GatewayError::Unauthorized => GatewayErrorKind::Unauthorized,
            GatewayError::NotFound => GatewayErrorKind::NotFound,
            GatewayError::Loading => GatewayErrorKind::Loading,
            GatewayError::RateLimited => GatewayErrorKind::RateLimited,
            GatewayError::Unknown(_) => GatewayErrorKind::Unknown,
        }
    }
}

/// Field-less mirror of [`GatewayError`] for serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayErrorKind {
    Unauthorized,
    NotFound,
    Loading,
    RateLimited,
    Unknown,
}

impl fmt::Display for GatewayErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayErrorKind::Unauthorized => write!(f, "unauthorized"),
            GatewayErrorKind::NotFound => write!(f, "not_found"),
            GatewayErrorKind::Loading => write!(f, "loading"),
            GatewayErrorKind::RateLimited => write!(f, "rate_limited"),
            GatewayErrorKind::Unknown => write!(f, "unknown"),
        }
    }
}
