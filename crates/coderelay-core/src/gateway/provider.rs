//! ModelGateway trait definition.
//!
//! This is the core abstraction over the remote inference service. The
//! retry loop and response normalization live in the implementation; callers
//! see either generated text or a classified [`GatewayError`].

use coderelay_types::gateway::{GatewayError, GenerationParams};

/// Trait for remote text-generation backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in coderelay-infra (e.g., `HuggingFaceGateway`).
pub trait ModelGateway: Send + Sync {
    /// Human-readable backend name (e.g., "huggingface").
    fn name(&self) -> &str;

    /// Generate a continuation of `prompt` with the model at `model_path`.
    ///
    /// Transient failures are retried inside the call, so this may block for
    /// the combined backoff delay before returning.
    fn invoke(
        &self,
        model_path: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> impl std::future::Future<Output = Result<String, GatewayError>> + Send;
}
