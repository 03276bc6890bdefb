//! HuggingFaceGateway -- concrete [`ModelGateway`] implementation for the
//! Hugging Face Inference API.
//!
//! Each call POSTs the prompt to `{base_url}/{model_path}` and runs the
//! retry loop described by [`RetryPolicy`]: loading and rate-limit responses
//! and network faults are retried with linear backoff, everything else fails
//! on the first response.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use coderelay_core::gateway::provider::ModelGateway;
use coderelay_core::gateway::retry::{AttemptFailure, RetryPolicy};
use coderelay_observe::genai_attrs::{
    GEN_AI_OPERATION_NAME, GEN_AI_PROVIDER_NAME, GEN_AI_REQUEST_MAX_TOKENS, GEN_AI_REQUEST_MODEL,
    GEN_AI_REQUEST_TEMPERATURE, OP_TEXT_COMPLETION, PROVIDER_HUGGINGFACE,
};
use coderelay_types::config::GatewayConfig;
use coderelay_types::gateway::{GatewayError, GenerationParams};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::field::Empty;
use tracing::{Instrument, Span, debug, info_span, warn};

use super::types::{InferenceOutput, InferenceParameters, InferenceRequest};

/// Returned in place of generated text when a 2xx body has no recognizable shape.
pub const UNPARSEABLE_REPLY: &str = "Sorry, I could not parse the model response.";

/// Longest slice of an error body carried into [`GatewayError::Unknown`].
const ERROR_BODY_PREVIEW: usize = 200;

/// Hugging Face Inference API gateway.
///
/// A missing API key is allowed; requests then go out without an
/// `Authorization` header and usually come back 401.
pub struct HuggingFaceGateway {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
    retry: RetryPolicy,
}

impl HuggingFaceGateway {
    pub fn new(api_key: Option<SecretString>, config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::from_config(config),
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn url(&self, model_path: &str) -> String {
        format!("{}/{}", self.base_url, model_path.trim_start_matches('/'))
    }

    /// One HTTP round trip, classified for the retry loop.
    async fn attempt(&self, url: &str, body: &InferenceRequest<'_>) -> Result<String, AttemptFailure> {
        let mut request = self.client.post(url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| AttemptFailure::Network(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(AttemptFailure::Remote(classify_status(status, &error_body)));
        }

        let text = response
            .text()
            .await
            .map_err(|e| AttemptFailure::Network(format!("failed to read response body: {e}")))?;

        match InferenceOutput::parse(&text).into_text() {
            Some(generated) => Ok(generated),
            None => {
                warn!(body_len = text.len(), "Unrecognized inference response shape");
                Ok(UNPARSEABLE_REPLY.to_string())
            }
        }
    }

    async fn invoke_with_retry(
        &self,
        model_path: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GatewayError> {
        let url = self.url(model_path);
        let body = InferenceRequest {
            inputs: prompt,
            parameters: InferenceParameters::from(params),
        };

        let mut attempt = 1;
        loop {
            match self.attempt(&url, &body).await {
                Ok(text) => {
                    debug!(attempt, chars = text.len(), "Inference succeeded");
                    return Ok(text);
                }
                Err(failure) => match self.retry.backoff(&failure, attempt) {
                    Some(delay) => {
                        warn!(
                            attempt,
                            max_attempts = self.retry.max_attempts,
                            delay_ms = delay.as_millis() as u64,
                            failure = ?failure,
                            "Inference attempt failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    None => {
                        let err = failure.into_gateway_error();
                        warn!(attempt, error_kind = %err.kind(), "Inference failed");
                        return Err(err);
                    }
                },
            }
        }
    }
}

// HuggingFaceGateway does not derive Debug; the key stays out of any output.

impl ModelGateway for HuggingFaceGateway {
    fn name(&self) -> &str {
        PROVIDER_HUGGINGFACE
    }

    async fn invoke(
        &self,
        model_path: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GatewayError> {
        let span = request_span(model_path, params);

        self.invoke_with_retry(model_path, prompt, params)
            .instrument(span)
            .await
    }
}

fn request_span(model_path: &str, params: &GenerationParams) -> Span {
    let span = info_span!(
        "gen_ai.text_completion",
        gen_ai.operation.name = Empty,
        gen_ai.provider.name = Empty,
        gen_ai.request.model = Empty,
        gen_ai.request.max_tokens = Empty,
        gen_ai.request.temperature = Empty,
    );
    span.record(GEN_AI_OPERATION_NAME, OP_TEXT_COMPLETION);
    span.record(GEN_AI_PROVIDER_NAME, PROVIDER_HUGGINGFACE);
    span.record(GEN_AI_REQUEST_MODEL, model_path);
    span.record(GEN_AI_REQUEST_MAX_TOKENS, params.max_tokens);
    span.record(GEN_AI_REQUEST_TEMPERATURE, params.temperature);
    span
}

/// Map a non-success status to a gateway error.
fn classify_status(status: StatusCode, body: &str) -> GatewayError {
    match status.as_u16() {
        401 | 403 => GatewayError::Unauthorized,
        404 => GatewayError::NotFound,
        429 => GatewayError::RateLimited,
        503 => GatewayError::Loading,
        _ => {
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
            GatewayError::Unknown(format!("HTTP {status}: {preview}"))
        }
    }
}
