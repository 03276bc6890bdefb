//! OpenTelemetry GenAI Semantic Convention attribute names and values.
//!
//! Field names in `tracing` span macros must be literal, so spans declare
//! these names as empty fields and fill them in with `Span::record` using
//! the constants below.

// --- Required attributes ---

/// The name of the operation being performed (e.g., "text_completion").
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The name of the GenAI provider (e.g., "huggingface").
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

// --- Recommended attributes ---

/// The model path requested (e.g., "bigcode/starcoder2-3b").
pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

/// The sampling temperature for the request.
pub const GEN_AI_REQUEST_TEMPERATURE: &str = "gen_ai.request.temperature";

/// The maximum number of new tokens requested.
pub const GEN_AI_REQUEST_MAX_TOKENS: &str = "gen_ai.request.max_tokens";

// --- Values ---

/// Prompt-in, text-out completion (no chat message structure).
pub const OP_TEXT_COMPLETION: &str = "text_completion";

pub const PROVIDER_HUGGINGFACE: &str = "huggingface";
