//! Inference API request/response types.
//!
//! These are wire structures for the text-generation task of the Hugging Face
//! Inference API. They are NOT the generic gateway types from coderelay-types.

use coderelay_types::gateway::GenerationParams;
use serde::{Deserialize, Serialize};

/// Request body for a text-generation call.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceRequest<'a> {
    pub inputs: &'a str,
    pub parameters: InferenceParameters,
}

#[derive(Debug, Clone, Serialize)]
pub struct InferenceParameters {
    pub max_new_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub do_sample: bool,
    /// Only the continuation is wanted, not the prompt echoed back.
    pub return_full_text: bool,
}

impl InferenceParameters {
    pub const TOP_P: f64 = 0.9;
}

impl From<&GenerationParams> for InferenceParameters {
    fn from(params: &GenerationParams) -> Self {
        Self {
            max_new_tokens: params.max_tokens,
            temperature: params.temperature,
            top_p: Self::TOP_P,
            do_sample: true,
            return_full_text: false,
        }
    }
}

/// One generation result object.
///
/// Different backends name the field differently; both are accepted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Generation {
    #[serde(default)]
    pub generated_text: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl Generation {
    fn into_text(self) -> Option<String> {
        self.generated_text.or(self.text)
    }
}

/// The shapes a successful response body is known to take.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InferenceOutput {
    /// `[{"generated_text": "..."}]`
    Batch(Vec<Generation>),
    /// `{"generated_text": "..."}`
    Single(Generation),
    /// `"..."`
    Text(String),
    /// Anything else, including bodies that are not JSON.
    #[serde(skip)]
    Unparseable,
}

impl InferenceOutput {
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or(InferenceOutput::Unparseable)
    }

    /// Generated text, if the body carried any.
    pub fn into_text(self) -> Option<String> {
        match self {
            InferenceOutput::Batch(items) => items.into_iter().find_map(Generation::into_text),
            InferenceOutput::Single(item) => item.into_text(),
            InferenceOutput::Text(text) => Some(text),
            InferenceOutput::Unparseable => None,
        }
    }
}
