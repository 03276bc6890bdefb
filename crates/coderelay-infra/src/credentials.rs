//! Inference API key lookup from the environment.
//!
//! Several variable names are in common use for the same token; the first
//! non-empty one wins.

use secrecy::SecretString;

/// Checked in order.
pub const API_KEY_VARS: [&str; 4] = [
    "HUGGINGFACE_API_KEY",
    "HF_API_KEY",
    "HF_TOKEN",
    "HUGGING_FACE_HUB_TOKEN",
];

/// A resolved key and the variable it came from.
pub struct ResolvedKey {
    pub source: &'static str,
    pub key: SecretString,
}

/// Resolve the API key from process environment variables.
pub fn resolve_api_key() -> Option<ResolvedKey> {
    // Non-unicode values are treated as unset.
    resolve_with(|name| std::env::var(name).ok())
}

/// Resolve the API key through an arbitrary lookup.
pub fn resolve_with(lookup: impl Fn(&str) -> Option<String>) -> Option<ResolvedKey> {
    API_KEY_VARS.iter().find_map(|&name| {
        let value = lookup(name)?;
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(ResolvedKey {
                source: name,
                key: SecretString::from(value.to_string()),
            })
        }
    })
}
