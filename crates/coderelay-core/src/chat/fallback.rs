//! Canned assistant replies for failed inference calls.
//!
//! These are stored and returned exactly like model output; the caller only
//! learns about the failure through the `warning` flag.

use coderelay_types::gateway::GatewayError;

pub const NOT_FOUND_REPLY: &str =
    "This model isn't available on the inference service right now. Please try a different model.";

pub const LOADING_REPLY: &str =
    "The model is still warming up. Please try again shortly.";

pub const RATE_LIMITED_REPLY: &str =
    "The inference service is busy at the moment. Please wait a moment and try again.";

pub const GENERIC_REPLY: &str =
    "I'm having trouble reaching the model right now. Please try again later.";

/// Pick the fallback reply for a gateway failure.
pub fn fallback_reply(error: &GatewayError) -> &'static str {
    match error {
        GatewayError::NotFound => NOT_FOUND_REPLY,
        GatewayError::Loading => LOADING_REPLY,
        GatewayError::RateLimited => RATE_LIMITED_REPLY,
        GatewayError::Unauthorized | GatewayError::Unknown(_) => GENERIC_REPLY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_wording_by_kind() {
        assert!(fallback_reply(&GatewayError::NotFound).contains("try a different model"));
        assert!(fallback_reply(&GatewayError::Loading).contains("try again shortly"));
        assert!(fallback_reply(&GatewayError::RateLimited).contains("wait a moment"));
        assert_eq!(fallback_reply(&GatewayError::Unauthorized), GENERIC_REPLY);
        assert_eq!(
            fallback_reply(&GatewayError::Unknown("HTTP 500".into())),
            GENERIC_REPLY
        );
    }
}
