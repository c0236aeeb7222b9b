use thiserror::Error;

/// Errors raised inside the re-ranking call.
///
/// These never cross the module boundary: every failure path degrades to the
/// deterministic fallback ordering.
#[derive(Debug, Error)]
pub enum RerankError {
    #[error("LLM request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("LLM returned HTTP {status}")]
    BadStatus { status: u16 },

    #[error("LLM response contained no choices")]
    EmptyResponse,

    #[error("LLM response is not valid JSON: {reason}")]
    InvalidJson { reason: String },
}

impl From<reqwest::Error> for RerankError {
    fn from(err: reqwest::Error) -> Self {
        RerankError::RequestFailed {
            reason: err.to_string(),
        }
    }
}
