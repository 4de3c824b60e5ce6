//! The narrow contract to the natural-language inference collaborator.
//!
//! The pipeline never depends on a concrete backend: extraction and
//! planning call through this trait and treat every error variant as an
//! ordinary fallback trigger, never as an abort.

use thiserror::Error;

/// Errors an inference backend may report. All of them route the calling
/// stage to its deterministic fallback.
#[derive(Error, Debug)]
pub enum InferenceError {
    /// No backend is configured or reachable.
    #[error("Inference service unavailable")]
    Unavailable,

    /// The backend did not answer within its deadline.
    #[error("Inference request timed out")]
    Timeout,

    /// The backend answered with an error of its own.
    #[error("Inference backend error: {0}")]
    Backend(String),
}

/// A text-in, text-out inference service.
///
/// The returned string may wrap the JSON object of interest in arbitrary
/// prose or fenced code blocks; callers locate and parse it themselves.
pub trait InferenceClient {
    fn infer(&self, prompt: &str, max_tokens: u32) -> Result<String, InferenceError>;
}

/// A client for running without any inference backend. Every call reports
/// [`InferenceError::Unavailable`], so every stage takes its deterministic
/// fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullClient;

impl InferenceClient for NullClient {
    fn infer(&self, _prompt: &str, _max_tokens: u32) -> Result<String, InferenceError> {
        Err(InferenceError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_client_is_always_unavailable() {
        let client = NullClient;
        assert!(matches!(
            client.infer("anything", 64),
            Err(InferenceError::Unavailable)
        ));
    }
}
