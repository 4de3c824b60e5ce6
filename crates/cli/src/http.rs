//! HTTP-backed inference client.
//!
//! Posts `{"prompt", "max_tokens"}` to a configured endpoint and reads the
//! reply's `response` field, the shape the original inference gateway
//! returns. Transport problems become [`InferenceError`] values, which the
//! pipeline treats as fallback triggers rather than failures.

use proposal_core::{InferenceClient, InferenceError};
use serde_json::json;
use std::time::Duration;

/// Upper bound on one inference round trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct HttpInferenceClient {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpInferenceClient {
    /// Build a client for the given endpoint URL. Returns `None` when the
    /// underlying HTTP client cannot be constructed.
    pub fn new(endpoint: impl Into<String>) -> Option<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .ok()?;
        Some(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

impl InferenceClient for HttpInferenceClient {
    fn infer(&self, prompt: &str, max_tokens: u32) -> Result<String, InferenceError> {
        let body = json!({
            "prompt": prompt,
            "max_tokens": max_tokens,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    InferenceError::Timeout
                } else if e.is_connect() {
                    InferenceError::Unavailable
                } else {
                    InferenceError::Backend(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(InferenceError::Backend(format!(
                "endpoint returned {}",
                response.status()
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .map_err(|e| InferenceError::Backend(format!("invalid reply body: {}", e)))?;

        payload
            .get("response")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| InferenceError::Backend("reply carried no 'response' field".to_string()))
    }
}
