//! Generation errors

use thiserror::Error;

/// Errors that can occur while dispatching a prompt
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Endpoint could not be reached (connect failure, timeout, I/O)
    #[error("Failed to reach {endpoint}: {reason}")]
    Transport { endpoint: String, reason: String },

    /// Endpoint answered with a non-success status
    #[error("{model} on {endpoint} returned HTTP {status}: {body}")]
    Protocol {
        model: String,
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Response body is not valid JSON
    #[error("Could not decode response from {endpoint}: {body}")]
    Decode { endpoint: String, body: String },

    /// Decoded response has no textual `response` field
    #[error("Response from {endpoint} is missing text output: {payload}")]
    Shape { endpoint: String, payload: String },

    /// HTTP client could not be constructed
    #[error("Client setup failed: {0}")]
    ClientSetup(String),
}

impl InferenceError {
    /// Build a transport error from a reqwest failure, keeping the cause chain
    pub fn transport(endpoint: impl Into<String>, err: &reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            "request timed out".to_string()
        } else {
            error_chain(err)
        };
        Self::Transport {
            endpoint: endpoint.into(),
            reason,
        }
    }
}

/// Join an error and its sources into one line
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
