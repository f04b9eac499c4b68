//! Port definitions for text generation
//!
//! Defines the trait (port) that generation adapters must implement.

use async_trait::async_trait;
use domain::Endpoint;
use serde::{Deserialize, Serialize};

use crate::error::InferenceError;

/// A single prompt for one model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier as known to the server
    pub model: String,
    /// Fully composed prompt text
    pub prompt: String,
}

impl GenerateRequest {
    /// Create a request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
        }
    }
}

/// Generated text plus whatever metadata the server reported
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The `response` field, trimmed
    pub text: String,
    /// Model name echoed by the server
    pub model: Option<String>,
    /// Token usage statistics
    pub usage: Option<TokenUsage>,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Port for generation engine implementations
#[async_trait]
pub trait GenerationEngine: Send + Sync {
    /// Send one non-streaming generation request to `endpoint`
    async fn generate(
        &self,
        endpoint: &Endpoint,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, InferenceError>;
}
