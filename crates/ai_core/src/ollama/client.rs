//! Ollama `/api/generate` client implementation

use std::fmt;

use async_trait::async_trait;
use domain::Endpoint;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::InferenceConfig;
use crate::error::InferenceError;
use crate::ports::{GenerateRequest, GenerateResponse, GenerationEngine, TokenUsage};

/// Generation path appended to every endpoint
pub const GENERATE_PATH: &str = "/api/generate";

/// Generation engine for Ollama-compatible servers
///
/// The engine is not bound to a base URL; each call names its endpoint so
/// one client serves every stage of a chain.
pub struct OllamaGenerateEngine {
    client: Client,
    config: InferenceConfig,
}

impl fmt::Debug for OllamaGenerateEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OllamaGenerateEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OllamaGenerateEngine {
    /// Create a new engine
    pub fn new(config: InferenceConfig) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(config.timeout()?)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| InferenceError::ClientSetup(e.to_string()))?;

        info!(timeout_secs = config.timeout_secs, "Initialized Ollama generate engine");

        Ok(Self { client, config })
    }

    /// Create with default configuration
    pub fn with_defaults() -> Result<Self, InferenceError> {
        Self::new(InferenceConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }
}

/// Ollama-format generate request
#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Interpret a successful response body
fn decode_response(endpoint: &Endpoint, body: &str) -> Result<GenerateResponse, InferenceError> {
    let payload: Value = serde_json::from_str(body).map_err(|_| InferenceError::Decode {
        endpoint: endpoint.to_string(),
        body: body.to_string(),
    })?;

    let Some(text) = payload.get("response").and_then(Value::as_str) else {
        return Err(InferenceError::Shape {
            endpoint: endpoint.to_string(),
            payload: payload.to_string(),
        });
    };

    let count = |key: &str| {
        payload
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
    };
    let usage = match (count("prompt_eval_count"), count("eval_count")) {
        (Some(prompt), Some(completion)) => Some(TokenUsage {
            prompt_tokens: prompt,
            completion_tokens: completion,
            total_tokens: prompt.saturating_add(completion),
        }),
        _ => None,
    };

    Ok(GenerateResponse {
        text: text.trim().to_string(),
        model: payload
            .get("model")
            .and_then(Value::as_str)
            .map(str::to_string),
        usage,
    })
}

#[async_trait]
impl GenerationEngine for OllamaGenerateEngine {
    #[instrument(skip(self, request), fields(model = %request.model, endpoint = %endpoint, prompt_len = request.prompt.len()))]
    async fn generate(
        &self,
        endpoint: &Endpoint,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, InferenceError> {
        let body = OllamaGenerateRequest {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
        };

        debug!("Sending generate request");

        let response = self
            .client
            .post(endpoint.join(GENERATE_PATH))
            .json(&body)
            .send()
            .await
            .map_err(|e| InferenceError::transport(endpoint.as_str(), &e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| InferenceError::transport(endpoint.as_str(), &e))?;

        if !status.is_success() {
            warn!(status = %status, body = %text, "Generate request failed");
            return Err(InferenceError::Protocol {
                model: request.model.clone(),
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }

        let generated = decode_response(endpoint, &text)?;

        debug!(
            tokens = ?generated.usage.map(|u| u.total_tokens),
            response_len = generated.text.len(),
            "Generation completed"
        );

        Ok(generated)
    }
}
