//! Ollama generation adapter - Implements GenerationPort using ai_core
//!
//! Works with any server exposing the Ollama `/api/generate` route.

use ai_core::{
    GenerateRequest, GenerationEngine, InferenceConfig, InferenceError, OllamaGenerateEngine,
};
use application::{error::ApplicationError, ports::GenerationPort};
use async_trait::async_trait;
use domain::Endpoint;
use tracing::{debug, instrument};

/// Adapter for Ollama-compatible generation servers
#[derive(Debug)]
pub struct OllamaGenerationAdapter {
    engine: OllamaGenerateEngine,
}

impl OllamaGenerationAdapter {
    /// Create a new adapter with the given configuration
    pub fn new(config: InferenceConfig) -> Result<Self, ApplicationError> {
        let engine = OllamaGenerateEngine::new(config).map_err(Self::map_error)?;
        Ok(Self { engine })
    }

    /// Wrap an existing engine
    pub const fn from_engine(engine: OllamaGenerateEngine) -> Self {
        Self { engine }
    }

    /// Convert ai_core error to application error
    fn map_error(e: InferenceError) -> ApplicationError {
        match e {
            InferenceError::Transport { .. } => ApplicationError::Transport(e.to_string()),
            InferenceError::Protocol { status, .. } => ApplicationError::Protocol {
                status,
                message: e.to_string(),
            },
            InferenceError::Decode { .. } => ApplicationError::Decode(e.to_string()),
            InferenceError::Shape { .. } => ApplicationError::Shape(e.to_string()),
            InferenceError::ClientSetup(msg) => ApplicationError::Configuration(msg),
        }
    }
}

#[async_trait]
impl GenerationPort for OllamaGenerationAdapter {
    #[instrument(skip(self, prompt), fields(endpoint = %endpoint, model = model))]
    async fn generate(
        &self,
        endpoint: &Endpoint,
        model: &str,
        prompt: &str,
    ) -> Result<String, ApplicationError> {
        let request = GenerateRequest::new(model, prompt);
        let response = self
            .engine
            .generate(endpoint, &request)
            .await
            .map_err(Self::map_error)?;

        debug!(
            served_by = ?response.model,
            tokens = ?response.usage.map(|u| u.total_tokens),
            "Generation adapter returned"
        );

        Ok(response.text)
    }
}
