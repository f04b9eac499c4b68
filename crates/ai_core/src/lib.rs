//! AI Core - Text generation against Ollama-compatible servers
//!
//! Provides the generation port and an HTTP client for the
//! `/api/generate` endpoint. Each call is a single non-streaming request.

pub mod config;
pub mod error;
pub mod ollama;
pub mod ports;

pub use config::InferenceConfig;
pub use error::InferenceError;
pub use ollama::OllamaGenerateEngine;
pub use ports::{GenerateRequest, GenerateResponse, GenerationEngine, TokenUsage};
