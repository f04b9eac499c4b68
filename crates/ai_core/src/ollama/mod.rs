//! Ollama-compatible generation engine
//!
//! Talks to any server exposing Ollama's `/api/generate` endpoint
//! (standard Ollama or compatible servers).

mod client;

pub use client::{GENERATE_PATH, OllamaGenerateEngine};
