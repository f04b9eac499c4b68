//! Adapters implementing application ports

mod ollama_generation_adapter;

pub use ollama_generation_adapter::OllamaGenerationAdapter;
