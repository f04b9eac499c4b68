//! Application services

mod chain_service;
mod directive_policy;
mod prompt_composer;
mod transcript;

pub use chain_service::{ChainPlan, ChainService};
pub use directive_policy::{DEFAULT_DIRECTIVE, DirectivePolicy};
pub use prompt_composer::{compose_stage_prompt, format_history};
pub use transcript::{TranscriptFormat, render_transcript};
