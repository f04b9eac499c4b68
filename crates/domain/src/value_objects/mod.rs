//! Value Objects - Immutable, identity-less domain primitives

mod endpoint;
mod stage;
mod user_prompt;

pub use endpoint::{DEFAULT_ENDPOINT, Endpoint};
pub use stage::Stage;
pub use user_prompt::UserPrompt;
