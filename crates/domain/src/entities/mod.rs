//! Domain entities - Objects with identity and lifecycle

mod history;

pub use history::{History, HistoryEntry, USER_PROMPT_LABEL};
