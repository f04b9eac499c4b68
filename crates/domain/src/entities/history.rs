//! History entity - The ordered transcript of a chain run

use serde::{Deserialize, Serialize};

use crate::value_objects::UserPrompt;

/// Label of the first history entry
pub const USER_PROMPT_LABEL: &str = "User Prompt";

/// One `(label, text)` pair of the history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Section title: `User Prompt` or the responding model's name
    pub label: String,
    /// Prompt or raw response text
    pub text: String,
}

/// Append-only history, always starting with the user prompt
///
/// ```
/// use domain::{History, UserPrompt};
///
/// let mut history = History::new(&UserPrompt::new("Hi").unwrap());
/// history.append("modelA", "Hello!");
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.entries()[0].label, "User Prompt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    /// Start a history from the initial prompt
    pub fn new(prompt: &UserPrompt) -> Self {
        Self {
            entries: vec![HistoryEntry {
                label: USER_PROMPT_LABEL.to_string(),
                text: prompt.as_str().to_string(),
            }],
        }
    }

    /// Append a stage response
    pub fn append(&mut self, label: impl Into<String>, text: impl Into<String>) {
        self.entries.push(HistoryEntry {
            label: label.into(),
            text: text.into(),
        });
    }

    /// All entries in insertion order
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Iterate over entries in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    /// Number of entries, including the user prompt
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false, the user prompt entry is never removed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent entry
    pub fn last(&self) -> &HistoryEntry {
        // The prompt entry is inserted by the only constructor.
        &self.entries[self.entries.len() - 1]
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
