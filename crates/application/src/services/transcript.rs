//! Transcript rendering
//!
//! Turns a finished history into a Markdown document with one `##` section
//! per entry.

use domain::History;
use serde::{Deserialize, Serialize};

/// Title and placeholder used when rendering a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptFormat {
    /// Top-level `#` heading
    #[serde(default = "default_title")]
    pub title: String,

    /// Body written for entries whose text is blank
    #[serde(default = "default_empty_placeholder")]
    pub empty_placeholder: String,
}

fn default_title() -> String {
    "Ollama Chain Transcript".to_string()
}

fn default_empty_placeholder() -> String {
    "(empty)".to_string()
}

impl Default for TranscriptFormat {
    fn default() -> Self {
        Self {
            title: default_title(),
            empty_placeholder: default_empty_placeholder(),
        }
    }
}

/// Render the history as a Markdown transcript
pub fn render_transcript(history: &History, format: &TranscriptFormat) -> String {
    let mut lines = vec![format!("# {}", format.title)];
    for entry in history {
        let body = entry.text.trim();
        lines.push(String::new());
        lines.push(format!("## {}", entry.label));
        lines.push(String::new());
        lines.push(if body.is_empty() {
            format.empty_placeholder.clone()
        } else {
            body.to_string()
        });
    }
    lines.join("\n")
}
