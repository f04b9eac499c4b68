//! Prompt composition
//!
//! Renders the accumulated history as `### <label>` sections and appends the
//! stage's task section.

use domain::History;

/// Serialize every non-blank history entry as a titled section
pub fn format_history(history: &History) -> String {
    history
        .iter()
        .filter_map(|entry| {
            let text = entry.text.trim();
            (!text.is_empty()).then(|| format!("### {}\n{text}", entry.label))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the full input for the stage running `model`
pub fn compose_stage_prompt(history: &History, model: &str, directive: Option<&str>) -> String {
    let mut prompt = format_history(history);
    if let Some(directive) = directive.map(str::trim).filter(|d| !d.is_empty()) {
        prompt.push_str(&format!("\n\n### Task for {model}\n{directive}"));
    }
    prompt
}
