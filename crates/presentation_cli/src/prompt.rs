//! Initial prompt loading

use std::path::Path;

use anyhow::{Context, bail};

/// Resolve the initial prompt from `--prompt` or `--prompt-file`
///
/// An empty `--prompt` counts as not given.
pub fn load_prompt(prompt: Option<&str>, prompt_file: Option<&Path>) -> anyhow::Result<String> {
    match (prompt.filter(|text| !text.is_empty()), prompt_file) {
        (Some(_), Some(_)) => bail!("Use either --prompt or --prompt-file, not both."),
        (None, Some(path)) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read prompt file {}", path.display()))?;
            let content = content.trim();
            if content.is_empty() {
                bail!("Prompt file is empty.");
            }
            Ok(content.to_string())
        },
        (Some(text), None) => {
            let text = text.trim();
            if text.is_empty() {
                bail!("Prompt text cannot be empty.");
            }
            Ok(text.to_string())
        },
        (None, None) => bail!("A starting prompt is required (use --prompt or --prompt-file)."),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn inline_prompt_is_trimmed() {
        assert_eq!(load_prompt(Some("  Hi \n"), None).unwrap(), "Hi");
    }

    #[test]
    fn blank_inline_prompt_rejected() {
        let err = load_prompt(Some("   "), None).unwrap_err();
        assert_eq!(err.to_string(), "Prompt text cannot be empty.");
    }

    #[test]
    fn prompt_file_is_read_and_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "\n  Design a REST API  \n").unwrap();
        assert_eq!(
            load_prompt(None, Some(file.path())).unwrap(),
            "Design a REST API"
        );
    }

    #[test]
    fn empty_prompt_file_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = load_prompt(None, Some(file.path())).unwrap_err();
        assert_eq!(err.to_string(), "Prompt file is empty.");
    }

    #[test]
    fn missing_prompt_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        let err = load_prompt(None, Some(&path)).unwrap_err();
        assert!(err.to_string().contains("absent.txt"));
    }

    #[test]
    fn both_sources_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(load_prompt(Some("Hi"), Some(file.path())).is_err());
    }

    #[test]
    fn empty_inline_prompt_defers_to_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "From file").unwrap();
        assert_eq!(
            load_prompt(Some(""), Some(file.path())).unwrap(),
            "From file"
        );
    }

    #[test]
    fn no_source_rejected() {
        let err = load_prompt(None, None).unwrap_err();
        assert!(err.to_string().contains("--prompt-file"));
    }
}
