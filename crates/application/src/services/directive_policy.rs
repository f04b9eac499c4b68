//! Directive fallback policy
//!
//! Decides which task directive a stage receives: the explicit one from its
//! descriptor, or, from the second stage on, the configured default.

/// Directive handed to stages after the first when they carry none
pub const DEFAULT_DIRECTIVE: &str = "Review the previous response and continue the task.";

/// Fallback policy for stage directives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectivePolicy {
    default_directive: Option<String>,
}

impl Default for DirectivePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DIRECTIVE)
    }
}

impl DirectivePolicy {
    /// Create a policy; a blank default disables the fallback
    pub fn new(default_directive: impl AsRef<str>) -> Self {
        let trimmed = default_directive.as_ref().trim();
        Self {
            default_directive: (!trimmed.is_empty()).then(|| trimmed.to_string()),
        }
    }

    /// Policy that never injects a directive
    pub const fn disabled() -> Self {
        Self {
            default_directive: None,
        }
    }

    /// The fallback directive, if enabled
    pub fn default_directive(&self) -> Option<&str> {
        self.default_directive.as_deref()
    }

    /// Directive for the stage at `position` (1-based)
    ///
    /// The first stage only ever gets its explicit directive.
    pub fn resolve<'a>(&'a self, position: usize, explicit: Option<&'a str>) -> Option<&'a str> {
        match explicit {
            Some(directive) => Some(directive),
            None if position > 1 => self.default_directive(),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_stage_never_gets_default() {
        let policy = DirectivePolicy::default();
        assert_eq!(policy.resolve(1, None), None);
    }

    #[test]
    fn first_stage_keeps_explicit_directive() {
        let policy = DirectivePolicy::default();
        assert_eq!(policy.resolve(1, Some("Implement it")), Some("Implement it"));
    }

    #[test]
    fn later_stages_get_default() {
        let policy = DirectivePolicy::new("Review and continue");
        assert_eq!(policy.resolve(2, None), Some("Review and continue"));
        assert_eq!(policy.resolve(7, None), Some("Review and continue"));
    }

    #[test]
    fn explicit_directive_wins_over_default() {
        let policy = DirectivePolicy::new("Review and continue");
        assert_eq!(policy.resolve(3, Some("Write docs")), Some("Write docs"));
    }

    #[test]
    fn blank_default_disables_fallback() {
        let policy = DirectivePolicy::new("   ");
        assert_eq!(policy, DirectivePolicy::disabled());
        assert_eq!(policy.resolve(2, None), None);
        assert_eq!(policy.resolve(2, Some("x")), Some("x"));
    }

    #[test]
    fn default_is_trimmed() {
        let policy = DirectivePolicy::new("  Continue.  ");
        assert_eq!(policy.default_directive(), Some("Continue."));
    }
}
