//! Error types for expansion and navigation.

use std::fmt;

use thiserror::Error;
use unfold_core::NodeId;

/// Result type for session operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Fatal errors that abort the expansion of a single section.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    /// `{` found while a macro was already open.
    #[error("nested {{ in section \"{section}\" at character {offset}")]
    NestedMacro {
        /// Section being expanded.
        section: String,
        /// Character offset of the offending brace.
        offset: usize,
    },

    /// `}` found with no open macro.
    #[error("}} without a matching {{ in section \"{section}\" at character {offset}")]
    UnbalancedMacro {
        /// Section being expanded.
        section: String,
        /// Character offset of the offending brace.
        offset: usize,
    },

    /// Input ended while a macro was still open.
    #[error("unterminated macro in section \"{section}\" starting at character {offset}")]
    UnterminatedMacro {
        /// Section being expanded.
        section: String,
        /// Character offset of the opening brace.
        offset: usize,
    },

    /// The requested section does not exist.
    #[error("section not found: \"{0}\"")]
    SectionNotFound(String),
}

impl ExpandError {
    /// The section the error refers to.
    pub fn section(&self) -> &str {
        match self {
            Self::NestedMacro { section, .. }
            | Self::UnbalancedMacro { section, .. }
            | Self::UnterminatedMacro { section, .. }
            | Self::SectionNotFound(section) => section,
        }
    }

    /// Character offset of the error, if it has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::NestedMacro { offset, .. }
            | Self::UnbalancedMacro { offset, .. }
            | Self::UnterminatedMacro { offset, .. } => Some(*offset),
            Self::SectionNotFound(_) => None,
        }
    }
}

/// Non-fatal errors recorded while resolving a single macro.
///
/// The macro expands to empty text and expansion carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MacroError {
    /// `{@name}` refers to a section that does not exist.
    #[error("section not found: \"{0}\"")]
    SectionNotFound(String),

    /// `{#name}` refers to an unregistered callable.
    #[error("{0} is not a function")]
    CallableNotFound(String),

    /// `{$name}` refers to an unset variable.
    #[error("variable not set: \"{0}\"")]
    VariableNotFound(String),

    /// The payload does not start with `@`, `#` or `$`.
    #[error("unknown metacharacter in macro: \"{0}\"")]
    UnknownSigil(String),

    /// `{@name}` would include a section that is already being expanded.
    #[error("inclusion cycle: {}", .chain.join(" -> "))]
    IncludeCycle {
        /// Sections on the inclusion stack, ending with the repeated one.
        chain: Vec<String>,
    },

    /// Inclusion nested deeper than the configured limit.
    #[error("inclusion of \"{section}\" exceeds depth limit {limit}")]
    IncludeTooDeep {
        /// Section that would have been included.
        section: String,
        /// The configured limit.
        limit: usize,
    },

    /// The included section failed to parse.
    #[error("cannot include \"{section}\": {source}")]
    IncludeFailed {
        /// Section that failed.
        section: String,
        /// Why it failed.
        source: Box<ExpandError>,
    },
}

/// A recorded [`MacroError`] and where it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroWarning {
    /// Section whose markup held the macro, `None` for a standalone payload.
    pub section: Option<String>,
    /// Character offset of the macro's opening brace.
    pub offset: usize,
    /// What went wrong.
    pub error: MacroError,
}

impl fmt::Display for MacroWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.section {
            Some(section) => write!(f, "{section}@{}: {}", self.offset, self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Expanding the target section failed.
    #[error(transparent)]
    Expand(#[from] ExpandError),

    /// The node is not a live link in the current section.
    #[error("no live link at node {0}")]
    LinkNotLive(NodeId),

    /// The operation needs a current section but none is mounted.
    #[error("no section is currently displayed")]
    NoCurrentSection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_error_messages() {
        let nested = ExpandError::NestedMacro {
            section: "intro".into(),
            offset: 6,
        };
        assert_eq!(
            nested.to_string(),
            "nested { in section \"intro\" at character 6"
        );
        assert_eq!(nested.offset(), Some(6));
        assert_eq!(nested.section(), "intro");

        let unbalanced = ExpandError::UnbalancedMacro {
            section: "intro".into(),
            offset: 2,
        };
        assert_eq!(
            unbalanced.to_string(),
            "} without a matching { in section \"intro\" at character 2"
        );
    }

    #[test]
    fn cycle_message_lists_chain() {
        let err = MacroError::IncludeCycle {
            chain: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "inclusion cycle: a -> b -> a");
    }

    #[test]
    fn warning_display() {
        let warning = MacroWarning {
            section: Some("hall".into()),
            offset: 12,
            error: MacroError::CallableNotFound("foo".into()),
        };
        assert_eq!(warning.to_string(), "hall@12: foo is not a function");
    }
}
