//! Macro payload classification.

use crate::error::MacroError;

/// Sigil for `{@section}` inclusion.
pub const SECTION_SIGIL: char = '@';
/// Sigil for `{#function}` calls.
pub const FUNCTION_SIGIL: char = '#';
/// Sigil for `{$variable}` substitution.
pub const VARIABLE_SIGIL: char = '$';

/// A macro payload, classified by its sigil.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Macro {
    /// `@name`: expand another section inline.
    Section(String),
    /// `#name`: call a registered callable.
    Function(String),
    /// `$name`: substitute a variable.
    Variable(String),
}

impl Macro {
    /// Classify a payload (the text between the braces).
    pub fn parse(payload: &str) -> Result<Self, MacroError> {
        let mut chars = payload.chars();
        let sigil = chars.next();
        let name = chars.as_str().to_string();
        match sigil {
            Some(SECTION_SIGIL) => Ok(Self::Section(name)),
            Some(FUNCTION_SIGIL) => Ok(Self::Function(name)),
            Some(VARIABLE_SIGIL) => Ok(Self::Variable(name)),
            _ => Err(MacroError::UnknownSigil(payload.to_string())),
        }
    }

    /// The name after the sigil.
    pub fn name(&self) -> &str {
        match self {
            Self::Section(n) | Self::Function(n) | Self::Variable(n) => n,
        }
    }
}

/// Payloads of the well-formed macros in `source`, with the char offset of
/// each opening brace. Lenient: malformed braces are skipped, not reported.
pub fn find_macros(source: &str) -> Vec<(usize, String)> {
    let mut found = Vec::new();
    let mut open: Option<(usize, String)> = None;
    for (i, c) in source.chars().enumerate() {
        match (c, open.as_mut()) {
            ('{', _) => open = Some((i, String::new())),
            ('}', Some(_)) => found.extend(open.take()),
            (_, Some((_, payload))) => payload.push(c),
            _ => {}
        }
    }
    found
}
