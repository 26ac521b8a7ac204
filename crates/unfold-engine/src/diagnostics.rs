//! Pretty reports for expansion errors and macro warnings.

use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::error::{ExpandError, MacroWarning};

/// Something to report against a section's source.
#[derive(Debug, Clone, Copy)]
pub enum Diagnostic<'a> {
    /// Expansion failed; the section cannot be displayed.
    Fatal(&'a ExpandError),
    /// A macro was dropped; the section displays without it.
    Dropped(&'a MacroWarning),
}

impl Diagnostic<'_> {
    /// Character range in `source` the report points at.
    pub fn span(&self, source: &str) -> Range<usize> {
        match self {
            Self::Fatal(ExpandError::NestedMacro { offset, .. })
            | Self::Fatal(ExpandError::UnbalancedMacro { offset, .. }) => *offset..offset + 1,
            Self::Fatal(ExpandError::UnterminatedMacro { offset, .. }) => {
                *offset..source.chars().count()
            }
            Self::Fatal(ExpandError::SectionNotFound(_)) => 0..0,
            Self::Dropped(warning) => macro_span(source, warning.offset),
        }
    }

    /// Text under the span.
    fn label(&self) -> String {
        match self {
            Self::Fatal(ExpandError::NestedMacro { .. }) => "a macro is already open here".into(),
            Self::Fatal(ExpandError::UnbalancedMacro { .. }) => "nothing to close".into(),
            Self::Fatal(ExpandError::UnterminatedMacro { .. }) => "never closed".into(),
            Self::Fatal(ExpandError::SectionNotFound(_)) => "missing section".into(),
            Self::Dropped(warning) => warning.error.to_string(),
        }
    }
}

/// Span of the macro opening at `offset`, through its closing brace.
fn macro_span(source: &str, offset: usize) -> Range<usize> {
    let len = source
        .chars()
        .skip(offset)
        .position(|c| c == '}')
        .map_or(1, |close| close + 1);
    offset..offset + len
}

/// Render diagnostics for one section with ariadne.
pub fn render_diagnostics(section: &str, source: &str, diagnostics: &[Diagnostic<'_>]) -> String {
    let mut output = Vec::new();

    for diag in diagnostics {
        let (kind, color, message) = match diag {
            Diagnostic::Fatal(error) => (ReportKind::Error, Color::Red, error.to_string()),
            Diagnostic::Dropped(warning) => {
                (ReportKind::Warning, Color::Yellow, warning.error.to_string())
            }
        };
        let span = diag.span(source);

        Report::build(kind, (section, span.clone()))
            .with_message(message)
            .with_label(
                Label::new((section, span))
                    .with_message(diag.label())
                    .with_color(color),
            )
            .finish()
            .write((section, Source::from(source)), &mut output)
            .ok();
    }

    String::from_utf8(output).unwrap_or_default()
}

/// Render a single fatal expansion error against the section's source.
pub fn render_expand_error(section: &str, source: &str, error: &ExpandError) -> String {
    render_diagnostics(section, source, &[Diagnostic::Fatal(error)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MacroError;

    fn dropped(offset: usize) -> MacroWarning {
        MacroWarning {
            section: Some("intro".into()),
            offset,
            error: MacroError::VariableNotFound("x".into()),
        }
    }

    #[test]
    fn warning_span_covers_braces() {
        assert_eq!(Diagnostic::Dropped(&dropped(3)).span("ab {$x} cd"), 3..7);
        assert_eq!(Diagnostic::Dropped(&dropped(3)).span("ab {$x"), 3..4);
    }

    #[test]
    fn unterminated_spans_to_end() {
        let err = ExpandError::UnterminatedMacro {
            section: "intro".into(),
            offset: 6,
        };
        assert_eq!(Diagnostic::Fatal(&err).span("Hello {$name"), 6..12);
    }

    #[test]
    fn render_produces_output() {
        let source = "<p>Hello } world</p>";
        let err = ExpandError::UnbalancedMacro {
            section: "intro".into(),
            offset: 9,
        };
        let warning = dropped(0);
        let diags = [Diagnostic::Fatal(&err), Diagnostic::Dropped(&warning)];
        let output = render_diagnostics("intro", source, &diags);
        assert!(output.contains("without a matching"));
        assert!(output.contains("nothing to close"));
        assert!(output.contains("variable not set"));
    }
}
