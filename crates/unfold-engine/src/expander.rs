//! Macro expansion.
//!
//! A section's raw markup is scanned one character at a time. Text outside
//! braces is copied through; the payload between `{` and `}` is resolved and
//! its result copied instead. Braces never nest.
//!
//! Two kinds of failure are distinguished:
//! - malformed braces abort the expansion of that section ([`ExpandError`]);
//! - a macro that cannot be resolved expands to nothing and is recorded as a
//!   [`MacroWarning`], so the rest of the section still renders.

use tracing::warn;
use unfold_core::{ContentTree, Context, EngineConfig, markup};

use crate::error::{ExpandError, MacroError, MacroWarning};
use crate::macros::Macro;

/// A fully expanded section.
#[derive(Debug, Clone)]
pub struct Expansion {
    /// The section that was expanded.
    pub section: String,
    /// Expanded markup, parsed into a tree.
    pub content: ContentTree,
    /// Macros that could not be resolved.
    pub warnings: Vec<MacroWarning>,
}

/// The result of expanding a single standalone macro payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroExpansion {
    /// Resulting markup text.
    pub markup: String,
    /// Macros that could not be resolved.
    pub warnings: Vec<MacroWarning>,
}

/// Expand every macro in a section.
pub fn expand_section(
    ctx: &Context<'_>,
    config: &EngineConfig,
    id: &str,
) -> Result<Expansion, ExpandError> {
    let mut expander = Expander::new(*ctx, config);
    let markup = expander.expand(id)?;
    Ok(Expansion {
        section: id.to_string(),
        content: markup::parse(&markup),
        warnings: expander.warnings,
    })
}

/// Expand one macro payload (the text between the braces, e.g. `@intro`).
///
/// Never fails: an unresolvable payload yields empty markup and a warning.
pub fn expand_macro(ctx: &Context<'_>, config: &EngineConfig, payload: &str) -> MacroExpansion {
    let mut expander = Expander::new(*ctx, config);
    let markup = expander.resolve(payload, None, 0);
    MacroExpansion {
        markup,
        warnings: expander.warnings,
    }
}

struct Expander<'a> {
    ctx: Context<'a>,
    config: &'a EngineConfig,
    /// Sections currently being expanded, outermost first.
    stack: Vec<String>,
    warnings: Vec<MacroWarning>,
}

impl<'a> Expander<'a> {
    fn new(ctx: Context<'a>, config: &'a EngineConfig) -> Self {
        Self {
            ctx,
            config,
            stack: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn expand(&mut self, id: &str) -> Result<String, ExpandError> {
        let sections = self.ctx.sections();
        let source = sections
            .section(id)
            .ok_or_else(|| ExpandError::SectionNotFound(id.to_string()))?;

        self.stack.push(id.to_string());
        let result = self.scan(id, source);
        self.stack.pop();
        result
    }

    fn scan(&mut self, section: &str, source: &str) -> Result<String, ExpandError> {
        let escapes = self.config.brace_escapes;
        let mut output = String::with_capacity(source.len());
        let mut payload = String::new();
        let mut open_at: Option<usize> = None;
        let mut chars = source.chars().enumerate().peekable();

        while let Some((i, c)) = chars.next() {
            match c {
                '{' => {
                    if open_at.is_some() {
                        return Err(ExpandError::NestedMacro {
                            section: section.to_string(),
                            offset: i,
                        });
                    }
                    if escapes && chars.peek().is_some_and(|&(_, next)| next == '{') {
                        chars.next();
                        output.push('{');
                    } else {
                        open_at = Some(i);
                        payload.clear();
                    }
                }
                '}' => {
                    if let Some(start) = open_at.take() {
                        let text = self.resolve(&payload, Some(section), start);
                        output.push_str(&text);
                    } else if escapes && chars.peek().is_some_and(|&(_, next)| next == '}') {
                        chars.next();
                        output.push('}');
                    } else {
                        return Err(ExpandError::UnbalancedMacro {
                            section: section.to_string(),
                            offset: i,
                        });
                    }
                }
                _ if open_at.is_some() => payload.push(c),
                _ => output.push(c),
            }
        }

        if let Some(start) = open_at {
            return Err(ExpandError::UnterminatedMacro {
                section: section.to_string(),
                offset: start,
            });
        }
        Ok(output)
    }

    /// Resolve a payload to text, recording a warning on failure.
    fn resolve(&mut self, payload: &str, section: Option<&str>, offset: usize) -> String {
        let result = match Macro::parse(payload) {
            Ok(Macro::Section(name)) => self.include(&name),
            Ok(Macro::Function(name)) => self
                .ctx
                .callables()
                .invoke(&name)
                .ok_or_else(|| MacroError::CallableNotFound(name)),
            Ok(Macro::Variable(name)) => self
                .ctx
                .variables()
                .get(&name)
                .map(str::to_string)
                .ok_or_else(|| MacroError::VariableNotFound(name)),
            Err(e) => Err(e),
        };

        match result {
            Ok(text) => text,
            Err(error) => {
                warn!(section = section.unwrap_or("-"), offset, "{error}");
                self.warnings.push(MacroWarning {
                    section: section.map(str::to_string),
                    offset,
                    error,
                });
                String::new()
            }
        }
    }

    /// Expand an included section and return its normalized markup.
    fn include(&mut self, name: &str) -> Result<String, MacroError> {
        if let Some(pos) = self.stack.iter().position(|s| s == name) {
            let mut chain = self.stack[pos..].to_vec();
            chain.push(name.to_string());
            return Err(MacroError::IncludeCycle { chain });
        }
        if self.stack.len() > self.config.max_include_depth {
            return Err(MacroError::IncludeTooDeep {
                section: name.to_string(),
                limit: self.config.max_include_depth,
            });
        }

        match self.expand(name) {
            Ok(markup) => Ok(markup::parse(&markup).to_markup()),
            Err(ExpandError::SectionNotFound(missing)) => Err(MacroError::SectionNotFound(missing)),
            Err(err) => Err(MacroError::IncludeFailed {
                section: name.to_string(),
                source: Box::new(err),
            }),
        }
    }
}
