//! The Unfold engine: macro expansion, inline macros, links, and navigation.
//!
//! A [`Session`] holds one reader's state. Navigating expands the target
//! section against a [`Context`](unfold_core::Context), retires the current
//! section to [`History`] with its links disabled, and mounts the new content
//! on a [`DisplaySurface`].

/// Pretty reports for expansion errors and warnings.
pub mod diagnostics;
/// Error types for expansion and navigation.
pub mod error;
/// Section and single-macro expansion.
pub mod expander;
/// The log of retired sections.
pub mod history;
/// Inline-macro id activation.
pub mod inline;
/// Link directives, activation, and disabling.
pub mod links;
/// Macro payload classification.
pub mod macros;
/// Reading sessions and navigation.
pub mod session;
/// The display surface abstraction.
pub mod surface;

/// Re-export diagnostics.
pub use diagnostics::{Diagnostic, render_diagnostics, render_expand_error};
/// Re-export error types.
pub use error::{EngineError, EngineResult, ExpandError, MacroError, MacroWarning};
/// Re-export expansion entry points.
pub use expander::{Expansion, MacroExpansion, expand_macro, expand_section};
/// Re-export history types.
pub use history::{History, HistoryEntry};
/// Re-export link types.
pub use links::{LinkDirective, LiveLink};
/// Re-export session types.
pub use session::{Session, SessionId};
/// Re-export surfaces.
pub use surface::{DisplaySurface, MemorySurface};
