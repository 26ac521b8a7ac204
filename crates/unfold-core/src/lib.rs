//! Core types for Unfold: content trees, markup, stories, and registries.
//!
//! This crate holds the data the engine works on. It knows how to parse and
//! serialize section markup, how to look sections up, and what a macro may
//! reach by name. It does not expand or navigate anything itself.

/// Engine configuration shared by stories and sessions.
pub mod config;
/// Callable and variable registries and the expansion context.
pub mod context;
/// Error types used throughout the crate.
pub mod error;
/// Markup lexer and lenient tree builder.
pub mod markup;
/// Section stores and the JSON story document.
pub mod story;
/// Arena-backed content tree.
pub mod tree;

/// Re-export configuration.
pub use config::EngineConfig;
/// Re-export registries and context.
pub use context::{Callable, Callables, Context, Variables};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export story types.
pub use story::{SectionStore, Story};
/// Re-export tree types.
pub use tree::{Attribute, ContentTree, Element, NodeId, NodeKind};
