//! Error types for stories and registries.

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when loading or validating a story.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The story file could not be read.
    #[error("cannot read story: {0}")]
    Io(#[from] std::io::Error),

    /// The story file is not valid JSON for a [`crate::Story`].
    #[error("invalid story file: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured start section does not exist.
    #[error("start section not found: \"{0}\"")]
    MissingStartSection(String),

    /// A section was declared with an empty id.
    #[error("section ids must not be empty")]
    EmptySectionId,

    /// The story declares no sections at all.
    #[error("story has no sections")]
    NoSections,
}
