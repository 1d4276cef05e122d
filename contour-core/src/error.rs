//! Reference resolution errors.

use thiserror::Error;

/// Result type for reference resolution.
pub type Result<T> = std::result::Result<T, ReferenceError>;

/// Errors raised when a content reference cannot be turned into an identifier.
///
/// Both variants indicate malformed input from the caller and are never
/// recovered locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    /// No usable link could be extracted from the reference.
    #[error("Unable to generate an API id: {0}")]
    InvalidReference(String),

    /// The reference carries no language and none was supplied.
    #[error("Reference '{0}' is not translatable content and no language was specified")]
    MissingLanguage(String),
}
