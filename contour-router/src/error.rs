//! Router error types.

use contour_core::ReferenceError;
use contour_delivery::DeliveryError;
use thiserror::Error;

/// Result type for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;

/// Router errors.
#[derive(Debug, Error)]
pub enum RouterError {
    /// No view is registered for any of the content's type tags.
    #[error("No view registered for content type '{0}'")]
    UnknownType(String),

    /// A reference could not be resolved to a canonical id.
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// The content source failed.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// Prerendered state could not be decoded.
    #[error("Invalid prerender state: {0}")]
    Prerender(String),
}
