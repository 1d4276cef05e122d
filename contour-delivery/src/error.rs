//! Delivery client error types.

use contour_core::ReferenceError;
use thiserror::Error;

/// Result type for delivery operations.
pub type Result<T> = std::result::Result<T, DeliveryError>;

/// Delivery client errors.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Network access was disabled by configuration.
    #[error("The content delivery API has been disabled")]
    ClientDisabled,

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The transport could not complete the request.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response error.
    #[error("Response error: {status} - {message}")]
    Response {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// A reference could not be turned into an API id.
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// Interceptor error.
    #[error("Interceptor error: {0}")]
    Interceptor(String),

    /// Underlying HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl DeliveryError {
    /// Whether the error happened while talking to the server.
    ///
    /// These are the failures single item fetches turn into network error
    /// entities and list fetches into empty lists.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Response { .. } | Self::Json(_) | Self::Interceptor(_) | Self::Http(_)
        )
    }

    /// Get the HTTP status code if this is a response error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
