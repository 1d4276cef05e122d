//! # Contour Core
//!
//! Content model shared by the Contour crates: content links, entities,
//! references and the language aware identifiers used to match content
//! across fetches and change notifications.
//!
//! ## Quick Start
//!
//! ```
//! use contour_core::{ContentEntity, ContentLink, ContentReference};
//!
//! let entity = ContentEntity::new(
//!     ContentLink::new(42, "G1", "/en/products/widget"),
//!     ["Page", "Product"],
//!     "Widget",
//! )
//! .with_language("en");
//!
//! let reference = ContentReference::from(entity);
//! assert_eq!(reference.api_id(true, false).unwrap(), "G1");
//! assert_eq!(reference.api_id(false, false).unwrap(), "42");
//! assert_eq!(reference.canonical_id(None, true).unwrap().as_str(), "G1___en");
//! assert_eq!(reference.href("/spa").as_deref(), Some("/spa/en/products/widget"));
//! ```

mod content;
mod error;
mod link;
mod reference;
mod response;

pub use content::{ContentEntity, LanguageModel, NETWORK_ERROR_PROVIDER, NETWORK_ERROR_TYPE};
pub use error::{ReferenceError, Result};
pub use link::ContentLink;
pub use reference::{CanonicalId, ContentReference, LANGUAGE_SEPARATOR};
pub use response::{ActionResponse, PathResponse, ResponseType};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::content::{ContentEntity, LanguageModel};
    pub use crate::error::{ReferenceError, Result};
    pub use crate::link::ContentLink;
    pub use crate::reference::{CanonicalId, ContentReference};
    pub use crate::response::{ActionResponse, PathResponse, ResponseType};
}
