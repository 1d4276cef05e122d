//! Path routing and content synchronization for Contour
//!
//! A [`ContentRouter`] resolves the current path to a content entity through
//! a [`ContentSource`] (usually a [`DeliveryClient`](contour_delivery::DeliveryClient))
//! and then follows change events on an [`EventBus`](contour_events::EventBus),
//! swapping in the new version of the entity when an event refers to it.
//!
//! Navigating again cancels the previous fetch and subscription, so only the
//! most recent navigation can change what is shown.
//!
//! ## Quick Start
//!
//! ```
//! use async_trait::async_trait;
//! use contour_core::{ContentEntity, ContentLink, PathResponse};
//! use contour_delivery::DeliveryError;
//! use contour_events::EventBus;
//! use contour_router::{ContentRouter, ContentSource, RenderOutput};
//! use std::sync::Arc;
//!
//! struct Home;
//!
//! #[async_trait]
//! impl ContentSource for Home {
//!     async fn content_by_path(&self, _path: &str) -> Result<Option<PathResponse>, DeliveryError> {
//!         let entity = ContentEntity::new(ContentLink::new(5, "G5", "/en/"), ["Page"], "Home");
//!         Ok(Some(PathResponse::from(entity.with_language("en"))))
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let router = ContentRouter::new(Arc::new(Home), EventBus::new());
//! router.navigate("/en/");
//!
//! let snapshot = router.settled().await;
//! assert!(matches!(snapshot.view(), RenderOutput::Content { .. }));
//! # });
//! ```
//!
//! ## Rendering
//!
//! Views are looked up by content type in a [`ViewRegistry`]. On the server,
//! [`ServerRenderer`] renders a path from [`PrerenderState`] without any
//! network access.

mod error;
mod navigation;
mod registry;
mod router;
mod source;
mod ssr;
mod state;

pub use error::{Result, RouterError};
pub use navigation::{LinkAttributes, Navigation, resolve_navigation};
pub use registry::{ContentView, LoadingView, NotFoundView, ViewRegistry};
pub use router::{ContentRouter, ContentRouterBuilder, RoutedContentObserver};
pub use source::ContentSource;
pub use ssr::{PrerenderState, ServerRenderer, SsrResponse};
pub use state::{RenderOutput, RouteState, RouterSnapshot};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::error::{Result, RouterError};
    pub use crate::navigation::{LinkAttributes, Navigation, resolve_navigation};
    pub use crate::registry::{ContentView, ViewRegistry};
    pub use crate::router::{ContentRouter, ContentRouterBuilder};
    pub use crate::source::ContentSource;
    pub use crate::ssr::{PrerenderState, ServerRenderer, SsrResponse};
    pub use crate::state::{RenderOutput, RouteState, RouterSnapshot};
}
