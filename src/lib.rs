// Contour - Content routing and synchronization for headless CMS applications
//
// This library resolves application paths to CMS content through the content
// delivery API, keeps the routed content in sync with edit events and renders
// it through views registered per content type.

// Re-export core functionality
pub use contour_core::*;

// Re-export the building blocks
pub use contour_config;
pub use contour_delivery;
pub use contour_events;
pub use contour_router;

// Re-export optional crates
#[cfg(feature = "log")]
pub use contour_log;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        CanonicalId, ContentEntity, ContentLink, ContentReference, PathResponse, ReferenceError,
    };
    pub use contour_config::AppConfig;
    pub use contour_delivery::{DeliveryClient, DeliveryConfig, DeliveryError};
    pub use contour_events::{ContentEvent, ContentEventHandler, EventBus, EventKind};
    pub use contour_router::{
        ContentRouter, ContentView, LinkAttributes, Navigation, PrerenderState, RenderOutput,
        ServerRenderer, ViewRegistry, resolve_navigation,
    };
}
