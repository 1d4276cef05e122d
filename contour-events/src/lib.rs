//! Content change notifications for Contour
//!
//! An explicitly constructed, cheaply cloneable bus that carries
//! `AfterPatch` and `AfterUpdate` notifications to subscribers. The bus
//! does no filtering; a subscriber compares the event against the content
//! it shows.
//!
//! ## Quick Start
//!
//! ```
//! use contour_core::{ContentEntity, ContentLink};
//! use contour_events::{handler_fn, ContentEvent, EventBus, EventKind};
//!
//! # tokio_test::block_on(async {
//! let bus = EventBus::new();
//! let id = bus.subscribe(
//!     EventKind::AfterUpdate,
//!     handler_fn(|event| {
//!         if let ContentEvent::AfterUpdate { item: Some(item), .. } = event {
//!             println!("updated {}", item.name);
//!         }
//!         Ok(())
//!     }),
//! );
//!
//! let item = ContentEntity::new(ContentLink::new(1, "G1", "/"), ["Page"], "Home");
//! bus.publish(ContentEvent::after_update(Some(item))).await.unwrap();
//! bus.unsubscribe(EventKind::AfterUpdate, id);
//! # });
//! ```

pub mod bus;
pub mod event;

pub use bus::{EventBus, EventBusBuilder, EventBusConfig, EventBusError, SubscriptionId};
pub use event::{
    ContentEvent, ContentEventHandler, EventHandlerError, EventKind, EventMetadata, FnHandler,
    handler_fn,
};

/// Prelude for common imports
pub mod prelude {
    pub use crate::bus::{EventBus, EventBusBuilder, SubscriptionId};
    pub use crate::event::{ContentEvent, ContentEventHandler, EventHandlerError, EventKind, handler_fn};
}
