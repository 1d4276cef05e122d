//! Content change events and handlers

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use contour_core::{ContentEntity, ContentReference};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Kind of content event, used as subscription key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A content item was patched in place
    AfterPatch,
    /// A content item was (re)loaded into the repository
    AfterUpdate,
}

impl EventKind {
    /// Event name
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::AfterPatch => "afterPatch",
            EventKind::AfterUpdate => "afterUpdate",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event metadata
#[derive(Debug, Clone, PartialEq)]
pub struct EventMetadata {
    /// Unique event ID
    pub id: Uuid,

    /// Timestamp when event was created
    pub timestamp: DateTime<Utc>,

    /// Optional correlation ID for tracing
    pub correlation_id: Option<Uuid>,
}

impl EventMetadata {
    /// Create new event metadata
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            correlation_id: None,
        }
    }

    /// Set correlation ID
    pub fn with_correlation_id(mut self, id: Uuid) -> Self {
        self.correlation_id = Some(id);
        self
    }
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// Notification about changed content
///
/// The bus performs no filtering: subscribers decide whether an event is
/// about the content they display.
#[derive(Debug, Clone)]
pub enum ContentEvent {
    /// `link` was patched from `old` to `new`
    AfterPatch {
        metadata: EventMetadata,
        link: ContentReference,
        old: Arc<ContentEntity>,
        new: Arc<ContentEntity>,
    },
    /// An item was updated, `None` when the update produced no content
    AfterUpdate {
        metadata: EventMetadata,
        item: Option<Arc<ContentEntity>>,
    },
}

impl ContentEvent {
    /// Create a patch event
    pub fn after_patch(
        link: impl Into<ContentReference>,
        old: impl Into<Arc<ContentEntity>>,
        new: impl Into<Arc<ContentEntity>>,
    ) -> Self {
        ContentEvent::AfterPatch {
            metadata: EventMetadata::new(),
            link: link.into(),
            old: old.into(),
            new: new.into(),
        }
    }

    /// Create an update event
    pub fn after_update(item: Option<impl Into<Arc<ContentEntity>>>) -> Self {
        ContentEvent::AfterUpdate {
            metadata: EventMetadata::new(),
            item: item.map(Into::into),
        }
    }

    /// Kind of this event
    pub fn kind(&self) -> EventKind {
        match self {
            ContentEvent::AfterPatch { .. } => EventKind::AfterPatch,
            ContentEvent::AfterUpdate { .. } => EventKind::AfterUpdate,
        }
    }

    /// Event metadata
    pub fn metadata(&self) -> &EventMetadata {
        match self {
            ContentEvent::AfterPatch { metadata, .. } | ContentEvent::AfterUpdate { metadata, .. } => {
                metadata
            }
        }
    }
}

/// Event handler error
#[derive(Debug, thiserror::Error)]
pub enum EventHandlerError {
    #[error("Handler failed: {0}")]
    HandlerFailed(String),

    #[error("Event processing error: {0}")]
    ProcessingError(String),
}

/// Content event handler
///
/// Handlers may receive the same event more than once and must tolerate it.
#[async_trait]
pub trait ContentEventHandler: Send + Sync {
    /// Handle the event
    async fn handle(&self, event: &ContentEvent) -> Result<(), EventHandlerError>;
}

/// Handler backed by a synchronous closure
pub struct FnHandler<F> {
    f: F,
}

/// Wrap a closure as a [`ContentEventHandler`]
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&ContentEvent) -> Result<(), EventHandlerError> + Send + Sync,
{
    FnHandler { f }
}

#[async_trait]
impl<F> ContentEventHandler for FnHandler<F>
where
    F: Fn(&ContentEvent) -> Result<(), EventHandlerError> + Send + Sync,
{
    async fn handle(&self, event: &ContentEvent) -> Result<(), EventHandlerError> {
        (self.f)(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contour_core::ContentLink;

    fn entity(name: &str) -> ContentEntity {
        ContentEntity::new(ContentLink::new(1, "G1", "/"), ["Page"], name)
    }

    #[test]
    fn test_event_kinds() {
        let patch = ContentEvent::after_patch(ContentLink::new(1, "G1", "/"), entity("a"), entity("b"));
        assert_eq!(patch.kind(), EventKind::AfterPatch);

        let update = ContentEvent::after_update(None::<ContentEntity>);
        assert_eq!(update.kind(), EventKind::AfterUpdate);
        assert_eq!(update.kind().to_string(), "afterUpdate");
    }

    #[test]
    fn test_event_metadata() {
        let correlation = Uuid::new_v4();
        let metadata = EventMetadata::new().with_correlation_id(correlation);
        assert_eq!(metadata.correlation_id, Some(correlation));

        let a = ContentEvent::after_update(Some(entity("a")));
        let b = ContentEvent::after_update(Some(entity("a")));
        assert_ne!(a.metadata().id, b.metadata().id);
    }

    #[tokio::test]
    async fn test_fn_handler() {
        let handler = handler_fn(|event: &ContentEvent| match event {
            ContentEvent::AfterUpdate { item: None, .. } => {
                Err(EventHandlerError::ProcessingError("empty update".to_string()))
            }
            _ => Ok(()),
        });

        assert!(handler.handle(&ContentEvent::after_update(Some(entity("a")))).await.is_ok());
        assert!(handler.handle(&ContentEvent::after_update(None::<ContentEntity>)).await.is_err());
    }
}
