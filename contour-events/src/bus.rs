//! Event Bus implementation

use crate::event::{ContentEvent, ContentEventHandler, EventHandlerError, EventKind};
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error, info, trace};

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

struct Registration {
    id: SubscriptionId,
    handler: Arc<dyn ContentEventHandler>,
}

/// Event bus for content change notifications
///
/// Cloning is cheap and every clone shares the same subscriptions.
#[derive(Clone)]
pub struct EventBus {
    /// Handlers registered for each event kind, in subscription order
    handlers: Arc<DashMap<EventKind, Vec<Registration>>>,

    /// Source of subscription ids
    next_id: Arc<AtomicU64>,

    /// Configuration
    config: Arc<EventBusConfig>,
}

/// Event bus configuration
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Continue dispatching after a handler error
    pub continue_on_error: bool,

    /// Enable event logging
    pub enable_logging: bool,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            continue_on_error: true,
            enable_logging: true,
        }
    }
}

impl EventBus {
    /// Create new event bus
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// Create event bus with custom config
    pub fn with_config(config: EventBusConfig) -> Self {
        Self {
            handlers: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
            config: Arc::new(config),
        }
    }

    /// Create a builder
    pub fn builder() -> EventBusBuilder {
        EventBusBuilder::new()
    }

    /// Subscribe a handler to an event kind
    ///
    /// # Examples
    ///
    /// ```
    /// use contour_events::{handler_fn, EventBus, EventKind};
    ///
    /// let bus = EventBus::new();
    /// let id = bus.subscribe(EventKind::AfterUpdate, handler_fn(|_| Ok(())));
    /// assert_eq!(bus.handler_count(EventKind::AfterUpdate), 1);
    /// assert!(bus.unsubscribe(EventKind::AfterUpdate, id));
    /// ```
    pub fn subscribe<H>(&self, kind: EventKind, handler: H) -> SubscriptionId
    where
        H: ContentEventHandler + 'static,
    {
        self.subscribe_arc(kind, Arc::new(handler))
    }

    /// Subscribe an already shared handler
    pub fn subscribe_arc(&self, kind: EventKind, handler: Arc<dyn ContentEventHandler>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers
            .entry(kind)
            .or_default()
            .push(Registration { id, handler });

        if self.config.enable_logging {
            debug!(%kind, subscription = %id, "Subscribed handler");
        }
        id
    }

    /// Remove one handler
    ///
    /// Returns `false` when `id` was not subscribed to `kind`.
    pub fn unsubscribe(&self, kind: EventKind, id: SubscriptionId) -> bool {
        let removed = match self.handlers.get_mut(&kind) {
            Some(mut registrations) => {
                let before = registrations.len();
                registrations.retain(|r| r.id != id);
                before != registrations.len()
            }
            None => false,
        };
        self.handlers.remove_if(&kind, |_, registrations| registrations.is_empty());

        if removed && self.config.enable_logging {
            debug!(%kind, subscription = %id, "Unsubscribed handler");
        }
        removed
    }

    /// Publish an event
    ///
    /// Handlers run one after another in subscription order, against the
    /// set of handlers registered when publishing started.
    pub async fn publish(&self, event: ContentEvent) -> Result<(), EventBusError> {
        let kind = event.kind();

        // Clone out of the map so no shard lock is held across awaits.
        let handlers: Vec<Arc<dyn ContentEventHandler>> = match self.handlers.get(&kind) {
            Some(registrations) => registrations.iter().map(|r| r.handler.clone()).collect(),
            None => {
                if self.config.enable_logging {
                    trace!(%kind, "No handlers registered");
                }
                return Ok(());
            }
        };

        if self.config.enable_logging {
            info!(%kind, id = %event.metadata().id, handlers = handlers.len(), "Publishing event");
        }

        let mut errors = Vec::new();
        for handler in handlers {
            if let Err(e) = handler.handle(&event).await {
                error!(%kind, "Handler failed: {}", e);
                errors.push(e);
                if !self.config.continue_on_error {
                    break;
                }
            }
        }

        if !errors.is_empty() && !self.config.continue_on_error {
            return Err(EventBusError::HandlersFailed(errors));
        }

        Ok(())
    }

    /// Clear all handlers
    pub fn clear(&self) {
        self.handlers.clear();
        if self.config.enable_logging {
            info!("Cleared all event handlers");
        }
    }

    /// Get handler count for an event kind
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map(|h| h.len()).unwrap_or(0)
    }

    /// Get handler count across all kinds
    pub fn total_handlers(&self) -> usize {
        self.handlers.iter().map(|entry| entry.value().len()).sum()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.total_handlers())
            .field("config", &self.config)
            .finish()
    }
}

/// Event bus errors
#[derive(Debug, thiserror::Error)]
pub enum EventBusError {
    #[error("{} handler(s) failed", .0.len())]
    HandlersFailed(Vec<EventHandlerError>),
}

/// Event bus builder
pub struct EventBusBuilder {
    config: EventBusConfig,
}

impl EventBusBuilder {
    /// Create new event bus builder
    pub fn new() -> Self {
        Self {
            config: EventBusConfig::default(),
        }
    }

    /// Enable/disable continue on error
    pub fn continue_on_error(mut self, enabled: bool) -> Self {
        self.config.continue_on_error = enabled;
        self
    }

    /// Enable/disable logging
    pub fn enable_logging(mut self, enabled: bool) -> Self {
        self.config.enable_logging = enabled;
        self
    }

    /// Build the event bus
    pub fn build(self) -> EventBus {
        EventBus::with_config(self.config)
    }
}

impl Default for EventBusBuilder {
    fn default() -> Self {
        Self::new()
    }
}
