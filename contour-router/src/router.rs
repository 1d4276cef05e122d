//! Path router and content synchronizer.
//!
//! A [`ContentRouter`] owns two workflows: the fetch for the current path,
//! restarted on every navigation, and the event subscription for the loaded
//! entity, restarted on every fresh load. Each workflow has its own
//! [`CancellationToken`]. Both are cancelled from a single teardown path
//! and every continuation checks its token and the router generation before
//! touching state, so a superseded result is never applied.

use async_trait::async_trait;
use contour_core::{CanonicalId, ContentEntity, PathResponse};
use contour_delivery::DeliveryError;
use contour_events::{
    ContentEvent, ContentEventHandler, EventBus, EventHandlerError, EventKind, SubscriptionId,
};
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::{ContentSource, PrerenderState, RenderOutput, RouteState, RouterError, RouterSnapshot};

/// Callback told about the routed entity: `Some` on load, `None` on teardown.
pub type RoutedContentObserver = Arc<dyn Fn(Option<Arc<ContentEntity>>) + Send + Sync>;

/// Resolves the current path to content and keeps it in sync with change
/// events.
///
/// Dropping the router tears it down like [`shutdown`](Self::shutdown).
pub struct ContentRouter {
    shared: Arc<Shared>,
}

struct Shared {
    source: Arc<dyn ContentSource>,
    bus: EventBus,
    language: String,
    debug: bool,
    observer: Option<RoutedContentObserver>,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<RouterSnapshot>,
}

#[derive(Default)]
struct Inner {
    path: Option<String>,
    state: RouteState,
    loading: bool,
    generation: u64,
    fetch: Option<CancellationToken>,
    subscription: Option<Subscription>,
    /// Server snapshot, consumed by the first navigation.
    prerender: Option<Arc<PrerenderState>>,
    prerendered_empty: bool,
    error: Option<Arc<RouterError>>,
}

/// Bus registrations made for one loaded entity.
struct Subscription {
    canonical_id: CanonicalId,
    token: CancellationToken,
    patch: SubscriptionId,
    update: SubscriptionId,
}

impl ContentRouter {
    /// Create a router with default options.
    pub fn new(source: Arc<dyn ContentSource>, bus: EventBus) -> Self {
        Self::builder(source, bus).build()
    }

    /// Create a router builder.
    pub fn builder(source: Arc<dyn ContentSource>, bus: EventBus) -> ContentRouterBuilder {
        ContentRouterBuilder {
            source,
            bus,
            language: "en".to_string(),
            debug: false,
            prerender: None,
            observer: None,
        }
    }

    /// Route to `path`.
    ///
    /// Cancels the in-flight fetch and the subscription of the previous
    /// path. The first navigation of a router built with prerendered state
    /// loads its path from that state synchronously, without a fetch. Every
    /// other navigation spawns a fetch onto the current Tokio runtime, so
    /// this must be called from within one.
    pub fn navigate(&self, path: impl Into<String>) {
        let path = path.into();
        let shared = &self.shared;

        let mut inner = shared.inner.lock();
        let had_content = shared.teardown(&mut inner);
        inner.generation += 1;
        inner.path = Some(path.clone());

        if let Some(prerender) = inner.prerender.take() {
            match prerender.get(&path) {
                Some(entity) => {
                    debug!(%path, "Seeding router from prerendered content");
                    let entity = Arc::new(entity.clone());
                    shared.enter_loaded(&mut inner, entity.clone());
                    shared.publish(&inner);
                    drop(inner);
                    if had_content {
                        shared.notify(None);
                    }
                    shared.notify(Some(entity));
                    return;
                }
                None => inner.prerendered_empty = true,
            }
        }

        let token = CancellationToken::new();
        inner.state = RouteState::Loading(path.clone());
        inner.loading = true;
        inner.fetch = Some(token.clone());
        let generation = inner.generation;
        shared.publish(&inner);
        drop(inner);

        if had_content {
            shared.notify(None);
        }

        trace!(%path, generation, "Starting fetch");
        tokio::spawn(run_fetch(shared.clone(), path, generation, token));
    }

    /// Tear down: cancel the fetch, drop the subscription, return to idle.
    pub fn shutdown(&self) {
        let mut inner = self.shared.inner.lock();
        let had_content = self.shared.teardown(&mut inner);
        inner.generation += 1;
        inner.path = None;
        self.shared.publish(&inner);
        drop(inner);

        if had_content {
            self.shared.notify(None);
        }
    }

    /// Current state.
    pub fn snapshot(&self) -> RouterSnapshot {
        self.shared.snapshot(&self.shared.inner.lock())
    }

    /// Watch state changes.
    pub fn subscribe_state(&self) -> watch::Receiver<RouterSnapshot> {
        self.shared.state_tx.subscribe()
    }

    /// Wait until no fetch is pending and return the state reached.
    pub async fn settled(&self) -> RouterSnapshot {
        let mut rx = self.subscribe_state();
        match rx.wait_for(|snapshot| !snapshot.loading).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.snapshot(),
        }
    }

    /// What to render right now.
    pub fn view(&self) -> RenderOutput {
        self.snapshot().view()
    }

    /// The loaded entity, if any.
    pub fn entity(&self) -> Option<Arc<ContentEntity>> {
        self.shared.inner.lock().state.entity().cloned()
    }

    /// Whether a fetch is pending.
    pub fn is_loading(&self) -> bool {
        self.shared.inner.lock().loading
    }

    /// Canonical id the change events are matched against.
    pub fn canonical_id(&self) -> Option<CanonicalId> {
        let inner = self.shared.inner.lock();
        inner.subscription.as_ref().map(|s| s.canonical_id.clone())
    }

    /// Display language used for canonical ids.
    pub fn language(&self) -> &str {
        &self.shared.language
    }

    /// The bus this router listens on.
    pub fn bus(&self) -> &EventBus {
        &self.shared.bus
    }
}

impl Drop for ContentRouter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for ContentRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.inner.lock();
        f.debug_struct("ContentRouter")
            .field("path", &inner.path)
            .field("state", &inner.state)
            .field("loading", &inner.loading)
            .field("language", &self.shared.language)
            .finish()
    }
}

async fn run_fetch(shared: Arc<Shared>, path: String, generation: u64, token: CancellationToken) {
    let result = tokio::select! {
        biased;
        _ = token.cancelled() => {
            trace!(%path, "Fetch cancelled");
            return;
        }
        result = shared.source.content_by_path(&path) => result,
    };
    shared.complete_fetch(&path, generation, &token, result);
}

impl Shared {
    fn complete_fetch(
        self: &Arc<Self>,
        path: &str,
        generation: u64,
        token: &CancellationToken,
        result: Result<Option<PathResponse>, DeliveryError>,
    ) {
        let mut inner = self.inner.lock();
        if token.is_cancelled() || inner.generation != generation {
            trace!(%path, generation, "Discarding stale fetch result");
            return;
        }
        inner.fetch = None;

        let loaded = match result {
            Ok(Some(response)) => {
                let entity = Arc::new(response.into_content());
                self.enter_loaded(&mut inner, entity.clone());
                Some(entity)
            }
            Ok(None) => {
                debug!(%path, "No content for path");
                inner.state = RouteState::NotFound;
                None
            }
            Err(e) => {
                warn!(%path, error = %e, "Failed to load content");
                inner.state = RouteState::NotFound;
                inner.error = Some(Arc::new(RouterError::Delivery(e)));
                None
            }
        };
        inner.loading = false;
        self.publish(&inner);
        drop(inner);

        if loaded.is_some() {
            self.notify(loaded);
        }
    }

    /// Enter `Loaded(entity)` and subscribe to changes of it.
    fn enter_loaded(self: &Arc<Self>, inner: &mut Inner, entity: Arc<ContentEntity>) {
        inner.state = RouteState::Loaded(entity.clone());
        inner.loading = false;

        let canonical_id = match CanonicalId::for_entity(&entity, Some(&self.language), true) {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "Loaded content has no canonical id, not following changes");
                inner.error = Some(Arc::new(RouterError::Reference(e)));
                return;
            }
        };

        let token = CancellationToken::new();
        let handler: Arc<dyn ContentEventHandler> = Arc::new(SyncHandler {
            shared: Arc::downgrade(self),
            token: token.clone(),
        });
        let patch = self.bus.subscribe_arc(EventKind::AfterPatch, handler.clone());
        let update = self.bus.subscribe_arc(EventKind::AfterUpdate, handler);

        if self.debug {
            debug!(%canonical_id, "Following content changes");
        }
        inner.subscription = Some(Subscription {
            canonical_id,
            token,
            patch,
            update,
        });
    }

    /// Cancel both workflows and reset to idle. Returns whether content was shown.
    fn teardown(&self, inner: &mut Inner) -> bool {
        if let Some(fetch) = inner.fetch.take() {
            fetch.cancel();
        }
        if let Some(subscription) = inner.subscription.take() {
            subscription.token.cancel();
            self.bus.unsubscribe(EventKind::AfterPatch, subscription.patch);
            self.bus.unsubscribe(EventKind::AfterUpdate, subscription.update);
            if self.debug {
                debug!(canonical_id = %subscription.canonical_id, "Stopped following content changes");
            }
        }

        let had_content = inner.state.is_loaded();
        inner.state = RouteState::Idle;
        inner.loading = false;
        inner.prerendered_empty = false;
        inner.error = None;
        had_content
    }

    fn apply_event(&self, token: &CancellationToken, event: &ContentEvent) {
        let mut inner = self.inner.lock();
        if token.is_cancelled() {
            return;
        }
        let Some(current) = inner.subscription.as_ref().map(|s| s.canonical_id.clone()) else {
            return;
        };

        // Raised and lowered under the lock: watchers only ever see it lowered.
        inner.loading = true;

        let candidate = match event {
            ContentEvent::AfterPatch { link, new, .. } => {
                Some((link.canonical_id(Some(&self.language), true), new))
            }
            ContentEvent::AfterUpdate { item: Some(item), .. } => {
                Some((CanonicalId::for_entity(item, Some(&self.language), true), item))
            }
            ContentEvent::AfterUpdate { item: None, .. } => None,
        };

        let mut swapped = None;
        if let Some((received, entity)) = candidate {
            match received {
                Ok(received) => {
                    if self.debug {
                        debug!(%current, %received, kind = %event.kind(), "Checking content ids");
                    }
                    if received == current {
                        if self.debug {
                            debug!(%received, "Updating routed content");
                        }
                        inner.state = RouteState::Loaded(entity.clone());
                        swapped = Some(entity.clone());
                    }
                }
                Err(e) => warn!(error = %e, kind = %event.kind(), "Ignoring event for unresolvable content"),
            }
        }

        inner.loading = false;
        if swapped.is_some() {
            self.publish(&inner);
        }
        drop(inner);

        if swapped.is_some() {
            self.notify(swapped);
        }
    }

    fn snapshot(&self, inner: &Inner) -> RouterSnapshot {
        RouterSnapshot {
            state: inner.state.clone(),
            path: inner.path.clone(),
            loading: inner.loading,
            prerendered_empty: inner.prerendered_empty,
            error: inner.error.clone(),
        }
    }

    fn publish(&self, inner: &Inner) {
        self.state_tx.send_replace(self.snapshot(inner));
    }

    fn notify(&self, entity: Option<Arc<ContentEntity>>) {
        if let Some(observer) = &self.observer {
            observer(entity);
        }
    }
}

/// Bus handler bound to one subscription of one router.
struct SyncHandler {
    shared: Weak<Shared>,
    token: CancellationToken,
}

#[async_trait]
impl ContentEventHandler for SyncHandler {
    async fn handle(&self, event: &ContentEvent) -> Result<(), EventHandlerError> {
        if self.token.is_cancelled() {
            return Ok(());
        }
        if let Some(shared) = self.shared.upgrade() {
            shared.apply_event(&self.token, event);
        }
        Ok(())
    }
}

/// Builder for [`ContentRouter`].
pub struct ContentRouterBuilder {
    source: Arc<dyn ContentSource>,
    bus: EventBus,
    language: String,
    debug: bool,
    prerender: Option<Arc<PrerenderState>>,
    observer: Option<RoutedContentObserver>,
}

impl ContentRouterBuilder {
    /// Display language used to match change events.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Log canonical id comparisons and swaps.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Seed the first navigation from server prerendered content.
    pub fn prerender(mut self, state: impl Into<Arc<PrerenderState>>) -> Self {
        self.prerender = Some(state.into());
        self
    }

    /// Be told about the routed entity.
    pub fn on_routed_content<F>(mut self, observer: F) -> Self
    where
        F: Fn(Option<Arc<ContentEntity>>) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Build the router.
    pub fn build(self) -> ContentRouter {
        let (state_tx, _) = watch::channel(RouterSnapshot::default());
        ContentRouter {
            shared: Arc::new(Shared {
                source: self.source,
                bus: self.bus,
                language: self.language,
                debug: self.debug,
                observer: self.observer,
                inner: Mutex::new(Inner {
                    prerender: self.prerender,
                    ..Inner::default()
                }),
                state_tx,
            }),
        }
    }
}
