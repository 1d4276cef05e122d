//! Observable router state.

use crate::RouterError;
use contour_core::ContentEntity;
use std::sync::Arc;

/// Where the router is in resolving its current path.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RouteState {
    /// Nothing requested yet, or torn down.
    #[default]
    Idle,
    /// Waiting for the content of a path.
    Loading(String),
    /// Content is available.
    Loaded(Arc<ContentEntity>),
    /// The path has no content.
    NotFound,
}

impl RouteState {
    /// The loaded entity, if any.
    pub fn entity(&self) -> Option<&Arc<ContentEntity>> {
        match self {
            RouteState::Loaded(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, RouteState::Loaded(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RouteState::NotFound)
    }
}

/// Point-in-time copy of the router state, as published to watchers.
#[derive(Debug, Clone, Default)]
pub struct RouterSnapshot {
    pub state: RouteState,
    /// Path currently routed to.
    pub path: Option<String>,
    /// A fetch or an event is being processed.
    pub loading: bool,
    /// Set when the server rendered this path without content.
    pub prerendered_empty: bool,
    /// Last error swallowed while routing the current path.
    pub error: Option<Arc<RouterError>>,
}

impl RouterSnapshot {
    /// Project the snapshot onto what should be rendered.
    pub fn view(&self) -> RenderOutput {
        if self.state.is_not_found() {
            return RenderOutput::NotFound;
        }
        match self.state.entity() {
            Some(entity) => RenderOutput::Content {
                entity: entity.clone(),
                path: self.path.clone().unwrap_or_default(),
            },
            None if !self.loading || self.prerendered_empty => RenderOutput::NotFound,
            None => RenderOutput::Loading,
        }
    }
}

/// What the view layer should show.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutput {
    NotFound,
    Loading,
    Content {
        entity: Arc<ContentEntity>,
        path: String,
    },
}
