//! Server-side rendering.

use crate::{ContentRouter, RenderOutput, Result, RouterError, ViewRegistry};
use contour_config::AppConfig;
use contour_core::ContentEntity;
use contour_delivery::{DeliveryClient, DeliveryConfig};
use contour_events::EventBus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Content the server already resolved, keyed by path.
///
/// Shipped to the browser as initial data so the first client render does
/// not fetch again.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrerenderState {
    items: HashMap<String, ContentEntity>,
}

impl PrerenderState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode initial data, e.g. `{"/en/": {...entity...}}`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RouterError::Prerender(e.to_string()))
    }

    /// Encode as initial data.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| RouterError::Prerender(e.to_string()))
    }

    /// Add the content of `path`.
    pub fn insert(&mut self, path: impl Into<String>, entity: ContentEntity) -> &mut Self {
        self.items.insert(path.into(), entity);
        self
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, path: impl Into<String>, entity: ContentEntity) -> Self {
        self.insert(path, entity);
        self
    }

    pub fn get(&self, path: &str) -> Option<&ContentEntity> {
        self.items.get(path)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Result of rendering a path on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsrResponse {
    pub body: String,
    pub title: Option<String>,
    pub status: u16,
}

/// Renders paths on the server from prerendered state, without network
/// access.
pub struct ServerRenderer {
    client: DeliveryClient,
    registry: Arc<ViewRegistry>,
    language: String,
    debug: bool,
}

impl ServerRenderer {
    /// Create a renderer.
    ///
    /// The delivery client built from `config` is always disabled: content
    /// the prerendered state lacks renders as not found.
    pub fn new(config: &AppConfig, registry: ViewRegistry) -> Result<Self> {
        let delivery = DeliveryConfig {
            disabled: true,
            ..DeliveryConfig::from(config)
        };
        Ok(Self {
            client: DeliveryClient::new(delivery)?,
            registry: Arc::new(registry),
            language: config.default_language.clone(),
            debug: config.debug,
        })
    }

    /// The views used for rendering.
    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    /// Render `path`.
    pub async fn render(&self, path: &str, state: &PrerenderState) -> Result<SsrResponse> {
        let router = ContentRouter::builder(Arc::new(self.client.clone()), EventBus::new())
            .language(self.language.clone())
            .debug(self.debug)
            .prerender(state.clone())
            .build();

        router.navigate(path);
        let snapshot = router.settled().await;
        let output = snapshot.view();
        debug!(%path, loaded = snapshot.state.is_loaded(), "Rendering");

        let response = match &output {
            RenderOutput::Content { entity, path } => {
                let view = self.registry.resolve(entity)?;
                SsrResponse {
                    body: view.render(entity, path),
                    title: view.title(entity),
                    status: 200,
                }
            }
            RenderOutput::NotFound => {
                let view = self.registry.not_found();
                SsrResponse {
                    body: view.render(&ContentEntity::default(), path),
                    title: view.title(&ContentEntity::default()),
                    status: 404,
                }
            }
            RenderOutput::Loading => SsrResponse {
                body: self.registry.render(&output)?,
                title: None,
                status: 200,
            },
        };

        info!(%path, status = response.status, "Rendered on server");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContentView;
    use contour_core::ContentLink;

    struct PageView;

    impl ContentView for PageView {
        fn render(&self, entity: &ContentEntity, path: &str) -> String {
            format!("<main data-path=\"{}\">{}</main>", path, entity.name)
        }
    }

    fn home() -> ContentEntity {
        ContentEntity::new(ContentLink::new(5, "G5", "/en/"), ["Page"], "Home").with_language("en")
    }

    #[test]
    fn test_prerender_state_json() {
        let state = PrerenderState::new().with("/en/", home());
        let json = state.to_json().unwrap();

        let decoded = PrerenderState::from_json(&json).unwrap();
        assert_eq!(decoded.get("/en/").map(|e| e.name.as_str()), Some("Home"));
        assert!(decoded.get("/sv/").is_none());

        assert!(matches!(PrerenderState::from_json("[1, 2]"), Err(RouterError::Prerender(_))));
    }

    #[tokio::test]
    async fn test_render_prerendered_path() {
        let renderer = ServerRenderer::new(&AppConfig::default(), ViewRegistry::new().with_view("Page", || PageView))
            .unwrap();
        let state = PrerenderState::new().with("/en/", home());

        let response = renderer.render("/en/", &state).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "<main data-path=\"/en/\">Home</main>");
        assert_eq!(response.title.as_deref(), Some("Home"));
    }

    #[tokio::test]
    async fn test_render_missing_path_is_not_found() {
        let renderer = ServerRenderer::new(&AppConfig::default(), ViewRegistry::new()).unwrap();

        let response = renderer.render("/en/missing/", &PrerenderState::new()).await.unwrap();
        assert_eq!(response.status, 404);
        assert!(response.body.contains("Not found"));
    }

    #[tokio::test]
    async fn test_render_unknown_type() {
        let renderer = ServerRenderer::new(&AppConfig::default(), ViewRegistry::new()).unwrap();
        let state = PrerenderState::new().with("/en/", home());

        let result = renderer.render("/en/", &state).await;
        assert!(matches!(result, Err(RouterError::UnknownType(_))));
    }
}
