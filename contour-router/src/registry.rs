//! Views for content types.

use crate::{RenderOutput, Result, RouterError};
use contour_core::ContentEntity;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Renders one kind of content.
pub trait ContentView: Send + Sync {
    /// Render `entity`, routed at `path`.
    fn render(&self, entity: &ContentEntity, path: &str) -> String;

    /// Document title for `entity`.
    fn title(&self, entity: &ContentEntity) -> Option<String> {
        Some(entity.name.clone()).filter(|name| !name.is_empty())
    }
}

type ViewFactory = Arc<dyn Fn() -> Box<dyn ContentView> + Send + Sync>;

/// Maps content type tags to view constructors.
///
/// Populated at startup. Lookup starts at the most specific tag (the last
/// one in `contentType`) and walks back to the least specific one.
#[derive(Clone)]
pub struct ViewRegistry {
    views: HashMap<String, ViewFactory>,
    not_found: ViewFactory,
    loading: ViewFactory,
}

impl ViewRegistry {
    /// Create a registry with the built-in not-found and loading views.
    pub fn new() -> Self {
        Self {
            views: HashMap::new(),
            not_found: Arc::new(|| Box::new(NotFoundView) as Box<dyn ContentView>),
            loading: Arc::new(|| Box::new(LoadingView) as Box<dyn ContentView>),
        }
    }

    /// Register the view for a content type tag, replacing any earlier one.
    pub fn register<F, V>(&mut self, content_type: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: ContentView + 'static,
    {
        self.views
            .insert(content_type.into(), Arc::new(move || Box::new(factory()) as Box<dyn ContentView>));
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_view<F, V>(mut self, content_type: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: ContentView + 'static,
    {
        self.register(content_type, factory);
        self
    }

    /// Replace the view rendered when there is no content.
    pub fn with_not_found<F, V>(mut self, factory: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: ContentView + 'static,
    {
        self.not_found = Arc::new(move || Box::new(factory()) as Box<dyn ContentView>);
        self
    }

    /// Replace the view rendered while content loads.
    pub fn with_loading<F, V>(mut self, factory: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: ContentView + 'static,
    {
        self.loading = Arc::new(move || Box::new(factory()) as Box<dyn ContentView>);
        self
    }

    /// Whether a view is registered for `content_type`.
    pub fn contains(&self, content_type: &str) -> bool {
        self.views.contains_key(content_type)
    }

    /// Construct the view for `entity`.
    pub fn resolve(&self, entity: &ContentEntity) -> Result<Box<dyn ContentView>> {
        entity
            .content_type
            .iter()
            .rev()
            .find_map(|tag| self.views.get(tag))
            .map(|factory| factory())
            .ok_or_else(|| {
                RouterError::UnknownType(entity.type_name().unwrap_or_default().to_string())
            })
    }

    /// Construct the not-found view.
    pub fn not_found(&self) -> Box<dyn ContentView> {
        (self.not_found)()
    }

    /// Construct the loading view.
    pub fn loading(&self) -> Box<dyn ContentView> {
        (self.loading)()
    }

    /// Render a router projection.
    pub fn render(&self, output: &RenderOutput) -> Result<String> {
        let empty = ContentEntity::default();
        Ok(match output {
            RenderOutput::NotFound => self.not_found().render(&empty, ""),
            RenderOutput::Loading => self.loading().render(&empty, ""),
            RenderOutput::Content { entity, path } => self.resolve(entity)?.render(entity, path),
        })
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.views.keys().collect();
        types.sort();
        f.debug_struct("ViewRegistry").field("types", &types).finish()
    }
}

/// Built-in not-found view.
pub struct NotFoundView;

impl ContentView for NotFoundView {
    fn render(&self, _entity: &ContentEntity, _path: &str) -> String {
        "<div class=\"not-found\">Not found</div>".to_string()
    }

    fn title(&self, _entity: &ContentEntity) -> Option<String> {
        Some("Not found".to_string())
    }
}

/// Built-in loading placeholder.
pub struct LoadingView;

impl ContentView for LoadingView {
    fn render(&self, _entity: &ContentEntity, _path: &str) -> String {
        "<div class=\"spinner\"></div>".to_string()
    }

    fn title(&self, _entity: &ContentEntity) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contour_core::ContentLink;

    struct PageView;

    impl ContentView for PageView {
        fn render(&self, entity: &ContentEntity, path: &str) -> String {
            format!("<main data-path=\"{}\">{}</main>", path, entity.name)
        }
    }

    struct ProductView;

    impl ContentView for ProductView {
        fn render(&self, entity: &ContentEntity, _path: &str) -> String {
            format!("<article>{}</article>", entity.name)
        }
    }

    fn entity(types: &[&str]) -> ContentEntity {
        ContentEntity::new(ContentLink::new(1, "G1", "/"), types.iter().copied(), "Widget")
    }

    #[test]
    fn test_most_specific_type_wins() {
        let registry = ViewRegistry::new()
            .with_view("Page", || PageView)
            .with_view("Product", || ProductView);

        let view = registry.resolve(&entity(&["Page", "Product"])).unwrap();
        assert_eq!(view.render(&entity(&[]), "/"), "<article>Widget</article>");
    }

    #[test]
    fn test_falls_back_to_less_specific_type() {
        let registry = ViewRegistry::new().with_view("Page", || PageView);

        let view = registry.resolve(&entity(&["Page", "Product"])).unwrap();
        assert_eq!(view.render(&entity(&[]), "/en/"), "<main data-path=\"/en/\">Widget</main>");
    }

    #[test]
    fn test_unknown_type() {
        let registry = ViewRegistry::new().with_view("Page", || PageView);

        let result = registry.resolve(&entity(&["Block", "Teaser"]));
        assert!(matches!(result, Err(RouterError::UnknownType(ref t)) if t == "Teaser"));
    }

    #[test]
    fn test_render_projection() {
        let registry = ViewRegistry::new().with_view("Page", || PageView);

        assert!(registry.render(&RenderOutput::NotFound).unwrap().contains("Not found"));
        assert!(registry.render(&RenderOutput::Loading).unwrap().contains("spinner"));

        let output = RenderOutput::Content {
            entity: Arc::new(entity(&["Page"])),
            path: "/en/".to_string(),
        };
        assert!(registry.render(&output).unwrap().contains("Widget"));
    }
}
