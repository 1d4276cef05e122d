//! Integration tests for common Contour workflows.
//!
//! A delivery client talks to a mock CMS, a router follows the content and
//! views render it.

use contour::prelude::*;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct ProductView;

impl ContentView for ProductView {
    fn render(&self, entity: &ContentEntity, path: &str) -> String {
        let price = entity.property("price").and_then(|p| p["value"].as_i64()).unwrap_or_default();
        format!("<article data-path=\"{path}\"><h1>{}</h1><p>{price}</p></article>", entity.name)
    }
}

fn widget(price: i64) -> serde_json::Value {
    json!({
        "contentLink": { "id": 42, "workId": 3, "guidValue": "G1", "url": "/en/products/widget/" },
        "contentType": ["Page", "Product"],
        "name": "Widget",
        "language": { "name": "en" },
        "price": { "propertyDataType": "Number", "value": price }
    })
}

fn registry() -> ViewRegistry {
    ViewRegistry::new().with_view("Product", || ProductView)
}

async fn cms() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/en/products/widget/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(widget(12)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    server
}

// =============================================================================
// Client side
// =============================================================================

#[tokio::test]
async fn test_route_render_and_follow_edits() {
    let server = cms().await;
    let config = AppConfig {
        base_url: server.uri(),
        ..AppConfig::default()
    };
    let client = DeliveryClient::new(DeliveryConfig::from(&config)).unwrap();
    let bus = EventBus::new();
    let router = ContentRouter::builder(Arc::new(client), bus.clone())
        .language(config.default_language.clone())
        .build();
    let views = registry();

    router.navigate("/en/products/widget/");
    let snapshot = router.settled().await;
    assert_eq!(
        views.render(&snapshot.view()).unwrap(),
        "<article data-path=\"/en/products/widget/\"><h1>Widget</h1><p>12</p></article>"
    );

    let edited: ContentEntity = serde_json::from_value(widget(15)).unwrap();
    bus.publish(ContentEvent::after_update(Some(edited))).await.unwrap();

    assert!(views.render(&router.view()).unwrap().contains("<p>15</p>"));
}

#[tokio::test]
async fn test_missing_page_renders_error_entity() {
    let server = cms().await;
    let config = DeliveryConfig::builder().base_url(server.uri()).build();
    let router = ContentRouter::new(Arc::new(DeliveryClient::new(config).unwrap()), EventBus::new());

    router.navigate("/en/missing/");
    router.settled().await;

    let entity = router.entity().unwrap();
    assert!(entity.is_network_error());
    assert_eq!(entity.content_link.url, "/en/missing/");

    let views = registry().with_view("NetworkError", || ProductView);
    assert!(views.render(&router.view()).unwrap().contains("<h1>Error</h1>"));
}

#[test]
fn test_intercepted_links() {
    let current = url::Url::parse("http://localhost/en/").unwrap();

    assert_eq!(
        resolve_navigation(&current, "/en/products/widget/", &LinkAttributes::new(), "/", "/en/"),
        Navigation::Push("/en/products/widget/".to_string())
    );
    assert_eq!(
        resolve_navigation(&current, "/en/", &LinkAttributes::new(), "/", "/en/"),
        Navigation::SamePage
    );
}

// =============================================================================
// Server side
// =============================================================================

#[tokio::test]
async fn test_server_render_from_prerendered_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(widget(12)))
        .expect(0)
        .mount(&server)
        .await;

    let config = AppConfig {
        base_url: server.uri(),
        ..AppConfig::default()
    };
    let renderer = ServerRenderer::new(&config, registry()).unwrap();
    let entity: ContentEntity = serde_json::from_value(widget(12)).unwrap();
    let state = PrerenderState::from_json(&json!({ "/en/products/widget/": entity }).to_string()).unwrap();

    let page = renderer.render("/en/products/widget/", &state).await.unwrap();
    assert_eq!(page.status, 200);
    assert_eq!(page.title.as_deref(), Some("Widget"));

    let missing = renderer.render("/en/other/", &state).await.unwrap();
    assert_eq!(missing.status, 404);
}
