//! Delivery client against a mock HTTP server.

use contour_core::{ContentLink, ContentReference};
use contour_delivery::{DeliveryClient, DeliveryConfig, DeliveryError, HeaderInterceptor, Method};
use serde::{Deserialize, Serialize};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn widget() -> serde_json::Value {
    json!({
        "contentLink": { "id": 42, "workId": 0, "guidValue": "G1", "url": "/en/products/widget/" },
        "contentType": ["Page", "Product"],
        "name": "Widget",
        "language": { "name": "en", "displayName": "English" },
        "price": { "propertyDataType": "Number", "value": 12 }
    })
}

fn client(server: &MockServer) -> DeliveryClient {
    DeliveryClient::new(DeliveryConfig::builder().base_url(server.uri()).build()).unwrap()
}

#[tokio::test]
async fn test_fetch_by_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/en/products/widget/"))
        .and(header("accept", "application/json"))
        .and(header("accept-language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(widget()))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server).fetch_by_path("/en/products/widget/").await.unwrap();
    let entity = response.into_content();

    assert_eq!(entity.name, "Widget");
    assert_eq!(entity.type_name(), Some("Product"));
    assert_eq!(entity.property("price").unwrap()["value"], 12);
}

#[tokio::test]
async fn test_fetch_by_path_expands_references() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/en/"))
        .and(query_param("expand", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(widget()))
        .expect(1)
        .mount(&server)
        .await;

    let config = DeliveryConfig::builder()
        .base_url(server.uri())
        .auto_expand_requests(true)
        .build();
    let client = DeliveryClient::new(config).unwrap();

    assert!(client.fetch_by_path("/en/").await.unwrap().is_content());
}

#[tokio::test]
async fn test_fetch_by_path_action_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/en/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "actionName": "Index",
            "responseType": "ActionResult",
            "currentContent": widget(),
            "data": { "hits": 3 }
        })))
        .mount(&server)
        .await;

    let response = client(&server).fetch_by_path("/en/search/").await.unwrap();

    assert!(response.is_action());
    assert_eq!(response.content().name, "Widget");
    let payload: serde_json::Value = response.payload().unwrap().unwrap();
    assert_eq!(payload["hits"], 3);
}

#[tokio::test]
async fn test_fetch_by_path_not_found_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let entity = client(&server).fetch_by_path("/en/missing/").await.unwrap().into_content();

    assert!(entity.is_network_error());
    assert_eq!(entity.content_link.url, "/en/missing/");
    assert_eq!(entity.content_link.id, 1);
}

#[tokio::test]
async fn test_fetch_by_path_unreachable_server() {
    let config = DeliveryConfig::builder().base_url("http://127.0.0.1:9").build();
    let client = DeliveryClient::new(config).unwrap();

    let entity = client.fetch_by_path("/en/").await.unwrap().into_content();
    assert!(entity.is_network_error());
}

#[tokio::test]
async fn test_fetch_children_and_ancestors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/episerver/v3.0/content/G1/children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([widget(), widget()])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/episerver/v3.0/content/G1/ancestors"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client(&server);
    let reference = ContentReference::from(ContentLink::new(42, "G1", "/en/"));

    assert_eq!(client.fetch_children(&reference).await.unwrap().len(), 2);
    assert!(client.fetch_ancestors(&reference).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fetch_by_references() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/episerver/v3.0/content/"))
        .and(query_param("references", "G1,G2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([widget()])))
        .expect(1)
        .mount(&server)
        .await;

    let items = client(&server).fetch_by_references(&["G1", "G2"]).await.unwrap();
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn test_edit_mode_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/episerver/v3.0/content/42_7"))
        .and(query_param("epieditmode", "True"))
        .respond_with(ResponseTemplate::new(200).set_body_json(widget()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client.set_edit_mode(true);

    let entity = client.fetch_by_ref("42_7").await.unwrap();
    assert!(!entity.is_network_error());
}

#[derive(Debug, Serialize)]
struct SearchQuery {
    term: String,
}

#[derive(Debug, Deserialize, PartialEq)]
struct SearchResult {
    hits: u32,
}

#[tokio::test]
async fn test_invoke_typed_method() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/episerver/v3/action/G1/Search"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "term": "widget" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "actionName": "Search",
            "responseType": "ActionResult",
            "currentContent": widget(),
            "data": { "hits": 7 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let link = ContentLink::new(42, "G1", "/en/");
    let query = SearchQuery { term: "widget".to_string() };
    let response = client(&server)
        .invoke_typed_method::<SearchResult, _>(&link, "Search", Method::POST, Some(&query))
        .await
        .unwrap();

    assert!(response.is_action_result());
    assert_eq!(response.payload, SearchResult { hits: 7 });
}

#[tokio::test]
async fn test_invoke_method_error_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("denied"))
        .mount(&server)
        .await;

    let result = client(&server)
        .invoke_method::<serde_json::Value>(&ContentLink::new(1, "G1", ""), "Secret", Method::GET, None)
        .await;

    assert_eq!(result.unwrap_err().status_code(), Some(403));
}

#[tokio::test]
async fn test_websites_are_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/episerver/v3/site/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "s1", "name": "Demo", "contentRoots": { "startPage": { "id": 5, "guidValue": "G5", "url": "/en/" } } },
            { "id": "s2", "name": "Other" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    assert_eq!(client.websites().await.unwrap().len(), 2);

    let site = client.website().await.unwrap().unwrap();
    assert_eq!(site.name, "Demo");
    assert_eq!(site.start_page().map(|l| l.id), Some(5));
}

#[tokio::test]
async fn test_interceptor_headers_reach_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("x-channel", "web"))
        .respond_with(ResponseTemplate::new(200).set_body_json(widget()))
        .expect(1)
        .mount(&server)
        .await;

    let client = DeliveryClient::builder(DeliveryConfig::builder().base_url(server.uri()).debug(true).build())
        .interceptor(HeaderInterceptor::new("X-Channel", "web"))
        .build()
        .unwrap();

    assert!(!client.fetch_by_path("/en/").await.unwrap().content().is_network_error());
}

#[tokio::test]
async fn test_disabled_client_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(widget()))
        .expect(0)
        .mount(&server)
        .await;

    let config = DeliveryConfig::builder().base_url(server.uri()).disabled(true).build();
    let client = DeliveryClient::new(config).unwrap();

    assert!(matches!(client.fetch_by_path("/en/").await, Err(DeliveryError::ClientDisabled)));
    assert!(matches!(client.fetch_by_ref("G1").await, Err(DeliveryError::ClientDisabled)));
}
