//! Content delivery API client for Contour
//!
//! Async client for a headless CMS content delivery API: path lookups,
//! reference fetches, children, ancestors, batch lookups, controller method
//! invocation and the site list.
//!
//! Single item fetches never fail because of the network. A failed request
//! is turned into a *network error entity* (content type
//! `["Errors", "NetworkError"]`) that renders like any other content. List
//! fetches turn into empty lists instead. A disabled client rejects every
//! operation with [`DeliveryError::ClientDisabled`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use contour_delivery::{DeliveryClient, DeliveryConfig};
//!
//! # async fn run() -> contour_delivery::Result<()> {
//! let config = DeliveryConfig::builder()
//!     .base_url("https://cms.example.com")
//!     .default_language("en")
//!     .build();
//! let client = DeliveryClient::new(config)?;
//!
//! let response = client.fetch_by_path("/en/products/widget/").await?;
//! println!("{}", response.content().name);
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom transports
//!
//! ```
//! use async_trait::async_trait;
//! use contour_delivery::{ApiRequest, ApiResponse, DeliveryClient, DeliveryConfig, Result, Transport};
//!
//! struct Offline;
//!
//! #[async_trait]
//! impl Transport for Offline {
//!     async fn send(&self, _request: ApiRequest) -> Result<ApiResponse> {
//!         Err(contour_delivery::DeliveryError::Transport("offline".into()))
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let client = DeliveryClient::builder(DeliveryConfig::default())
//!     .transport(Offline)
//!     .build()
//!     .unwrap();
//! let response = client.fetch_by_path("/en/").await.unwrap();
//! assert!(response.content().is_network_error());
//! # });
//! ```

mod client;
mod config;
mod error;
mod interceptor;
mod request;
mod response;
mod transport;
mod website;

pub use client::{DeliveryClient, DeliveryClientBuilder};
pub use config::{ACTION_SERVICE, CONTENT_SERVICE, DeliveryConfig, DeliveryConfigBuilder, SITE_SERVICE};
pub use error::{DeliveryError, Result};
pub use interceptor::{HeaderInterceptor, Interceptor, LoggingInterceptor};
pub use request::ApiRequest;
pub use response::ApiResponse;
pub use transport::{ReqwestTransport, Transport};
pub use website::{SiteHost, SiteLanguage, Website, WebsiteList};

// Re-export for method verbs
pub use http::Method;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::client::{DeliveryClient, DeliveryClientBuilder};
    pub use crate::config::{DeliveryConfig, DeliveryConfigBuilder};
    pub use crate::error::{DeliveryError, Result};
    pub use crate::interceptor::{Interceptor, LoggingInterceptor};
    pub use crate::transport::Transport;
    pub use http::Method;
}
