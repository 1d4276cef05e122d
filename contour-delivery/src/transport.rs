//! Network adapter used by the delivery client.

use crate::{ApiRequest, ApiResponse, DeliveryConfig, Result};
use async_trait::async_trait;

/// Sends requests over the network.
///
/// The default implementation is [`ReqwestTransport`]; tests and hosts with
/// their own HTTP stack plug in other implementations.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the request and return the raw response, whatever its status.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// Transport over a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport with the timeouts and compression of `config`.
    pub fn new(config: &DeliveryConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(config.gzip)
            .brotli(config.brotli)
            .build()?;

        Ok(Self { inner })
    }

    /// Wrap an existing client.
    pub fn from_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Get the underlying reqwest client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let (method, url, headers, body) = request.into_parts();

        let mut builder = self.inner.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = self.inner.execute(builder.build()?).await?;
        ApiResponse::from_reqwest(response).await
    }
}
