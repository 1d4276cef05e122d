//! Request and response interceptors.

use crate::{ApiRequest, ApiResponse, Result};
use async_trait::async_trait;

/// Interceptor trait for modifying requests and responses.
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Intercept and optionally modify the request before sending.
    async fn intercept_request(&self, request: ApiRequest) -> Result<ApiRequest> {
        Ok(request)
    }

    /// Intercept and optionally modify the response after receiving.
    async fn intercept_response(&self, response: ApiResponse) -> Result<ApiResponse> {
        Ok(response)
    }
}

/// Logging interceptor that logs requests and responses.
///
/// Installed automatically when the client runs in debug mode.
pub struct LoggingInterceptor {
    log_headers: bool,
    log_body: bool,
}

impl LoggingInterceptor {
    /// Create a new logging interceptor.
    pub fn new() -> Self {
        Self {
            log_headers: false,
            log_body: false,
        }
    }

    /// Enable logging of headers.
    pub fn with_headers(mut self) -> Self {
        self.log_headers = true;
        self
    }

    /// Enable logging of body.
    pub fn with_body(mut self) -> Self {
        self.log_body = true;
        self
    }
}

impl Default for LoggingInterceptor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Interceptor for LoggingInterceptor {
    async fn intercept_request(&self, request: ApiRequest) -> Result<ApiRequest> {
        tracing::debug!(
            method = %request.method(),
            url = %request.url(),
            "Requesting content"
        );

        if self.log_headers {
            for (name, value) in request.headers() {
                tracing::trace!(header = %name, value = ?value, "Request header");
            }
        }

        Ok(request)
    }

    async fn intercept_response(&self, response: ApiResponse) -> Result<ApiResponse> {
        tracing::debug!(status = %response.status(), "Received content response");

        if self.log_headers {
            for (name, value) in response.headers() {
                tracing::trace!(header = %name, value = ?value, "Response header");
            }
        }
        if self.log_body {
            tracing::trace!(body = %String::from_utf8_lossy(response.bytes()), "Response body");
        }

        Ok(response)
    }
}

/// Interceptor adding a fixed header to every request.
pub struct HeaderInterceptor {
    name: String,
    value: String,
}

impl HeaderInterceptor {
    /// Create a header interceptor.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[async_trait]
impl Interceptor for HeaderInterceptor {
    async fn intercept_request(&self, request: ApiRequest) -> Result<ApiRequest> {
        Ok(request.header(&self.name, &self.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[tokio::test]
    async fn test_header_interceptor() {
        let interceptor = HeaderInterceptor::new("X-Channel", "web");
        let request = ApiRequest::get(Url::parse("https://cms.example.com/").unwrap());

        let request = interceptor.intercept_request(request).await.unwrap();
        assert_eq!(request.headers().get("x-channel").unwrap(), "web");
    }

    #[tokio::test]
    async fn test_logging_interceptor_passes_through() {
        let interceptor = LoggingInterceptor::new().with_headers().with_body();
        let request = ApiRequest::get(Url::parse("https://cms.example.com/en/").unwrap());

        let request = interceptor.intercept_request(request).await.unwrap();
        assert_eq!(request.url().path(), "/en/");
    }
}
