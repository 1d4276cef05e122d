//! Delivery client configuration.

use contour_config::AppConfig;
use std::time::Duration;

/// Content service path, relative to the base url.
pub const CONTENT_SERVICE: &str = "/api/episerver/v3.0/content/";
/// Site listing service path.
pub const SITE_SERVICE: &str = "/api/episerver/v3/site/";
/// Controller action service path.
pub const ACTION_SERVICE: &str = "/api/episerver/v3/action/";

/// Delivery client configuration.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Root url of the CMS.
    pub base_url: String,
    /// Language sent as `Accept-Language`.
    pub default_language: String,
    /// Append `expand=*` to content requests.
    pub auto_expand_requests: bool,
    /// Address content by GUID when possible.
    pub prefer_guid: bool,
    /// Reject every network operation.
    pub disabled: bool,
    /// Log requests and responses.
    pub debug: bool,
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Default headers for all requests, after `Accept` and `Accept-Language`.
    pub default_headers: Vec<(String, String)>,
    /// User agent string.
    pub user_agent: String,
    /// Enable gzip compression.
    pub gzip: bool,
    /// Enable brotli compression.
    pub brotli: bool,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            default_language: "en".to_string(),
            auto_expand_requests: false,
            prefer_guid: true,
            disabled: false,
            debug: false,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            default_headers: Vec::new(),
            user_agent: format!("contour-delivery/{}", env!("CARGO_PKG_VERSION")),
            gzip: true,
            brotli: true,
        }
    }
}

impl DeliveryConfig {
    /// Create a new configuration builder.
    pub fn builder() -> DeliveryConfigBuilder {
        DeliveryConfigBuilder::default()
    }
}

impl From<&AppConfig> for DeliveryConfig {
    fn from(app: &AppConfig) -> Self {
        Self {
            base_url: app.base_url.clone(),
            default_language: app.default_language.clone(),
            auto_expand_requests: app.auto_expand_requests,
            prefer_guid: app.prefer_guid,
            disabled: app.disabled,
            debug: app.debug,
            timeout: app.timeout(),
            ..Self::default()
        }
    }
}

/// Builder for delivery client configuration.
#[derive(Debug, Default)]
pub struct DeliveryConfigBuilder {
    config: DeliveryConfig,
}

impl DeliveryConfigBuilder {
    /// Set the CMS base url.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the default language.
    pub fn default_language(mut self, language: impl Into<String>) -> Self {
        self.config.default_language = language.into();
        self
    }

    /// Ask the API to expand all references.
    pub fn auto_expand_requests(mut self, enable: bool) -> Self {
        self.config.auto_expand_requests = enable;
        self
    }

    /// Prefer GUID addressing.
    pub fn prefer_guid(mut self, enable: bool) -> Self {
        self.config.prefer_guid = enable;
        self
    }

    /// Disable all network access.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.config.disabled = disabled;
        self
    }

    /// Enable debug logging of requests.
    pub fn debug(mut self, enable: bool) -> Self {
        self.config.debug = enable;
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Add a default header for all requests.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.push((name.into(), value.into()));
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Enable or disable gzip compression.
    pub fn gzip(mut self, enable: bool) -> Self {
        self.config.gzip = enable;
        self
    }

    /// Enable or disable brotli compression.
    pub fn brotli(mut self, enable: bool) -> Self {
        self.config.brotli = enable;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> DeliveryConfig {
        self.config
    }
}
