// Application configuration for Contour

pub mod env;
pub mod error;
pub mod loader;
pub mod validation;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use validation::{ConfigValidator, Validate};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

/// Prefix of the environment variables read by [`AppConfig::load`].
pub const ENV_PREFIX: &str = "CONTOUR";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root url of the CMS hosting the delivery API.
    pub base_url: String,
    /// Path the application is mounted on, used to build hrefs.
    pub base_path: String,
    /// Language used when content carries none.
    pub default_language: String,
    /// Ask the API to expand all references (`expand=*`).
    pub auto_expand_requests: bool,
    /// Address content by GUID when possible.
    pub prefer_guid: bool,
    /// Suppress all network access, e.g. while rendering on the server.
    pub disabled: bool,
    /// Enable debug diagnostics.
    pub debug: bool,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            base_path: "/".to_string(),
            default_language: "en".to_string(),
            auto_expand_requests: false,
            prefer_guid: true,
            disabled: false,
            debug: false,
            timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Load from an optional file, a `.env` file and `CONTOUR_*` variables.
    ///
    /// Later sources win: defaults, then the file, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let file = match path {
            Some(path) => Some(ConfigLoader::auto(path)?.load_file(path)?),
            None => None,
        };
        let env = EnvLoader::default().load();

        let config = Self::from_layers(file.into_iter().chain(std::iter::once(Value::Object(env))))?;
        tracing::debug!(base_url = %config.base_url, disabled = config.disabled, "Loaded configuration");
        Ok(config)
    }

    /// Overlay JSON objects on top of the defaults and validate the result.
    pub fn from_layers<I>(layers: I) -> Result<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut merged = serde_json::to_value(Self::default())
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))?;

        for layer in layers {
            if let (Value::Object(target), Value::Object(source)) = (&mut merged, layer) {
                target.extend(source);
            }
        }

        let config: Self = serde_json::from_value(merged)
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        ConfigValidator::is_url(&self.base_url, "base_url")?;
        ConfigValidator::is_absolute_path(&self.base_path, "base_path")?;
        ConfigValidator::not_empty(&self.default_language, "default_language")?;
        ConfigValidator::in_range(self.timeout_secs, 1, 600, "timeout_secs")?;
        Ok(())
    }
}
