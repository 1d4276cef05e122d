// Environment variable loading

use crate::{ConfigError, Result};
use serde_json::{Map, Value};
use std::env;

/// Environment variable loader
pub struct EnvLoader {
    prefix: String,
}

impl EnvLoader {
    /// Create a loader for variables starting with `<prefix>_`
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load all prefixed environment variables, keyed by their normalized name
    pub fn load(&self) -> Map<String, Value> {
        self.collect(env::vars())
    }

    /// Normalize and type a set of variables
    pub fn collect<I>(&self, vars: I) -> Map<String, Value>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        vars.into_iter()
            .filter_map(|(key, value)| {
                normalize_key(&key, &self.prefix).map(|key| (key, coerce(&value)))
            })
            .collect()
    }

    /// Load a specific environment variable
    pub fn load_var(&self, key: &str) -> Result<String> {
        let full_key = format!("{}_{}", self.prefix, key.to_uppercase());
        env::var(&full_key).map_err(ConfigError::EnvError)
    }

    /// Load with default value
    pub fn load_var_or(&self, key: &str, default: &str) -> String {
        self.load_var(key).unwrap_or_else(|_| default.to_string())
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(crate::ENV_PREFIX)
    }
}

/// `CONTOUR_BASE_URL` becomes `base_url`; keys without the prefix are skipped.
pub(crate) fn normalize_key(key: &str, prefix: &str) -> Option<String> {
    key.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('_'))
        .filter(|rest| !rest.is_empty())
        .map(str::to_lowercase)
}

/// Type a raw string value: booleans and integers are recognized.
pub(crate) fn coerce(value: &str) -> Value {
    if value.eq_ignore_ascii_case("true") {
        Value::Bool(true)
    } else if value.eq_ignore_ascii_case("false") {
        Value::Bool(false)
    } else if let Ok(number) = value.parse::<u64>() {
        Value::from(number)
    } else {
        Value::String(value.to_string())
    }
}
