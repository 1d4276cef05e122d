//! Contour Logging
//!
//! Installs a `tracing` subscriber configured from the environment. All
//! Contour crates log through `tracing`; this crate only decides where the
//! output goes and how verbose it is.
//!
//! # Usage
//!
//! ```rust
//! contour_log::init();
//!
//! tracing::debug!(path = "/en/", "Resolving route");
//! ```
//!
//! # Environment Variables
//!
//! - `CONTOUR_DEBUG=1` - Enable debug logging (canonical id comparisons, entity swaps)
//! - `CONTOUR_LOG_LEVEL=trace|debug|info|warn|error|off` - Set log level
//! - `CONTOUR_LOG_FORMAT=pretty|compact|json` - Set output format
//! - `CONTOUR_LOG_COLOR=1|0` - Enable/disable colors
//! - `CONTOUR_LOG=<filter>` - Full `EnvFilter` directive, overrides the level

use once_cell::sync::Lazy;
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Log Levels
// ============================================================================

/// Minimum log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Trace level (most verbose)
    Trace,
    /// Debug level
    Debug,
    /// Info level
    Info,
    /// Warning level
    Warn,
    /// Error level
    Error,
    /// No logging
    Off,
}

impl Level {
    /// Parse a level name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "off" | "none" => Some(Level::Off),
            _ => None,
        }
    }

    /// Filter directive for this level.
    pub fn as_directive(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Off => "off",
        }
    }
}

// ============================================================================
// Log Format
// ============================================================================

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Multi-line human readable output
    Pretty,
    /// Single-line output
    Compact,
    /// JSON lines for log shippers
    Json,
}

impl Format {
    /// Parse a format name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(Format::Pretty),
            "compact" => Some(Format::Compact),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

static CONFIG: Lazy<LogConfig> = Lazy::new(LogConfig::from_env);

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Debug diagnostics enabled
    pub debug: bool,
    /// Minimum level
    pub level: Level,
    /// Output format
    pub format: Format,
    /// ANSI colors
    pub color: bool,
    /// Include the event target (module path)
    pub module_path: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Info,
            format: Format::Compact,
            color: false,
            module_path: true,
        }
    }
}

impl LogConfig {
    /// Read the configuration from `CONTOUR_*` environment variables.
    pub fn from_env() -> Self {
        let debug = flag("CONTOUR_DEBUG").unwrap_or(false);

        let level = env::var("CONTOUR_LOG_LEVEL")
            .ok()
            .and_then(|s| Level::parse(&s))
            .unwrap_or(if debug { Level::Debug } else { Level::Info });

        let format = env::var("CONTOUR_LOG_FORMAT")
            .ok()
            .and_then(|s| Format::parse(&s))
            .unwrap_or(Format::Compact);

        let color = flag("CONTOUR_LOG_COLOR")
            .unwrap_or_else(|| env::var("NO_COLOR").is_err() && env::var("TERM").is_ok());

        let module_path = flag("CONTOUR_LOG_MODULE").unwrap_or(true);

        DEBUG_ENABLED.store(debug, Ordering::SeqCst);

        Self {
            debug,
            level,
            format,
            color,
            module_path,
        }
    }

    /// Filter for this configuration; `CONTOUR_LOG` takes precedence.
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_env("CONTOUR_LOG")
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_directive()))
    }
}

fn flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

// ============================================================================
// Public API
// ============================================================================

/// Install the global subscriber from the environment configuration.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init() {
    let _ = try_init_with(config());
}

/// Install the global subscriber with an explicit configuration.
///
/// Returns `false` when a global subscriber was already installed.
pub fn try_init_with(config: &LogConfig) -> bool {
    if config.debug {
        set_debug(true);
    }

    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_ansi(config.color)
        .with_target(config.module_path)
        .with_writer(std::io::stderr);

    let result = match config.format {
        Format::Pretty => builder.pretty().try_init(),
        Format::Compact => builder.compact().try_init(),
        Format::Json => builder.json().try_init(),
    };

    result.is_ok()
}

/// Whether debug diagnostics are enabled.
#[inline]
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

/// Enable or disable debug diagnostics at runtime.
pub fn set_debug(enabled: bool) {
    DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
}

/// The environment configuration.
pub fn config() -> &'static LogConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Off);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!(Level::parse("debug"), Some(Level::Debug));
        assert_eq!(Level::parse("WARNING"), Some(Level::Warn));
        assert_eq!(Level::parse("none"), Some(Level::Off));
        assert_eq!(Level::parse("loud"), None);
        assert_eq!(Level::Debug.as_directive(), "debug");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(Format::parse("pretty"), Some(Format::Pretty));
        assert_eq!(Format::parse("Compact"), Some(Format::Compact));
        assert_eq!(Format::parse("json"), Some(Format::Json));
        assert_eq!(Format::parse("xml"), None);
    }

    #[test]
    fn test_debug_flag() {
        let original = is_debug_enabled();

        set_debug(true);
        assert!(is_debug_enabled());

        set_debug(false);
        assert!(!is_debug_enabled());

        set_debug(original);
    }

    #[test]
    fn test_init_is_idempotent() {
        let config = LogConfig {
            level: Level::Off,
            ..LogConfig::default()
        };
        try_init_with(&config);
        assert!(!try_init_with(&config));

        tracing::info!("after init");
    }
}
