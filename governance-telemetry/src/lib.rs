//! Diagnostic tracing for CERES governance tools.
//!
//! Diagnostics go to stderr so they never mix with the confirmation line or
//! JSON report a tool prints on stdout. `RUST_LOG` overrides the configured
//! default level when set.

#![warn(missing_docs, clippy::pedantic)]

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Level used when neither `RUST_LOG` nor the caller picks one.
pub const DEFAULT_LEVEL: &str = "warn";

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured default level is not a valid filter directive.
    #[error("invalid log level `{directive}`: {source}")]
    InvalidLevel {
        /// Directive that failed to parse.
        directive: String,
        /// Parser failure.
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
}

/// Subscriber settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    default_level: String,
    with_target: bool,
    ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_level: DEFAULT_LEVEL.to_owned(),
            with_target: false,
            ansi: false,
        }
    }
}

impl TelemetryConfig {
    /// Sets the filter directive used when `RUST_LOG` is unset.
    #[must_use]
    pub fn with_default_level(mut self, level: impl Into<String>) -> Self {
        self.default_level = level.into();
        self
    }

    /// Includes event targets in the output.
    #[must_use]
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Enables ANSI colours.
    #[must_use]
    pub fn with_ansi(mut self, enabled: bool) -> Self {
        self.ansi = enabled;
        self
    }

    /// Returns the fallback filter directive.
    #[must_use]
    pub fn default_level(&self) -> &str {
        &self.default_level
    }

    /// Builds the filter: `RUST_LOG` when set and valid, the default level otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::InvalidLevel`] when the default level does
    /// not parse.
    pub fn filter(&self) -> Result<EnvFilter, TelemetryError> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        EnvFilter::try_new(&self.default_level).map_err(|source| TelemetryError::InvalidLevel {
            directive: self.default_level.clone(),
            source,
        })
    }
}

/// Installs the global subscriber.
///
/// Returns `false` when a subscriber was already installed, which leaves the
/// existing one in place.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidLevel`] when the default level does not
/// parse.
pub fn init_tracing(config: &TelemetryConfig) -> Result<bool, TelemetryError> {
    let filter = config.filter()?;
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(config.with_target)
                .with_ansi(config.ansi)
                .without_time(),
        )
        .try_init()
        .is_ok();
    Ok(installed)
}
