//! Logging setup.
//!
//! The subscriber is configured from an explicit [`TelemetryConfig`] and
//! installed once by [`Telemetry::init`]. `RUST_LOG` still wins when set.

use crate::config::TelemetrySettings;
use crate::error::{AlfredError, Result};
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Default filter directive for this crate.
    pub level: String,
    pub ansi: bool,
    pub with_target: bool,
}

impl TelemetryConfig {
    /// Build from settings, with `-v` flags raising the level.
    pub fn from_settings(settings: &TelemetrySettings, verbosity: u8) -> Self {
        let level = match verbosity {
            0 => settings.level.clone(),
            1 => "info".to_string(),
            2 => "debug".to_string(),
            _ => "trace".to_string(),
        };

        Self {
            level,
            ansi: settings.ansi,
            with_target: settings.with_target,
        }
    }

    /// The filter directive used when `RUST_LOG` is unset.
    pub fn directive(&self) -> String {
        format!("alfred={}", self.level)
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::from_settings(&TelemetrySettings::default(), 0)
    }
}

/// An installed logging session.
#[derive(Debug)]
pub struct Telemetry {
    started: Instant,
}

impl Telemetry {
    /// Install the global subscriber. Logs go to stderr so stdout stays
    /// clean for command output and the MCP transport.
    pub fn init(config: &TelemetryConfig) -> Result<Self> {
        let filter = match std::env::var("RUST_LOG") {
            Ok(directive) if !directive.is_empty() => EnvFilter::new(directive),
            _ => EnvFilter::new(config.directive()),
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(config.ansi)
                    .with_target(config.with_target),
            )
            .try_init()
            .map_err(|e| AlfredError::Config(format!("Failed to initialize logging: {}", e)))?;

        debug!("Logging initialized with '{}'", config.directive());

        Ok(Self {
            started: Instant::now(),
        })
    }

    /// End the logging session.
    pub fn shutdown(self) {
        info!("Shutting down after {:.2?}", self.started.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_overrides_level() {
        let settings = TelemetrySettings::default();
        assert_eq!(TelemetryConfig::from_settings(&settings, 0).level, "warn");
        assert_eq!(TelemetryConfig::from_settings(&settings, 1).level, "info");
        assert_eq!(TelemetryConfig::from_settings(&settings, 2).level, "debug");
        assert_eq!(TelemetryConfig::from_settings(&settings, 5).level, "trace");
    }

    #[test]
    fn test_directive_targets_crate() {
        assert_eq!(TelemetryConfig::default().directive(), "alfred=warn");
    }
}
