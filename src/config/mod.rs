//! Configuration module for fleetwatch
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`FLEETWATCH_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use fleetwatch::config::FleetwatchConfig;
//!
//! // Load defaults
//! let config = FleetwatchConfig::default();
//! assert_eq!(config.monitor.monitoring_interval_ms, 30_000);
//!
//! // Parse from TOML
//! let toml = r#"
//! [monitor]
//! monitoring_interval_ms = 10000
//! "#;
//! let config: FleetwatchConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.monitor.monitoring_interval_ms, 10_000);
//! ```

pub mod error;
pub mod logging;
pub mod metrics;
pub mod target;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use metrics::MetricsConfig;
pub use target::TargetConfig;

// Re-export engine configuration from the monitor module
pub use crate::monitor::{AlertThresholds, MonitorConfig};

use crate::monitor::Target;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Unified configuration for fleetwatch.
///
/// # Example
///
/// ```rust
/// use fleetwatch::config::FleetwatchConfig;
///
/// let config = FleetwatchConfig::default();
/// assert!(config.monitor.auto_recovery);
/// assert!(config.targets.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FleetwatchConfig {
    /// Monitoring loop and alert thresholds
    pub monitor: MonitorConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Prometheus exporter
    pub metrics: MetricsConfig,
    /// Monitored targets
    pub targets: Vec<TargetConfig>,
}

impl FleetwatchConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports FLEETWATCH_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var("FLEETWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("FLEETWATCH_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        if let Ok(interval) = std::env::var("FLEETWATCH_INTERVAL_MS") {
            if let Ok(ms) = interval.parse() {
                self.monitor.monitoring_interval_ms = ms;
            }
        }
        if let Ok(recovery) = std::env::var("FLEETWATCH_AUTO_RECOVERY") {
            match recovery.to_lowercase().as_str() {
                "true" | "1" => self.monitor.auto_recovery = true,
                "false" | "0" => self.monitor.auto_recovery = false,
                _ => {}
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.monitor.validate()?;

        let mut seen = HashSet::new();
        for (i, target) in self.targets.iter().enumerate() {
            if target.id.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("targets[{}].id", i),
                    message: "id cannot be empty".to_string(),
                });
            }
            if target.url.is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("targets[{}].url", i),
                    message: "URL cannot be empty".to_string(),
                });
            }
            if !seen.insert(target.id.as_str()) {
                return Err(ConfigError::DuplicateTarget(target.id.clone()));
            }
        }

        Ok(())
    }

    /// Targets in the form the monitor takes them.
    pub fn monitor_targets(&self) -> Vec<Target> {
        self.targets.iter().map(Target::from).collect()
    }
}
