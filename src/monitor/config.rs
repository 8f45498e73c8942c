//! Configuration for the health monitor.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Thresholds a probe result is scored against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Latency above which a target is considered degraded
    pub response_time_ms: u64,
    /// Error rate (0..=1) above which a target is considered failed
    pub error_rate: f64,
    /// Availability percentage below which a medium alert is raised
    pub availability_pct: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            response_time_ms: 2000,
            error_rate: 0.05,
            availability_pct: 95.0,
        }
    }
}

/// Configuration for the monitoring loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Milliseconds between monitoring ticks
    pub monitoring_interval_ms: u64,
    /// Timeout for each individual probe
    pub health_check_timeout_ms: u64,
    pub alert_thresholds: AlertThresholds,
    /// Invoke the recovery hook for failed targets after each tick
    pub auto_recovery: bool,
    /// Upper bound of the random delay applied before each probe (0 disables)
    pub probe_jitter_ms: u64,
    /// Delay after which unresolved low-severity alerts resolve themselves
    pub low_alert_ttl_ms: u64,
    /// Timeout for a single auto-recovery attempt
    pub recovery_timeout_ms: u64,
    /// Resolved alerts retained for `alerts(true)` queries
    pub max_resolved_alerts: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            monitoring_interval_ms: 30_000,
            health_check_timeout_ms: 5_000,
            alert_thresholds: AlertThresholds::default(),
            auto_recovery: true,
            probe_jitter_ms: 0,
            low_alert_ttl_ms: 5 * 60 * 1000,
            recovery_timeout_ms: 5_000,
            max_resolved_alerts: 500,
        }
    }
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.monitoring_interval_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.health_check_timeout_ms)
    }

    pub fn recovery_timeout(&self) -> Duration {
        Duration::from_millis(self.recovery_timeout_ms)
    }

    pub fn low_alert_ttl(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.low_alert_ttl_ms.min(i64::MAX as u64) as i64)
    }

    /// Reject configurations the monitor cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monitoring_interval_ms == 0 {
            return Err(invalid(
                "monitor.monitoring_interval_ms",
                "interval must be greater than zero",
            ));
        }
        if self.health_check_timeout_ms == 0 {
            return Err(invalid(
                "monitor.health_check_timeout_ms",
                "timeout must be greater than zero",
            ));
        }
        if self.recovery_timeout_ms == 0 {
            return Err(invalid(
                "monitor.recovery_timeout_ms",
                "timeout must be greater than zero",
            ));
        }

        let thresholds = &self.alert_thresholds;
        if thresholds.response_time_ms == 0 {
            return Err(invalid(
                "monitor.alert_thresholds.response_time_ms",
                "threshold must be greater than zero",
            ));
        }
        if !(0.0..=1.0).contains(&thresholds.error_rate) {
            return Err(invalid(
                "monitor.alert_thresholds.error_rate",
                "error rate must be within 0.0..=1.0",
            ));
        }
        if !(0.0..=100.0).contains(&thresholds.availability_pct) {
            return Err(invalid(
                "monitor.alert_thresholds.availability_pct",
                "availability must be within 0..=100",
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    }
}
