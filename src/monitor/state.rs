//! Per-target health state and status derivation.

use super::config::AlertThresholds;
use super::error::ProbeError;
use super::probe::ProbeReport;
use super::target::TargetKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Weight given to each failure when updating the error rate (EMA toward 1.0).
pub const ERROR_RATE_ALPHA: f64 = 0.2;

/// Kind-independent severity of a target's condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HealthLevel {
    Nominal,
    Impaired,
    Failed,
}

/// Status of a single target.
///
/// Models use `active/degraded/error`, services use `healthy/warning/critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStatus {
    Active,
    Degraded,
    Error,
    Healthy,
    Warning,
    Critical,
}

impl TargetStatus {
    /// Map a level onto the vocabulary of the given target kind.
    pub fn for_kind(kind: TargetKind, level: HealthLevel) -> Self {
        match (kind, level) {
            (TargetKind::Model, HealthLevel::Nominal) => TargetStatus::Active,
            (TargetKind::Model, HealthLevel::Impaired) => TargetStatus::Degraded,
            (TargetKind::Model, HealthLevel::Failed) => TargetStatus::Error,
            (TargetKind::Service, HealthLevel::Nominal) => TargetStatus::Healthy,
            (TargetKind::Service, HealthLevel::Impaired) => TargetStatus::Warning,
            (TargetKind::Service, HealthLevel::Failed) => TargetStatus::Critical,
        }
    }

    pub fn nominal(kind: TargetKind) -> Self {
        Self::for_kind(kind, HealthLevel::Nominal)
    }

    pub fn level(self) -> HealthLevel {
        match self {
            TargetStatus::Active | TargetStatus::Healthy => HealthLevel::Nominal,
            TargetStatus::Degraded | TargetStatus::Warning => HealthLevel::Impaired,
            TargetStatus::Error | TargetStatus::Critical => HealthLevel::Failed,
        }
    }

    pub fn is_nominal(self) -> bool {
        self.level() == HealthLevel::Nominal
    }

    pub fn is_failed(self) -> bool {
        self.level() == HealthLevel::Failed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TargetStatus::Active => "active",
            TargetStatus::Degraded => "degraded",
            TargetStatus::Error => "error",
            TargetStatus::Healthy => "healthy",
            TargetStatus::Warning => "warning",
            TargetStatus::Critical => "critical",
        }
    }
}

impl std::fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive a target's status from the latest probe data.
///
/// Precedence is fixed: a failed probe wins over latency, latency wins over
/// error rate. Nothing but `error_rate` carries over from earlier ticks.
pub fn derive_status(
    kind: TargetKind,
    probe_failed: bool,
    response_time_ms: u64,
    error_rate: f64,
    thresholds: &AlertThresholds,
) -> TargetStatus {
    let level = if probe_failed {
        HealthLevel::Failed
    } else if response_time_ms > thresholds.response_time_ms {
        HealthLevel::Impaired
    } else if error_rate > thresholds.error_rate {
        HealthLevel::Failed
    } else {
        HealthLevel::Nominal
    };
    TargetStatus::for_kind(kind, level)
}

/// Live health state for one target. Snapshots carry clones of this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    pub target_id: String,
    pub kind: TargetKind,
    pub status: TargetStatus,
    /// Latency of the most recent probe
    pub response_time_ms: u64,
    /// Failure rate in 0..=1, raised on failure, reset only by recovery
    pub error_rate: f64,
    /// Failures since the last recovery
    pub error_count: u64,
    /// Availability as reported by the probe
    pub availability_pct: f64,
    /// Share of successful probes over the record's lifetime
    pub uptime_pct: f64,
    /// Utilization as reported by the probe
    pub load: f64,
    pub last_check: DateTime<Utc>,
    /// Error from the most recent failed probe
    pub last_error: Option<String>,
    pub total_checks: u64,
    pub successful_checks: u64,
}

impl HealthRecord {
    /// A freshly registered target: nominal, no history.
    pub fn new(target_id: impl Into<String>, kind: TargetKind, now: DateTime<Utc>) -> Self {
        Self {
            target_id: target_id.into(),
            kind,
            status: TargetStatus::nominal(kind),
            response_time_ms: 0,
            error_rate: 0.0,
            error_count: 0,
            availability_pct: 100.0,
            uptime_pct: 100.0,
            load: 0.0,
            last_check: now,
            last_error: None,
            total_checks: 0,
            successful_checks: 0,
        }
    }

    /// Apply the outcome of one probe and re-derive the status.
    pub fn apply_outcome(
        &mut self,
        outcome: &Result<ProbeReport, ProbeError>,
        thresholds: &AlertThresholds,
        now: DateTime<Utc>,
    ) -> TargetStatus {
        self.total_checks += 1;
        self.touch(now);

        let failure = match outcome {
            Ok(report) => {
                self.response_time_ms = report.response_time_ms;
                if let Some(load) = report.load {
                    self.load = load.max(0.0);
                }
                if let Some(availability) = report.availability_pct {
                    self.availability_pct = availability.clamp(0.0, 100.0);
                }
                if report.error_occurred {
                    Some(ProbeError::Reported)
                } else {
                    None
                }
            }
            Err(e) => Some(e.clone()),
        };

        match &failure {
            Some(error) => {
                self.error_rate =
                    (self.error_rate + (1.0 - self.error_rate) * ERROR_RATE_ALPHA).min(1.0);
                self.error_count += 1;
                self.last_error = Some(error.to_string());
            }
            None => {
                self.successful_checks += 1;
            }
        }
        self.uptime_pct = self.successful_checks as f64 / self.total_checks as f64 * 100.0;

        self.status = derive_status(
            self.kind,
            failure.is_some(),
            self.response_time_ms,
            self.error_rate,
            thresholds,
        );
        self.status
    }

    /// Operator recovery: nominal status and a clean error history.
    pub fn recover(&mut self, now: DateTime<Utc>) {
        self.status = TargetStatus::nominal(self.kind);
        self.error_rate = 0.0;
        self.error_count = 0;
        self.last_error = None;
        self.touch(now);
    }

    /// `last_check` never moves backwards, even if the clock does.
    fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.last_check {
            self.last_check = now;
        }
    }
}
