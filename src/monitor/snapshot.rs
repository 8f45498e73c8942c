//! Immutable system status snapshots and the pure functions that build them.

use super::alert::Alert;
use super::config::AlertThresholds;
use super::state::{HealthRecord, TargetStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fleet-wide health grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallHealth {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl OverallHealth {
    /// Grade a fleet by the share of targets in their nominal state.
    ///
    /// Cutoffs are inclusive: 95% excellent, 90% good, 80% fair. An empty fleet
    /// has nothing unhealthy in it and grades excellent.
    ///
    /// ```
    /// use fleetwatch::monitor::OverallHealth;
    ///
    /// assert_eq!(OverallHealth::from_counts(19, 20), OverallHealth::Excellent);
    /// assert_eq!(OverallHealth::from_counts(2, 3), OverallHealth::Poor);
    /// ```
    pub fn from_counts(nominal: usize, total: usize) -> Self {
        if total == 0 {
            return OverallHealth::Excellent;
        }
        // Integer comparison keeps the cutoffs exact.
        let scaled = nominal as u128 * 100;
        let total = total as u128;
        if scaled >= total * 95 {
            OverallHealth::Excellent
        } else if scaled >= total * 90 {
            OverallHealth::Good
        } else if scaled >= total * 80 {
            OverallHealth::Fair
        } else {
            OverallHealth::Poor
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OverallHealth::Excellent => "excellent",
            OverallHealth::Good => "good",
            OverallHealth::Fair => "fair",
            OverallHealth::Poor => "poor",
        }
    }
}

impl std::fmt::Display for OverallHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the whole fleet produced by one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub overall: OverallHealth,
    /// Records in registration order
    pub targets: Vec<HealthRecord>,
    /// Alerts unresolved at snapshot time
    pub alerts: Vec<Alert>,
    pub recommendations: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl SystemStatus {
    pub fn build(
        targets: Vec<HealthRecord>,
        alerts: Vec<Alert>,
        thresholds: &AlertThresholds,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let nominal = targets.iter().filter(|r| r.status.is_nominal()).count();
        let overall = OverallHealth::from_counts(nominal, targets.len());
        let recommendations = recommendations(&targets, thresholds);
        Self {
            overall,
            targets,
            alerts,
            recommendations,
            timestamp,
        }
    }

    pub fn target(&self, target_id: &str) -> Option<&HealthRecord> {
        self.targets.iter().find(|r| r.target_id == target_id)
    }

    pub fn nominal_count(&self) -> usize {
        self.targets.iter().filter(|r| r.status.is_nominal()).count()
    }
}

/// Human-readable advice for the current records, one sentence per non-empty
/// category.
pub fn recommendations(records: &[HealthRecord], thresholds: &AlertThresholds) -> Vec<String> {
    let slow = ids_where(records, |r| r.response_time_ms > thresholds.response_time_ms);
    let erroring = ids_where(records, |r| r.error_rate > thresholds.error_rate);
    let critical = ids_where(records, |r| r.status == TargetStatus::Critical);
    let warning = ids_where(records, |r| r.status == TargetStatus::Warning);

    let mut out = Vec::new();
    if !slow.is_empty() {
        out.push(format!(
            "Investigate slow response times (over {}ms) for: {}",
            thresholds.response_time_ms,
            slow.join(", ")
        ));
    }
    if !erroring.is_empty() {
        out.push(format!(
            "Review error handling for targets with elevated error rates: {}",
            erroring.join(", ")
        ));
    }
    if !critical.is_empty() {
        out.push(format!(
            "Restore critical services immediately: {}",
            critical.join(", ")
        ));
    }
    if !warning.is_empty() {
        out.push(format!(
            "Monitor services in warning state: {}",
            warning.join(", ")
        ));
    }
    out
}

fn ids_where<F>(records: &[HealthRecord], predicate: F) -> Vec<&str>
where
    F: Fn(&HealthRecord) -> bool,
{
    records
        .iter()
        .filter(|r| predicate(r))
        .map(|r| r.target_id.as_str())
        .collect()
}
