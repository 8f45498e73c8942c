//! Alert records and the store that owns their lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::RwLock;
use uuid::Uuid;

/// Component name used for fleet-wide alerts.
pub const SYSTEM_COMPONENT: &str = "system";

/// Alert severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertSeverity::Low => "low",
            AlertSeverity::Medium => "medium",
            AlertSeverity::High => "high",
            AlertSeverity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded anomaly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    /// Target id or [`SYSTEM_COMPONENT`]
    pub component: String,
    pub severity: AlertSeverity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub resolved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Alert {
    pub fn new(
        component: impl Into<String>,
        severity: AlertSeverity,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            component: component.into(),
            severity,
            message: message.into(),
            timestamp,
            resolved: false,
            resolved_at: None,
        }
    }

    fn resolve(&mut self, now: DateTime<Utc>) {
        self.resolved = true;
        self.resolved_at = Some(now);
    }
}

/// Owns every alert the monitor has raised.
///
/// Unresolved alerts are unique per (component, severity). Resolved alerts are
/// kept as history up to a fixed capacity, oldest evicted first.
pub struct AlertBook {
    active: RwLock<Vec<Alert>>,
    resolved: RwLock<VecDeque<Alert>>,
    low_ttl: chrono::Duration,
    history_capacity: usize,
}

impl AlertBook {
    pub fn new(low_ttl: chrono::Duration, history_capacity: usize) -> Self {
        Self {
            active: RwLock::new(Vec::new()),
            resolved: RwLock::new(VecDeque::with_capacity(history_capacity.min(1024))),
            low_ttl,
            history_capacity,
        }
    }

    /// Record a new alert unless an unresolved one with the same component and
    /// severity already exists. Returns the alert if it was recorded.
    pub fn raise(
        &self,
        component: &str,
        severity: AlertSeverity,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Option<Alert> {
        let mut active = self.active.write().unwrap_or_else(|e| e.into_inner());
        if active
            .iter()
            .any(|a| a.component == component && a.severity == severity)
        {
            return None;
        }
        let alert = Alert::new(component, severity, message, now);
        active.push(alert.clone());
        Some(alert)
    }

    /// Resolve one alert by id.
    pub fn resolve(&self, alert_id: &str, now: DateTime<Utc>) -> Option<Alert> {
        self.take_where(now, |a| a.id == alert_id).into_iter().next()
    }

    /// Resolve the unresolved alert for `component` at `severity`, if any.
    pub fn resolve_condition(
        &self,
        component: &str,
        severity: AlertSeverity,
        now: DateTime<Utc>,
    ) -> Option<Alert> {
        self.take_where(now, |a| a.component == component && a.severity == severity)
            .into_iter()
            .next()
    }

    /// Resolve low-severity alerts older than the configured TTL.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> Vec<Alert> {
        let ttl = self.low_ttl;
        self.take_where(now, |a| {
            a.severity == AlertSeverity::Low && now - a.timestamp >= ttl
        })
    }

    /// Unresolved alerts, oldest first.
    pub fn unresolved(&self) -> Vec<Alert> {
        self.active
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Retained resolved alerts, oldest resolution first.
    pub fn resolved(&self) -> Vec<Alert> {
        self.resolved
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    fn take_where<F>(&self, now: DateTime<Utc>, predicate: F) -> Vec<Alert>
    where
        F: Fn(&Alert) -> bool,
    {
        let mut taken = Vec::new();
        {
            let mut active = self.active.write().unwrap_or_else(|e| e.into_inner());
            let mut i = 0;
            while i < active.len() {
                if predicate(&active[i]) {
                    let mut alert = active.remove(i);
                    alert.resolve(now);
                    taken.push(alert);
                } else {
                    i += 1;
                }
            }
        }

        if !taken.is_empty() && self.history_capacity > 0 {
            let mut resolved = self.resolved.write().unwrap_or_else(|e| e.into_inner());
            for alert in &taken {
                if resolved.len() >= self.history_capacity {
                    resolved.pop_front();
                }
                resolved.push_back(alert.clone());
            }
        }
        taken
    }
}
