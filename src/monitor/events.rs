//! Events published by the monitor and the notification sink contract.

use super::alert::{Alert, AlertSeverity};
use super::error::SinkError;
use super::snapshot::SystemStatus;
use async_trait::async_trait;
use std::sync::Arc;

/// Event published on the monitor's broadcast channel.
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// A tick completed and produced a new snapshot
    StatusUpdate(Arc<SystemStatus>),
    /// A new alert was raised
    Alert(Alert),
    /// An alert was resolved (explicitly, by expiry or because its condition cleared)
    AlertResolved(Alert),
}

impl MonitorEvent {
    /// Event name as exposed to subscribers.
    pub fn name(&self) -> &'static str {
        match self {
            MonitorEvent::StatusUpdate(_) => "statusUpdate",
            MonitorEvent::Alert(_) => "alert",
            MonitorEvent::AlertResolved(_) => "alertResolved",
        }
    }
}

/// Alert lifecycle change handed to a [`NotificationSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum AlertNotification {
    Raised(Alert),
    Resolved(Alert),
}

impl AlertNotification {
    pub fn alert(&self) -> &Alert {
        match self {
            AlertNotification::Raised(alert) | AlertNotification::Resolved(alert) => alert,
        }
    }
}

/// Receives alert notifications, e.g. to page an operator or persist alerts.
///
/// Delivery is fire-and-forget: each call runs on its own task and an error
/// is logged and dropped.
#[async_trait]
pub trait NotificationSink: Send + Sync + 'static {
    async fn notify(&self, notification: AlertNotification) -> Result<(), SinkError>;
}

/// Sink that writes alerts to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn notify(&self, notification: AlertNotification) -> Result<(), SinkError> {
        match &notification {
            AlertNotification::Raised(alert) => match alert.severity {
                AlertSeverity::Critical | AlertSeverity::High => tracing::error!(
                    alert_id = %alert.id,
                    component = %alert.component,
                    severity = %alert.severity,
                    "{}",
                    alert.message
                ),
                AlertSeverity::Medium | AlertSeverity::Low => tracing::warn!(
                    alert_id = %alert.id,
                    component = %alert.component,
                    severity = %alert.severity,
                    "{}",
                    alert.message
                ),
            },
            AlertNotification::Resolved(alert) => tracing::info!(
                alert_id = %alert.id,
                component = %alert.component,
                severity = %alert.severity,
                "Alert resolved"
            ),
        }
        Ok(())
    }
}
