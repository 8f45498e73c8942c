//! Shared test utilities for fleetwatch integration tests.
//!
//! Provides a scriptable probe, a collecting notification sink and monitor
//! builders to reduce duplication across test files.

#![allow(dead_code)]

use async_trait::async_trait;
use fleetwatch::monitor::{
    AlertNotification, HealthMonitor, MonitorConfig, NotificationSink, Probe, ProbeError,
    ProbeReport, SinkError, Target,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

// =============================================================================
// Probes
// =============================================================================

/// Probe answering from a per-target table. Unknown targets answer 100ms.
#[derive(Default)]
pub struct TableProbe {
    table: Mutex<HashMap<String, Result<ProbeReport, ProbeError>>>,
}

impl TableProbe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, target_id: &str, outcome: Result<ProbeReport, ProbeError>) {
        self.table
            .lock()
            .unwrap()
            .insert(target_id.to_string(), outcome);
    }

    pub fn latency(&self, target_id: &str, ms: u64) {
        self.respond(target_id, Ok(ProbeReport::ok(ms)));
    }

    pub fn fail(&self, target_id: &str) {
        self.respond(
            target_id,
            Err(ProbeError::Connection("connection refused".to_string())),
        );
    }
}

#[async_trait]
impl Probe for TableProbe {
    async fn probe(&self, target: &Target) -> Result<ProbeReport, ProbeError> {
        self.table
            .lock()
            .unwrap()
            .get(&target.id)
            .cloned()
            .unwrap_or(Ok(ProbeReport::ok(100)))
    }
}

// =============================================================================
// Sinks
// =============================================================================

/// Sink forwarding every notification to a channel.
pub struct CollectingSink {
    tx: mpsc::UnboundedSender<AlertNotification>,
}

impl CollectingSink {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<AlertNotification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

#[async_trait]
impl NotificationSink for CollectingSink {
    async fn notify(&self, notification: AlertNotification) -> Result<(), SinkError> {
        self.tx
            .send(notification)
            .map_err(|e| SinkError(e.to_string()))
    }
}

/// Receive `count` notifications or panic after a second.
pub async fn recv_notifications(
    rx: &mut mpsc::UnboundedReceiver<AlertNotification>,
    count: usize,
) -> Vec<AlertNotification> {
    let mut out = Vec::with_capacity(count);
    while out.len() < count {
        let n = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out waiting for notification")
            .expect("sink channel closed");
        out.push(n);
    }
    out
}

// =============================================================================
// Monitor Builders
// =============================================================================

/// Config with a long interval so only forced ticks run.
pub fn manual_config() -> MonitorConfig {
    MonitorConfig {
        monitoring_interval_ms: 3_600_000,
        auto_recovery: false,
        ..Default::default()
    }
}

/// Two models and two services, in that order.
pub fn standard_fleet() -> Vec<Target> {
    vec![
        Target::model("claude-sonnet").with_capabilities(["chat", "code"]),
        Target::model("gpt-4o").with_capabilities(["chat", "vision"]),
        Target::service("database"),
        Target::service("vector-store").with_dependencies(["database"]),
    ]
}

pub fn build_monitor(probe: Arc<TableProbe>, targets: Vec<Target>) -> Arc<HealthMonitor> {
    HealthMonitor::builder(manual_config(), probe)
        .targets(targets)
        .build()
        .unwrap()
}
