//! Health monitoring and alerting for model endpoints and internal services.
//!
//! [`HealthMonitor`] polls every registered [`Target`] through a [`Probe`] on a
//! fixed interval, keeps one [`HealthRecord`] per target, grades the fleet into
//! a [`SystemStatus`] snapshot and manages the [`Alert`] lifecycle. Consumers
//! observe it through [`HealthMonitor::subscribe`] or the read accessors; the
//! only mutating operations are [`HealthMonitor::force_check`],
//! [`HealthMonitor::recover`] and [`HealthMonitor::resolve_alert`].
//!
//! # Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use fleetwatch::monitor::{
//!     HealthMonitor, MonitorConfig, Probe, ProbeError, ProbeReport, Target,
//! };
//! use std::sync::Arc;
//!
//! struct AlwaysUp;
//!
//! #[async_trait]
//! impl Probe for AlwaysUp {
//!     async fn probe(&self, _target: &Target) -> Result<ProbeReport, ProbeError> {
//!         Ok(ProbeReport::ok(120))
//!     }
//! }
//!
//! # async fn run() -> Result<(), fleetwatch::config::ConfigError> {
//! let monitor = HealthMonitor::builder(MonitorConfig::default(), Arc::new(AlwaysUp))
//!     .target(Target::model("gpt-4o"))
//!     .target(Target::service("vector-store"))
//!     .build()?;
//!
//! monitor.initialize();
//! let status = monitor.force_check().await;
//! println!("fleet is {}", status.overall);
//! monitor.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod alert;
mod clock;
mod config;
mod error;
mod events;
mod probe;
mod recovery;
mod snapshot;
mod state;
mod target;


pub use alert::*;
pub use clock::*;
pub use config::*;
pub use error::*;
pub use events::*;
pub use probe::*;
pub use recovery::*;
pub use snapshot::*;
pub use state::*;
pub use target::*;

use crate::config::ConfigError;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures::future::join_all;
use futures::FutureExt;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, RwLock};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Buffered events per subscriber before the slowest one starts lagging.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// What the previous tick saw for a target; alerts fire on changes to this.
#[derive(Debug, Clone, Copy)]
struct Observed {
    level: HealthLevel,
    availability_low: bool,
}

impl Observed {
    const NOMINAL: Observed = Observed {
        level: HealthLevel::Nominal,
        availability_low: false,
    };
}

/// Alert changes made by one detection pass, announced after the snapshot.
#[derive(Debug, Default)]
struct AlertChanges {
    raised: Vec<Alert>,
    resolved: Vec<Alert>,
}

struct Ticker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Builder for [`HealthMonitor`].
pub struct HealthMonitorBuilder {
    config: MonitorConfig,
    probe: Arc<dyn Probe>,
    targets: Vec<Target>,
    notifier: Option<Arc<dyn NotificationSink>>,
    recovery: Option<Arc<dyn RecoveryHook>>,
    clock: Arc<dyn Clock>,
}

impl HealthMonitorBuilder {
    pub fn target(mut self, target: Target) -> Self {
        self.targets.push(target);
        self
    }

    pub fn targets<I>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = Target>,
    {
        self.targets.extend(targets);
        self
    }

    /// Deliver raised and resolved alerts to `sink`.
    pub fn notifier(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.notifier = Some(sink);
        self
    }

    /// Hook invoked for failed targets when `auto_recovery` is enabled.
    pub fn recovery_hook(mut self, hook: Arc<dyn RecoveryHook>) -> Self {
        self.recovery = Some(hook);
        self
    }

    /// Replace the system clock (for testing).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validate the configuration and target set and build the monitor.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for invalid thresholds or intervals and
    /// empty target ids, `ConfigError::DuplicateTarget` for repeated ids.
    pub fn build(self) -> Result<Arc<HealthMonitor>, ConfigError> {
        self.config.validate()?;

        let mut seen = HashSet::new();
        for (i, target) in self.targets.iter().enumerate() {
            if target.id.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: format!("targets[{}].id", i),
                    message: "target id cannot be empty".to_string(),
                });
            }
            if !seen.insert(target.id.as_str()) {
                return Err(ConfigError::DuplicateTarget(target.id.clone()));
            }
        }

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let alerts = AlertBook::new(
            self.config.low_alert_ttl(),
            self.config.max_resolved_alerts,
        );

        Ok(Arc::new(HealthMonitor {
            config: self.config,
            targets: self.targets,
            records: DashMap::new(),
            last_observed: Mutex::new(HashMap::new()),
            alerts,
            snapshot: RwLock::new(None),
            probe: self.probe,
            notifier: self.notifier,
            recovery: self.recovery,
            clock: self.clock,
            events,
            initialized: OnceLock::new(),
            shut_down: AtomicBool::new(false),
            tick_guard: tokio::sync::Mutex::new(()),
            ticker: Mutex::new(None),
            ticks_completed: AtomicU64::new(0),
        }))
    }
}

/// Periodic health monitor and alerting engine.
///
/// Always handled through an `Arc`; the background ticker holds only a weak
/// reference, so dropping the last `Arc` also stops the loop.
pub struct HealthMonitor {
    config: MonitorConfig,
    /// Registered targets, in registration order
    targets: Vec<Target>,
    /// Live health state per target id
    records: DashMap<String, HealthRecord>,
    last_observed: Mutex<HashMap<String, Observed>>,
    alerts: AlertBook,
    /// Most recent completed snapshot
    snapshot: RwLock<Option<Arc<SystemStatus>>>,
    probe: Arc<dyn Probe>,
    notifier: Option<Arc<dyn NotificationSink>>,
    recovery: Option<Arc<dyn RecoveryHook>>,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<MonitorEvent>,
    /// Set once records are registered and the first snapshot is stored
    initialized: OnceLock<()>,
    shut_down: AtomicBool,
    /// Held for the whole duration of a tick
    tick_guard: tokio::sync::Mutex<()>,
    ticker: Mutex<Option<Ticker>>,
    ticks_completed: AtomicU64,
}

impl HealthMonitor {
    pub fn builder(config: MonitorConfig, probe: Arc<dyn Probe>) -> HealthMonitorBuilder {
        HealthMonitorBuilder {
            config,
            probe,
            targets: Vec::new(),
            notifier: None,
            recovery: None,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Subscribe to status updates and alert events.
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.events.subscribe()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get().is_some()
    }

    /// Whether the background ticker is alive.
    pub fn is_running(&self) -> bool {
        self.lock_ticker()
            .as_ref()
            .is_some_and(|t| !t.handle.is_finished())
    }

    /// Number of ticks completed so far (scheduled and forced).
    pub fn ticks_completed(&self) -> u64 {
        self.ticks_completed.load(Ordering::SeqCst)
    }

    /// Register all targets as nominal and start the periodic ticker.
    ///
    /// Idempotent: only the first call has any effect, and a monitor that has
    /// been shut down is never restarted. Concurrent callers return once the
    /// records are in place. Outside a Tokio runtime the records and first
    /// snapshot are still set up, but no ticker is started.
    pub fn initialize(self: &Arc<Self>) {
        if self.shut_down.load(Ordering::SeqCst) {
            return;
        }
        self.initialized.get_or_init(|| self.register_targets());
    }

    fn register_targets(self: &Arc<Self>) {
        let now = self.clock.now();
        {
            let mut observed = self.lock_observed();
            for target in &self.targets {
                self.records.insert(
                    target.id.clone(),
                    HealthRecord::new(target.id.clone(), target.kind, now),
                );
                observed.insert(target.id.clone(), Observed::NOMINAL);
            }
        }
        self.store_snapshot(self.build_snapshot(now));

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No Tokio runtime available, health monitor ticker not started");
            return;
        };
        self.start_ticker(&runtime);

        tracing::info!(
            targets = self.targets.len(),
            interval_ms = self.config.monitoring_interval_ms,
            timeout_ms = self.config.health_check_timeout_ms,
            "Health monitor started"
        );
    }

    fn start_ticker(self: &Arc<Self>, runtime: &tokio::runtime::Handle) {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let monitor = Arc::downgrade(self);
        let period = self.config.interval();

        let handle = runtime.spawn(async move {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        tracing::info!("Health monitor ticker stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        let Some(monitor) = monitor.upgrade() else {
                            break;
                        };
                        monitor.scheduled_tick().await;
                    }
                }
            }
        });

        *self.lock_ticker() = Some(Ticker { cancel, handle });
    }

    /// Stop the ticker. The last snapshot stays readable; no further ticks run.
    pub async fn shutdown(&self) {
        self.shut_down.store(true, Ordering::SeqCst);

        let ticker = self.lock_ticker().take();
        if let Some(ticker) = ticker {
            ticker.cancel.cancel();
            if let Err(e) = ticker.handle.await {
                tracing::warn!(error = %e, "Health monitor ticker ended abnormally");
            }
            tracing::info!("Health monitor stopped");
        }
    }

    /// Latest snapshot. Initializes the monitor on first use.
    ///
    /// Safe to call outside a Tokio runtime; the ticker then stays stopped.
    pub fn status(self: &Arc<Self>) -> Arc<SystemStatus> {
        self.initialize();
        self.latest_snapshot()
    }

    /// Current record for one target.
    pub fn health(&self, target_id: &str) -> Option<HealthRecord> {
        self.records.get(target_id).map(|r| r.value().clone())
    }

    /// Alerts filtered by resolution state.
    ///
    /// Expired low-severity alerts are resolved before the list is taken.
    pub fn alerts(&self, resolved: bool) -> Vec<Alert> {
        let expired = self.alerts.sweep_expired(self.clock.now());
        for alert in expired {
            self.announce_resolved(alert);
        }
        if resolved {
            self.alerts.resolved()
        } else {
            self.alerts.unresolved()
        }
    }

    /// Operator resolution of a single alert.
    pub fn resolve_alert(&self, alert_id: &str) -> Option<Alert> {
        let alert = self.alerts.resolve(alert_id, self.clock.now())?;
        self.announce_resolved(alert.clone());
        Some(alert)
    }

    /// Reset a target to its nominal state and clear its error history.
    ///
    /// Alerts tied to the target are left as they are. Returns `false` if the
    /// target is unknown (or the monitor was never initialized).
    pub fn recover(&self, target_id: &str) -> bool {
        let now = self.clock.now();
        let Some(mut record) = self.records.get_mut(target_id) else {
            return false;
        };
        let previous = record.status;
        record.recover(now);
        let status = record.status;
        drop(record);

        let mut observed = self.lock_observed();
        let availability_low = observed
            .get(target_id)
            .is_some_and(|o| o.availability_low);
        observed.insert(
            target_id.to_string(),
            Observed {
                level: HealthLevel::Nominal,
                availability_low,
            },
        );

        tracing::info!(
            target_id = target_id,
            old_status = %previous,
            new_status = %status,
            "Target recovered"
        );
        true
    }

    /// Run one tick now and return its snapshot.
    ///
    /// Waits for a tick already in progress instead of overlapping it. After
    /// shutdown no tick runs and the last snapshot is returned.
    pub async fn force_check(self: &Arc<Self>) -> Arc<SystemStatus> {
        self.initialize();
        if self.shut_down.load(Ordering::SeqCst) {
            return self.latest_snapshot();
        }
        let _guard = self.tick_guard.lock().await;
        self.run_tick().await
    }

    async fn scheduled_tick(&self) {
        let Ok(_guard) = self.tick_guard.try_lock() else {
            tracing::debug!("Previous tick still running, skipping scheduled tick");
            return;
        };
        self.run_tick().await;
    }

    /// One monitoring cycle. Never fails: internal errors and panics become a
    /// `"system"` alert and the partial state is published.
    async fn run_tick(&self) -> Arc<SystemStatus> {
        let snapshot = match AssertUnwindSafe(self.tick()).catch_unwind().await {
            Ok(snapshot) => snapshot,
            Err(panic) => {
                let failure = format!("tick panicked: {}", panic_message(&*panic));
                tracing::error!(error = %failure, "Health monitor tick failed");
                let now = self.clock.now();
                let raised = self.alerts.raise(
                    SYSTEM_COMPONENT,
                    AlertSeverity::High,
                    tick_failure_message(&failure),
                    now,
                );
                let snapshot = self.publish_snapshot(self.build_snapshot(now));
                if let Some(alert) = raised {
                    self.announce_raised(alert);
                }
                snapshot
            }
        };
        self.ticks_completed.fetch_add(1, Ordering::SeqCst);
        snapshot
    }

    async fn tick(&self) -> Arc<SystemStatus> {
        let expired = self.alerts.sweep_expired(self.clock.now());

        let probes = self.targets.iter().map(|target| async move {
            let outcome = self.probe_target(target).await;
            (target, outcome)
        });
        let outcomes = join_all(probes).await;

        let checked_at = self.clock.now();
        let mut first_error = None;
        for (target, outcome) in &outcomes {
            if let Err(e) = self.apply_outcome(target, outcome, checked_at) {
                first_error.get_or_insert(e);
            }
        }

        let records = self.collect_records();
        let overall = OverallHealth::from_counts(
            records.iter().filter(|r| r.status.is_nominal()).count(),
            records.len(),
        );
        let mut changes = self.detect_alerts(&records, overall, checked_at);
        match &first_error {
            Some(e) => {
                tracing::error!(error = %e, "Health monitor tick failed");
                changes.push_raised(self.alerts.raise(
                    SYSTEM_COMPONENT,
                    AlertSeverity::High,
                    tick_failure_message(&e.to_string()),
                    checked_at,
                ));
            }
            // A clean tick clears an earlier tick failure
            None => changes.push_resolved(self.alerts.resolve_condition(
                SYSTEM_COMPONENT,
                AlertSeverity::High,
                checked_at,
            )),
        }
        let mut resolved = expired;
        resolved.extend(changes.resolved);

        let snapshot = self.publish_snapshot(SystemStatus::build(
            records,
            self.alerts.unresolved(),
            &self.config.alert_thresholds,
            checked_at,
        ));
        for alert in resolved {
            self.announce_resolved(alert);
        }
        for alert in changes.raised {
            self.announce_raised(alert);
        }

        tracing::debug!(
            targets_checked = outcomes.len(),
            overall = %snapshot.overall,
            "Health check cycle completed"
        );

        if self.config.auto_recovery {
            self.auto_recover(&snapshot).await;
        }

        snapshot
    }

    /// Probe one target, enforcing the timeout and containing panics.
    async fn probe_target(&self, target: &Target) -> Result<ProbeReport, ProbeError> {
        if self.config.probe_jitter_ms > 0 {
            let delay = rand::thread_rng().gen_range(0..self.config.probe_jitter_ms);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let call = AssertUnwindSafe(self.probe.probe(target)).catch_unwind();
        let outcome = match tokio::time::timeout(self.config.probe_timeout(), call).await {
            Ok(Ok(result)) => result,
            Ok(Err(panic)) => Err(ProbeError::Panicked(panic_message(&*panic))),
            Err(_) => Err(ProbeError::Timeout(self.config.health_check_timeout_ms)),
        };

        match &outcome {
            Ok(report) => {
                metrics::histogram!("fleetwatch_probe_latency_seconds",
                    "target" => target.id.clone()
                )
                .record(report.response_time_ms as f64 / 1000.0);
            }
            Err(e) => {
                metrics::counter!("fleetwatch_probe_failures_total",
                    "target" => target.id.clone()
                )
                .increment(1);
                tracing::warn!(target_id = %target.id, error = %e, "Probe failed");
            }
        }
        outcome
    }

    fn apply_outcome(
        &self,
        target: &Target,
        outcome: &Result<ProbeReport, ProbeError>,
        now: DateTime<Utc>,
    ) -> Result<(), MonitorError> {
        let mut record = self
            .records
            .get_mut(&target.id)
            .ok_or_else(|| MonitorError::UnknownTarget(target.id.clone()))?;

        let previous = record.status;
        let status = record.apply_outcome(outcome, &self.config.alert_thresholds, now);
        if status != previous {
            tracing::info!(
                target_id = %target.id,
                old_status = %previous,
                new_status = %status,
                "Target status changed"
            );
        }
        Ok(())
    }

    /// Diff the new records against the previous tick and update the alert book.
    fn detect_alerts(
        &self,
        records: &[HealthRecord],
        overall: OverallHealth,
        now: DateTime<Utc>,
    ) -> AlertChanges {
        let thresholds = &self.config.alert_thresholds;
        let mut changes = AlertChanges::default();
        let mut observed = self.lock_observed();

        for record in records {
            let id = record.target_id.as_str();
            let previous = observed.get(id).copied().unwrap_or(Observed::NOMINAL);
            let level = record.status.level();
            let availability_low = record.availability_pct < thresholds.availability_pct;

            match level {
                HealthLevel::Failed if previous.level != HealthLevel::Failed => {
                    changes.push_raised(self.alerts.raise(
                        id,
                        AlertSeverity::High,
                        failure_message(record),
                        now,
                    ));
                }
                HealthLevel::Failed => {}
                HealthLevel::Impaired | HealthLevel::Nominal => {
                    changes.push_resolved(self.alerts.resolve_condition(
                        id,
                        AlertSeverity::High,
                        now,
                    ));
                }
            }

            if level == HealthLevel::Impaired && previous.level != HealthLevel::Impaired {
                changes.push_raised(self.alerts.raise(
                    id,
                    AlertSeverity::Low,
                    format!(
                        "{} is {}: response time {}ms exceeds {}ms",
                        id, record.status, record.response_time_ms, thresholds.response_time_ms
                    ),
                    now,
                ));
            }

            if availability_low && !previous.availability_low {
                changes.push_raised(self.alerts.raise(
                    id,
                    AlertSeverity::Medium,
                    format!(
                        "Availability of {} dropped to {:.1}% (threshold {:.1}%)",
                        id, record.availability_pct, thresholds.availability_pct
                    ),
                    now,
                ));
            } else if !availability_low {
                changes.push_resolved(self.alerts.resolve_condition(
                    id,
                    AlertSeverity::Medium,
                    now,
                ));
            }

            observed.insert(
                record.target_id.clone(),
                Observed {
                    level,
                    availability_low,
                },
            );
        }
        drop(observed);

        if overall == OverallHealth::Poor {
            let nominal = records.iter().filter(|r| r.status.is_nominal()).count();
            changes.push_raised(self.alerts.raise(
                SYSTEM_COMPONENT,
                AlertSeverity::Critical,
                format!(
                    "System health is poor: {} of {} targets nominal",
                    nominal,
                    records.len()
                ),
                now,
            ));
        } else {
            changes.push_resolved(self.alerts.resolve_condition(
                SYSTEM_COMPONENT,
                AlertSeverity::Critical,
                now,
            ));
        }

        changes
    }

    /// Ask the recovery hook to revive every failed target.
    async fn auto_recover(&self, snapshot: &SystemStatus) {
        let Some(hook) = &self.recovery else {
            return;
        };

        let timeout = self.config.recovery_timeout();
        let attempts = self
            .targets
            .iter()
            .filter(|t| snapshot.target(&t.id).is_some_and(|r| r.status.is_failed()))
            .map(|target| async move {
                let call = AssertUnwindSafe(hook.attempt(target)).catch_unwind();
                (target, tokio::time::timeout(timeout, call).await)
            });

        for (target, result) in join_all(attempts).await {
            match result {
                Ok(Ok(Ok(true))) => {
                    self.recover(&target.id);
                }
                Ok(Ok(Ok(false))) => {
                    tracing::debug!(target_id = %target.id, "Auto-recovery declined");
                }
                Ok(Ok(Err(e))) => {
                    tracing::warn!(target_id = %target.id, error = %e, "Auto-recovery failed");
                }
                Ok(Err(panic)) => {
                    tracing::warn!(
                        target_id = %target.id,
                        error = %panic_message(&*panic),
                        "Auto-recovery panicked"
                    );
                }
                Err(_) => {
                    tracing::warn!(
                        target_id = %target.id,
                        timeout_ms = self.config.recovery_timeout_ms,
                        "Auto-recovery timed out"
                    );
                }
            }
        }
    }

    fn collect_records(&self) -> Vec<HealthRecord> {
        self.targets
            .iter()
            .filter_map(|t| self.records.get(&t.id).map(|r| r.value().clone()))
            .collect()
    }

    fn build_snapshot(&self, now: DateTime<Utc>) -> SystemStatus {
        SystemStatus::build(
            self.collect_records(),
            self.alerts.unresolved(),
            &self.config.alert_thresholds,
            now,
        )
    }

    fn latest_snapshot(&self) -> Arc<SystemStatus> {
        let current = self
            .snapshot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        current.unwrap_or_else(|| Arc::new(self.build_snapshot(self.clock.now())))
    }

    fn store_snapshot(&self, status: SystemStatus) -> Arc<SystemStatus> {
        let snapshot = Arc::new(status);
        *self.snapshot.write().unwrap_or_else(|e| e.into_inner()) = Some(Arc::clone(&snapshot));

        metrics::gauge!("fleetwatch_targets_total").set(snapshot.targets.len() as f64);
        metrics::gauge!("fleetwatch_targets_nominal").set(snapshot.nominal_count() as f64);
        metrics::gauge!("fleetwatch_alerts_active").set(snapshot.alerts.len() as f64);
        snapshot
    }

    fn publish_snapshot(&self, status: SystemStatus) -> Arc<SystemStatus> {
        let snapshot = self.store_snapshot(status);
        // No subscribers is not an error
        let _ = self
            .events
            .send(MonitorEvent::StatusUpdate(Arc::clone(&snapshot)));
        snapshot
    }

    fn announce_raised(&self, alert: Alert) {
        metrics::counter!("fleetwatch_alerts_raised_total",
            "severity" => alert.severity.as_str()
        )
        .increment(1);
        tracing::info!(
            alert_id = %alert.id,
            component = %alert.component,
            severity = %alert.severity,
            "Alert raised"
        );
        let _ = self.events.send(MonitorEvent::Alert(alert.clone()));
        self.notify(AlertNotification::Raised(alert));
    }

    fn announce_resolved(&self, alert: Alert) {
        tracing::info!(
            alert_id = %alert.id,
            component = %alert.component,
            severity = %alert.severity,
            "Alert resolved"
        );
        let _ = self.events.send(MonitorEvent::AlertResolved(alert.clone()));
        self.notify(AlertNotification::Resolved(alert));
    }

    /// Hand a notification to the sink on its own task.
    fn notify(&self, notification: AlertNotification) {
        let Some(sink) = &self.notifier else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No runtime available, dropping alert notification");
            return;
        };
        let sink = Arc::clone(sink);
        runtime.spawn(async move {
            let alert_id = notification.alert().id.clone();
            if let Err(e) = sink.notify(notification).await {
                tracing::warn!(alert_id = %alert_id, error = %e, "Notification sink failed");
            }
        });
    }

    fn lock_observed(&self) -> std::sync::MutexGuard<'_, HashMap<String, Observed>> {
        self.last_observed.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_ticker(&self) -> std::sync::MutexGuard<'_, Option<Ticker>> {
        self.ticker.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl AlertChanges {
    fn push_raised(&mut self, alert: Option<Alert>) {
        self.raised.extend(alert);
    }

    fn push_resolved(&mut self, alert: Option<Alert>) {
        self.resolved.extend(alert);
    }
}

fn tick_failure_message(failure: &str) -> String {
    format!("Monitoring tick failed: {}", failure)
}

fn failure_message(record: &HealthRecord) -> String {
    let kind = match record.kind {
        TargetKind::Model => "Model",
        TargetKind::Service => "Service",
    };
    match &record.last_error {
        Some(error) => format!(
            "{} {} is {}: {}",
            kind, record.target_id, record.status, error
        ),
        None => format!(
            "{} {} is {}: error rate {:.2}",
            kind, record.target_id, record.status, record.error_rate
        ),
    }
}
