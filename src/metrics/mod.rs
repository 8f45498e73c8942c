//! Prometheus export of monitor metrics.
//!
//! The monitor records through the `metrics` facade; this module installs the
//! Prometheus recorder and its scrape endpoint.
//!
//! # Metrics
//!
//! - `fleetwatch_probe_latency_seconds` (histogram, `target`)
//! - `fleetwatch_probe_failures_total` (counter, `target`)
//! - `fleetwatch_alerts_raised_total` (counter, `severity`)
//! - `fleetwatch_targets_total`, `fleetwatch_targets_nominal`,
//!   `fleetwatch_alerts_active` (gauges)

use crate::config::MetricsConfig;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::net::{IpAddr, SocketAddr};

/// Probe latency buckets in seconds.
const LATENCY_BUCKETS: &[f64] = &[0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 2.5, 5.0, 10.0, 30.0];

/// Builder with fleetwatch's histogram buckets applied.
pub fn prometheus_builder() -> Result<PrometheusBuilder, Box<dyn std::error::Error>> {
    let builder = PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full("fleetwatch_probe_latency_seconds".to_string()),
        LATENCY_BUCKETS,
    )?;
    Ok(builder)
}

/// Install the global recorder and start the scrape listener.
///
/// Must be called within a Tokio runtime.
pub fn setup_metrics(config: &MetricsConfig) -> Result<SocketAddr, Box<dyn std::error::Error>> {
    let ip: IpAddr = config
        .host
        .parse()
        .map_err(|e| format!("invalid metrics host '{}': {}", config.host, e))?;
    let addr = SocketAddr::new(ip, config.port);

    prometheus_builder()?.with_http_listener(addr).install()?;
    describe_metrics();

    Ok(addr)
}

fn describe_metrics() {
    metrics::describe_histogram!(
        "fleetwatch_probe_latency_seconds",
        metrics::Unit::Seconds,
        "Latency of successful probes"
    );
    metrics::describe_counter!(
        "fleetwatch_probe_failures_total",
        "Probes that failed, timed out or panicked"
    );
    metrics::describe_counter!("fleetwatch_alerts_raised_total", "Alerts raised");
    metrics::describe_gauge!("fleetwatch_targets_total", "Registered targets");
    metrics::describe_gauge!(
        "fleetwatch_targets_nominal",
        "Targets in their nominal state"
    );
    metrics::describe_gauge!("fleetwatch_alerts_active", "Unresolved alerts");
}
