//! Run command implementation

use crate::cli::RunArgs;
use crate::config::FleetwatchConfig;
use crate::logging::init_tracing;
use crate::monitor::{HealthMonitor, HttpProbe, LogSink, MonitorEvent};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

/// Load a config file if it exists, otherwise defaults, then apply env overrides.
pub fn load_config(path: &Path) -> Result<FleetwatchConfig, Box<dyn std::error::Error>> {
    let config = if path.exists() {
        FleetwatchConfig::load(Some(path))?
    } else {
        tracing::debug!(path = %path.display(), "Config file not found, using defaults");
        FleetwatchConfig::default()
    };
    Ok(config.with_env_overrides())
}

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &RunArgs,
) -> Result<FleetwatchConfig, Box<dyn std::error::Error>> {
    let mut config = load_config(&args.config)?;

    // CLI overrides (highest priority)
    if let Some(interval) = args.interval_ms {
        config.monitor.monitoring_interval_ms = interval;
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }
    if args.no_auto_recovery {
        config.monitor.auto_recovery = false;
    }
    if let Some(port) = args.metrics_port {
        config.metrics.enabled = true;
        config.metrics.port = port;
    }

    Ok(config)
}

/// Build a monitor over the configured targets, probed over HTTP.
pub fn build_monitor(
    config: &FleetwatchConfig,
) -> Result<Arc<HealthMonitor>, Box<dyn std::error::Error>> {
    let probe = HttpProbe::new(config.monitor.probe_timeout())?;
    let monitor = HealthMonitor::builder(config.monitor.clone(), Arc::new(probe))
        .targets(config.monitor_targets())
        .notifier(Arc::new(LogSink))
        .build()?;
    Ok(monitor)
}

/// Log every status update until cancelled. Alerts are logged by [`LogSink`].
async fn log_status_updates(monitor: Arc<HealthMonitor>, cancel_token: CancellationToken) {
    let mut events = monitor.subscribe();
    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => break,
            event = events.recv() => match event {
                Ok(MonitorEvent::StatusUpdate(status)) => {
                    tracing::info!(
                        overall = %status.overall,
                        nominal = status.nominal_count(),
                        total = status.targets.len(),
                        alerts = status.alerts.len(),
                        "Fleet status"
                    );
                    for recommendation in &status.recommendations {
                        tracing::info!(recommendation = %recommendation, "Recommendation");
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Status logger lagged behind monitor events");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for CTRL+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }

    cancel_token.cancel();
}

/// Main run command handler
pub async fn run_monitor(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load and merge configuration
    let config = load_config_with_overrides(&args)?;
    config.validate()?;

    // 2. Initialize tracing
    init_tracing(&config.logging)?;

    tracing::info!("Starting fleetwatch");
    tracing::debug!(?config, "Loaded configuration");
    if config.targets.is_empty() {
        tracing::warn!("No targets configured; the fleet will always grade excellent");
    }

    // 3. Metrics exporter
    if config.metrics.enabled {
        let addr = crate::metrics::setup_metrics(&config.metrics)?;
        tracing::info!(addr = %addr, "Prometheus metrics listening");
    }

    // 4. Build and start the monitor
    let monitor = build_monitor(&config)?;
    let cancel_token = CancellationToken::new();
    let logger = tokio::spawn(log_status_updates(
        Arc::clone(&monitor),
        cancel_token.clone(),
    ));
    monitor.initialize();

    // 5. Wait for a signal
    shutdown_signal(cancel_token.clone()).await;

    // 6. Cleanup
    monitor.shutdown().await;
    logger.await?;

    tracing::info!(ticks = monitor.ticks_completed(), "fleetwatch stopped");
    Ok(())
}
