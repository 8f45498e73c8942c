//! Check command implementation

use crate::cli::output::{format_status_json, format_status_pretty};
use crate::cli::run::{build_monitor, load_config};
use crate::cli::CheckArgs;

/// Handle `fleetwatch check`: probe every target once and render the snapshot.
pub async fn handle_check(args: &CheckArgs) -> Result<String, Box<dyn std::error::Error>> {
    let mut config = load_config(&args.config)?;
    if let Some(timeout) = args.timeout_ms {
        config.monitor.health_check_timeout_ms = timeout;
    }
    // A single tick: no background loop, no recovery attempts
    config.monitor.auto_recovery = false;
    config.validate()?;

    let monitor = build_monitor(&config)?;
    let status = monitor.force_check().await;
    monitor.shutdown().await;

    if args.json {
        Ok(format_status_json(&status)?)
    } else {
        Ok(format_status_pretty(&status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_check_without_targets_is_excellent() {
        let args = CheckArgs {
            json: true,
            timeout_ms: None,
            config: PathBuf::from("/nonexistent/fleetwatch.toml"),
        };
        let output = handle_check(&args).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["overall"], "excellent");
        assert_eq!(parsed["targets"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_check_rejects_zero_timeout() {
        let args = CheckArgs {
            json: false,
            timeout_ms: Some(0),
            config: PathBuf::from("/nonexistent/fleetwatch.toml"),
        };
        let err = handle_check(&args).await.unwrap_err();
        assert!(err.to_string().contains("health_check_timeout_ms"));
    }
}
