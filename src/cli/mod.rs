//! CLI module for fleetwatch
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `run` - Monitor the configured targets until interrupted
//! - `check` - Probe every target once and print the fleet status
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Write a starter config, then monitor with it
//! fleetwatch config init
//! fleetwatch run
//!
//! # One-off check as JSON
//! fleetwatch check --json
//! ```

pub mod check;
pub mod completions;
pub mod config;
pub mod output;
pub mod run;

pub use completions::handle_completions;
pub use config::handle_config_init;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// fleetwatch - health monitoring and alerting for AI model endpoints and services
#[derive(Parser, Debug)]
#[command(
    name = "fleetwatch",
    version,
    about = "Health monitoring and alerting for AI model endpoints and services"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Monitor targets until interrupted
    Run(RunArgs),
    /// Probe every target once and print the result
    Check(CheckArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "fleetwatch.toml")]
    pub config: PathBuf,

    /// Override the monitoring interval in milliseconds
    #[arg(short, long)]
    pub interval_ms: Option<u64>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Disable automatic recovery of failed targets
    #[arg(long)]
    pub no_auto_recovery: bool,

    /// Serve Prometheus metrics on this port
    #[arg(long, env = "FLEETWATCH_METRICS_PORT")]
    pub metrics_port: Option<u16>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Override the per-probe timeout in milliseconds
    #[arg(short, long)]
    pub timeout_ms: Option<u64>,

    /// Path to configuration file
    #[arg(short, long, default_value = "fleetwatch.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "fleetwatch.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parse_run_defaults() {
        let cli = Cli::try_parse_from(["fleetwatch", "run"]).unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.config, PathBuf::from("fleetwatch.toml"));
                assert!(args.interval_ms.is_none());
                assert!(!args.no_auto_recovery);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_run_with_overrides() {
        let cli = Cli::try_parse_from([
            "fleetwatch",
            "run",
            "-c",
            "custom.toml",
            "--interval-ms",
            "5000",
            "--no-auto-recovery",
        ])
        .unwrap();
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.config, PathBuf::from("custom.toml"));
                assert_eq!(args.interval_ms, Some(5000));
                assert!(args.no_auto_recovery);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_check_json() {
        let cli = Cli::try_parse_from(["fleetwatch", "check", "--json"]).unwrap();
        match cli.command {
            Commands::Check(args) => {
                assert!(args.json);
                assert!(args.timeout_ms.is_none());
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_parse_config_init_force() {
        let cli = Cli::try_parse_from(["fleetwatch", "config", "init", "--force"]).unwrap();
        match cli.command {
            Commands::Config(ConfigCommands::Init(args)) => {
                assert!(args.force);
                assert_eq!(args.output, PathBuf::from("fleetwatch.toml"));
            }
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_cli_rejects_invalid_interval() {
        assert!(Cli::try_parse_from(["fleetwatch", "run", "--interval-ms", "soon"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
