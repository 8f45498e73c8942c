//! fleetwatch - health monitoring and alerting for AI model endpoints and services
//!
//! The [`monitor`] module holds the engine; [`config`], [`logging`] and
//! [`metrics`] provide the ambient setup used by the `fleetwatch` binary.

pub mod cli;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod monitor;
