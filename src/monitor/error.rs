//! Error types for health monitoring.

use thiserror::Error;

/// Why a single probe failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// Probe did not complete within the configured timeout
    #[error("probe timed out after {0}ms")]
    Timeout(u64),

    /// Connection failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// Target answered with a non-success HTTP status
    #[error("HTTP error: {0}")]
    HttpStatus(u16),

    /// Probe completed but the target reported an error
    #[error("target reported an error")]
    Reported,

    /// The probe future panicked
    #[error("probe panicked: {0}")]
    Panicked(String),

    /// Any other probe failure
    #[error("{0}")]
    Other(String),
}

/// Internal monitor errors. Never surfaced to callers; converted into
/// `"system"` alerts by the tick loop.
#[derive(Debug, Clone, Error)]
pub enum MonitorError {
    #[error("no health record for target: {0}")]
    UnknownTarget(String),
}

/// Failure reported by a notification sink or recovery hook.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct SinkError(pub String);

impl From<String> for SinkError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for SinkError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

/// Render a panic payload as text.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
