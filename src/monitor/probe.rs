//! Probe collaborator contract and an HTTP implementation.

use super::error::ProbeError;
use super::target::Target;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Data returned by a single successful probe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub response_time_ms: u64,
    /// The target answered but flagged an error of its own
    #[serde(default)]
    pub error_occurred: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_pct: Option<f64>,
}

impl ProbeReport {
    pub fn ok(response_time_ms: u64) -> Self {
        Self {
            response_time_ms,
            ..Default::default()
        }
    }
}

/// Performs a health check against one target.
///
/// The monitor races every call against its own timeout and catches panics,
/// so implementations need not enforce either.
#[async_trait]
pub trait Probe: Send + Sync + 'static {
    async fn probe(&self, target: &Target) -> Result<ProbeReport, ProbeError>;
}

/// Body fields an HTTP health endpoint may report.
#[derive(Debug, Default, Deserialize)]
struct HealthBody {
    load: Option<f64>,
    availability_pct: Option<f64>,
    #[serde(default)]
    error: bool,
}

/// Probes targets with `GET <metadata.url>`.
///
/// Any 2xx response counts as success. If the body is JSON carrying `load`,
/// `availability_pct` or `error` fields they are forwarded; other bodies are
/// ignored.
pub struct HttpProbe {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProbeError::Other(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, timeout })
    }

    /// Use a preconfigured client (for testing).
    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    fn classify_error(&self, e: reqwest::Error) -> ProbeError {
        if e.is_timeout() {
            ProbeError::Timeout(self.timeout.as_millis() as u64)
        } else {
            ProbeError::Connection(e.to_string())
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn probe(&self, target: &Target) -> Result<ProbeReport, ProbeError> {
        let url = target
            .metadata
            .url
            .as_deref()
            .ok_or_else(|| ProbeError::Other(format!("target {} has no probe URL", target.id)))?;

        let start = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;
        let response_time_ms = start.elapsed().as_millis() as u64;

        if !response.status().is_success() {
            return Err(ProbeError::HttpStatus(response.status().as_u16()));
        }

        let body = response.text().await.unwrap_or_default();
        let fields: HealthBody = serde_json::from_str(&body).unwrap_or_else(|e| {
            tracing::trace!(target_id = %target.id, error = %e, "Health body is not JSON");
            HealthBody::default()
        });

        Ok(ProbeReport {
            response_time_ms,
            error_occurred: fields.error,
            load: fields.load,
            availability_pct: fields.availability_pct,
        })
    }
}
