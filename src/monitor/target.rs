//! Monitored targets: model endpoints and internal services.

use serde::{Deserialize, Serialize};

/// What kind of entity a target is.
///
/// The kind selects the status vocabulary used for the target
/// (`active/degraded/error` for models, `healthy/warning/critical` for services).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// A remote AI model endpoint
    Model,
    /// An internal service the fleet depends on
    Service,
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetKind::Model => write!(f, "model"),
            TargetKind::Service => write!(f, "service"),
        }
    }
}

/// Static, informational metadata attached to a target at registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetMetadata {
    /// Model provider (e.g. "openrouter", "anthropic")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Cost in USD per 1k tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_per_1k_tokens: Option<f64>,
    /// Maximum tokens accepted per request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Probe URL, used by [`HttpProbe`](super::HttpProbe)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A monitored entity. Immutable once handed to the monitor.
///
/// # Examples
///
/// ```
/// use fleetwatch::monitor::{Target, TargetKind};
///
/// let target = Target::model("gpt-4o").with_capabilities(["chat", "vision"]);
/// assert_eq!(target.kind, TargetKind::Model);
/// assert_eq!(target.capabilities, vec!["chat", "vision"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Unique key
    pub id: String,
    pub kind: TargetKind,
    /// Ordered capability list
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Ordered dependency list (ids of other targets or external systems)
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub metadata: TargetMetadata,
}

impl Target {
    pub fn new(id: impl Into<String>, kind: TargetKind) -> Self {
        Self {
            id: id.into(),
            kind,
            capabilities: Vec::new(),
            dependencies: Vec::new(),
            metadata: TargetMetadata::default(),
        }
    }

    /// Shorthand for a model target.
    pub fn model(id: impl Into<String>) -> Self {
        Self::new(id, TargetKind::Model)
    }

    /// Shorthand for a service target.
    pub fn service(id: impl Into<String>) -> Self {
        Self::new(id, TargetKind::Service)
    }

    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = capabilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_metadata(mut self, metadata: TargetMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.metadata.url = Some(url.into());
        self
    }
}
