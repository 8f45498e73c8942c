//! Target configuration

use crate::monitor::{Target, TargetKind, TargetMetadata};
use serde::{Deserialize, Serialize};

/// A monitored target as written in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TargetKind,
    /// URL probed by the HTTP probe
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub cost_per_1k_tokens: Option<f64>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl From<&TargetConfig> for Target {
    fn from(config: &TargetConfig) -> Self {
        Target::new(config.id.clone(), config.kind)
            .with_capabilities(config.capabilities.iter().cloned())
            .with_dependencies(config.dependencies.iter().cloned())
            .with_metadata(TargetMetadata {
                provider: config.provider.clone(),
                cost_per_1k_tokens: config.cost_per_1k_tokens,
                max_tokens: config.max_tokens,
                url: Some(config.url.clone()),
            })
    }
}
