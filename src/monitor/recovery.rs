//! Auto-recovery collaborator.

use super::error::SinkError;
use super::target::Target;
use async_trait::async_trait;

/// Attempts to bring a failed target back, e.g. by restarting a service or
/// rotating a model credential.
///
/// Returning `Ok(true)` tells the monitor the target was recovered; the
/// monitor then resets its health record as if an operator had called
/// `recover`.
#[async_trait]
pub trait RecoveryHook: Send + Sync + 'static {
    async fn attempt(&self, target: &Target) -> Result<bool, SinkError>;
}
