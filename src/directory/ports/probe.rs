//! Endpoint probing port for health monitoring.

use crate::directory::domain::{EndpointUrl, ProbeStatus};
use async_trait::async_trait;

/// Endpoint liveness probe contract.
///
/// Probing is infallible by construction: transport failures are part of the
/// outcome, not an error path, so a sweep over many agents never aborts on
/// one bad endpoint.
#[async_trait]
pub trait EndpointProber: Send + Sync {
    /// Checks whether the endpoint answers, classifying the outcome.
    async fn probe(&self, endpoint: &EndpointUrl) -> ProbeStatus;
}
