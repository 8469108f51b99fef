//! In-memory endpoint prober for health monitoring tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::directory::{
    domain::{EndpointUrl, ProbeStatus},
    ports::EndpointProber,
};

/// Scriptable in-memory endpoint prober.
///
/// Endpoints without a configured status report as unreachable, the same
/// outcome a real prober gives for a host that never answers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEndpointProber {
    statuses: Arc<RwLock<HashMap<String, ProbeStatus>>>,
}

impl InMemoryEndpointProber {
    /// Creates a prober with no configured endpoints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the status reported for an endpoint URL.
    pub fn set_status(&self, endpoint: impl Into<String>, status: ProbeStatus) {
        if let Ok(mut statuses) = self.statuses.write() {
            statuses.insert(endpoint.into(), status);
        }
    }
}

#[async_trait]
impl EndpointProber for InMemoryEndpointProber {
    async fn probe(&self, endpoint: &EndpointUrl) -> ProbeStatus {
        self.statuses
            .read()
            .ok()
            .and_then(|statuses| statuses.get(endpoint.as_str()).cloned())
            .unwrap_or_else(|| ProbeStatus::unreachable("no response configured for endpoint"))
    }
}
