//! HTTP endpoint probing via reqwest.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::directory::{
    domain::{EndpointUrl, ProbeStatus},
    ports::EndpointProber,
};

/// Timeout applied to each probe request.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Endpoint prober issuing HTTP `HEAD` requests.
///
/// `HEAD` keeps probes cheap for the probed service: liveness is judged
/// from the status line alone and no body is transferred.
#[derive(Debug, Clone)]
pub struct HttpEndpointProber {
    client: Client,
}

impl HttpEndpointProber {
    /// Creates a prober with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] when the underlying client cannot be
    /// constructed.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(DEFAULT_PROBE_TIMEOUT)
    }

    /// Creates a prober with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] when the underlying client cannot be
    /// constructed.
    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl EndpointProber for HttpEndpointProber {
    async fn probe(&self, endpoint: &EndpointUrl) -> ProbeStatus {
        match self.client.head(endpoint.as_str()).send().await {
            Ok(response) => ProbeStatus::from_status_code(response.status().as_u16()),
            Err(err) => ProbeStatus::unreachable(err.to_string()),
        }
    }
}
