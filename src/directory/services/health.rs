//! Service layer for endpoint health monitoring.
//!
//! Provides [`HealthMonitorService`] which probes agent endpoints on demand
//! and sweeps every active agent with bounded concurrency, recording each
//! outcome on the agent record.

use crate::directory::{
    domain::{AgentId, AgentRecord, ProbeRecord},
    ports::{AgentRepository, AgentRepositoryError, EndpointProber},
};
use futures::StreamExt;
use futures::stream;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Number of probes a sweep keeps in flight at once.
pub const DEFAULT_SWEEP_CONCURRENCY: usize = 8;

/// Tally of a completed health sweep.
///
/// Unreachable endpoints count as unhealthy; `checked` is always the sum of
/// the other two fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Number of active agents probed.
    pub checked: u64,
    /// Probes that returned a success status.
    pub healthy: u64,
    /// Probes that returned a failure status or no response at all.
    pub unhealthy: u64,
}

/// Service-level errors for health monitoring operations.
#[derive(Debug, Error)]
pub enum HealthMonitorServiceError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] AgentRepositoryError),
}

/// Result type for health monitoring service operations.
pub type HealthMonitorServiceResult<T> = Result<T, HealthMonitorServiceError>;

/// Endpoint liveness monitoring service.
///
/// Probe failures are outcomes, not errors: a refused connection or timeout
/// becomes a recorded probe status and never aborts the calling operation.
#[derive(Clone)]
pub struct HealthMonitorService<R, P, C>
where
    R: AgentRepository,
    P: EndpointProber,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    prober: Arc<P>,
    clock: Arc<C>,
    concurrency: usize,
}

impl<R, P, C> HealthMonitorService<R, P, C>
where
    R: AgentRepository,
    P: EndpointProber,
    C: Clock + Send + Sync,
{
    /// Creates a new health monitor with the default sweep concurrency.
    #[must_use]
    pub const fn new(repository: Arc<R>, prober: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            repository,
            prober,
            clock,
            concurrency: DEFAULT_SWEEP_CONCURRENCY,
        }
    }

    /// Sets how many probes a sweep keeps in flight at once.
    ///
    /// Values below 1 are treated as 1.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Probes a single agent's endpoint and records the outcome.
    ///
    /// Returns the updated record; its last-probe sub-record carries the
    /// fresh status and timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`HealthMonitorServiceError::Repository`] when the agent is
    /// not found or persistence fails.
    pub async fn ping(&self, id: AgentId) -> HealthMonitorServiceResult<AgentRecord> {
        let record = self.find_by_id_or_error(id).await?;
        let status = self.prober.probe(record.endpoint()).await;
        let probe = ProbeRecord::new(status, self.clock.utc());
        self.repository
            .record_probe(id, &probe)
            .await?
            .ok_or_else(|| AgentRepositoryError::NotFound(id).into())
    }

    /// Probes every active agent and records each outcome.
    ///
    /// Probes run concurrently, bounded by the configured concurrency so a
    /// large directory never opens unbounded simultaneous connections. One
    /// agent's timeout or failure does not delay or cancel another's probe.
    /// A probe whose outcome cannot be persisted still counts in the report.
    ///
    /// # Errors
    ///
    /// Returns [`HealthMonitorServiceError::Repository`] when the active
    /// agent listing fails.
    pub async fn sweep(&self) -> HealthMonitorServiceResult<SweepReport> {
        let agents = self.repository.list_active().await?;
        tracing::info!(agents = agents.len(), "health sweep started");

        let in_flight = self.concurrency.max(1);
        let outcomes: Vec<bool> = stream::iter(agents)
            .map(|record| self.probe_and_record(record))
            .buffer_unordered(in_flight)
            .collect()
            .await;

        let mut report = SweepReport::default();
        for healthy in outcomes {
            report.checked += 1;
            if healthy {
                report.healthy += 1;
            } else {
                report.unhealthy += 1;
            }
        }

        tracing::info!(
            checked = report.checked,
            healthy = report.healthy,
            unhealthy = report.unhealthy,
            "health sweep finished"
        );
        Ok(report)
    }

    async fn probe_and_record(&self, record: AgentRecord) -> bool {
        let status = self.prober.probe(record.endpoint()).await;
        let healthy = status.is_healthy();
        let probe = ProbeRecord::new(status, self.clock.utc());

        match self.repository.record_probe(record.id(), &probe).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::warn!(agent_id = %record.id(), "agent deleted during health sweep");
            }
            Err(err) => {
                tracing::warn!(
                    agent_id = %record.id(),
                    error = %err,
                    "failed to persist probe outcome"
                );
            }
        }
        healthy
    }

    async fn find_by_id_or_error(&self, id: AgentId) -> HealthMonitorServiceResult<AgentRecord> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AgentRepositoryError::NotFound(id).into())
    }
}
