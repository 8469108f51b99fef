//! Shared world state for agent directory BDD scenarios.

use std::sync::Arc;

use agora::directory::{
    adapters::memory::{
        InMemoryAgentRepository, InMemoryEndpointProber, InMemorySearchIndex, InMemoryTxtResolver,
    },
    domain::{AgentRecord, OwnerRef, RecordPage},
    services::{
        AgentRegistryService, AgentRegistryServiceError, ConfirmOutcome,
        DomainVerificationService, HealthMonitorService, InitiatedVerification,
        RegisterAgentRequest, RegistryWrite, SweepReport,
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Registry service type used by the BDD world.
pub type TestRegistryService =
    AgentRegistryService<InMemoryAgentRepository, InMemorySearchIndex, DefaultClock>;

/// Verification service type used by the BDD world.
pub type TestVerificationService =
    DomainVerificationService<InMemoryAgentRepository, InMemoryTxtResolver, DefaultClock>;

/// Health monitor type used by the BDD world.
pub type TestHealthService =
    HealthMonitorService<InMemoryAgentRepository, InMemoryEndpointProber, DefaultClock>;

/// Pending agent specification before registration.
pub struct PendingAgent {
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
}

/// Scenario world for agent directory behaviour tests.
pub struct DirectoryWorld {
    /// The registry service under test.
    pub registry: TestRegistryService,
    /// The verification service under test.
    pub verification: TestVerificationService,
    /// The health monitor under test.
    pub health: TestHealthService,
    /// Scriptable DNS resolver backing the verification service.
    pub resolver: Arc<InMemoryTxtResolver>,
    /// Scriptable prober backing the health monitor.
    pub prober: Arc<InMemoryEndpointProber>,
    /// Owner reference used for scenario registrations.
    pub owner: OwnerRef,
    /// Agents queued for registration.
    pub pending_agents: Vec<PendingAgent>,
    /// Last successfully registered agent.
    pub last_registered: Option<AgentRecord>,
    /// Result of the last search call.
    pub last_search: Option<RecordPage>,
    /// Result of the last update attempt.
    pub last_update_result: Option<Result<RegistryWrite, AgentRegistryServiceError>>,
    /// Challenge issued by the last verification initiation.
    pub last_challenge: Option<InitiatedVerification>,
    /// Outcome of the last confirmation attempt.
    pub last_confirm_outcome: Option<ConfirmOutcome>,
    /// Report of the last health sweep.
    pub last_sweep: Option<SweepReport>,
}

impl DirectoryWorld {
    /// Creates a world with empty pending scenario state.
    #[must_use]
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryAgentRepository::new());
        let index = Arc::new(InMemorySearchIndex::new());
        let resolver = Arc::new(InMemoryTxtResolver::new());
        let prober = Arc::new(InMemoryEndpointProber::new());
        let clock = Arc::new(DefaultClock);

        let registry = AgentRegistryService::new(
            Arc::clone(&repository),
            Arc::clone(&index),
            Arc::clone(&clock),
        );
        let verification = DomainVerificationService::new(
            Arc::clone(&repository),
            Arc::clone(&resolver),
            Arc::clone(&clock),
        );
        let health = HealthMonitorService::new(
            Arc::clone(&repository),
            Arc::clone(&prober),
            Arc::clone(&clock),
        );

        Self {
            registry,
            verification,
            health,
            resolver,
            prober,
            owner: OwnerRef::new(),
            pending_agents: Vec::new(),
            last_registered: None,
            last_search: None,
            last_update_result: None,
            last_challenge: None,
            last_confirm_outcome: None,
            last_sweep: None,
        }
    }
}

impl Default for DirectoryWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DirectoryWorld {
    DirectoryWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Builds a registration request from a name, description, and endpoint.
pub fn build_request(name: &str, description: &str, endpoint: &str) -> RegisterAgentRequest {
    RegisterAgentRequest::new(name, description, endpoint)
}

/// Derives a deterministic endpoint URL from an agent name.
pub fn endpoint_for(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("https://{slug}.example.com")
}
