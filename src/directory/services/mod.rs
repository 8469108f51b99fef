//! Application services for agent registration, discovery, verification,
//! and health monitoring.

mod health;
mod import;
mod registry;
mod verification;

pub use health::{
    DEFAULT_SWEEP_CONCURRENCY, HealthMonitorService, HealthMonitorServiceError, SweepReport,
};
pub use import::{
    AgentCard, CardAuthentication, CardProvider, CardSkill, registration_from_card,
};
pub use registry::{
    AgentRegistryService, AgentRegistryServiceError, RegisterAgentRequest, RegistryWrite,
    SearchAgentsRequest, SearchIndexSync, UpdateAgentRequest,
};
pub use verification::{
    ConfirmOutcome, DnsTxtInstructions, DomainVerificationService,
    DomainVerificationServiceError, InitiatedVerification,
};
