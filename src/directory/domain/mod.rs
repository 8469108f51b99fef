//! Domain model for the agent directory.
//!
//! The directory domain models published agent records: validated identity
//! fields, protocol bindings, classification, domain-ownership verification,
//! and health probe outcomes. All infrastructure concerns are kept outside
//! the domain boundary.

mod capability;
mod endpoint;
mod error;
mod ids;
mod labels;
mod name;
mod probe;
mod protocol;
mod provider;
mod query;
mod record;
mod search;
mod stats;
mod status;
mod verification;

pub use capability::AgentCapability;
pub use endpoint::EndpointUrl;
pub use error::{
    DirectoryDomainError, ParseAgentStatusError, ParseProbeStatusError, ParseProtocolKindError,
};
pub use ids::{AgentId, OwnerRef};
pub use labels::TagList;
pub use name::{AgentDescription, AgentName};
pub use probe::{ProbeRecord, ProbeStatus};
pub use protocol::{ProtocolBindings, ProtocolKind};
pub use provider::AgentProvider;
pub use query::{PageBounds, RecordPage, RecordQuery};
pub use record::{AgentPatch, AgentRecord, NewAgentParams, PersistedAgentData};
pub use search::{SearchDocument, tokenize};
pub use stats::{CategoryCount, DirectoryStats};
pub use status::AgentStatus;
pub use verification::{ChallengeToken, DomainName, VerificationChallenge, VerificationState};
