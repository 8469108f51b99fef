//! Agent record aggregate root.

use super::{
    AgentCapability, AgentDescription, AgentId, AgentName, AgentProvider, AgentStatus, EndpointUrl,
    OwnerRef, ProbeRecord, ProtocolBindings, TagList, VerificationChallenge, VerificationState,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Agent record aggregate root.
///
/// One record describes one published agent: its identity, protocol
/// bindings, classification, verification state, and the outcome of the
/// latest health probe. The owning credential reference gates every
/// mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    id: AgentId,
    owner: OwnerRef,
    name: AgentName,
    description: AgentDescription,
    endpoint: EndpointUrl,
    version: Option<String>,
    provider: Option<AgentProvider>,
    capabilities: Vec<AgentCapability>,
    categories: Vec<String>,
    tags: TagList,
    protocols: ProtocolBindings,
    auth_schemes: Vec<String>,
    status: AgentStatus,
    verification: VerificationState,
    last_probe: Option<ProbeRecord>,
    registered_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Validated field bundle for registering a new agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAgentParams {
    /// Display name.
    pub name: AgentName,
    /// Free-text description.
    pub description: AgentDescription,
    /// Primary service endpoint.
    pub endpoint: EndpointUrl,
    /// Version string published by the agent, if any.
    pub version: Option<String>,
    /// Provider organization metadata, if any.
    pub provider: Option<AgentProvider>,
    /// Advertised capabilities.
    pub capabilities: Vec<AgentCapability>,
    /// Category slugs the agent files itself under.
    pub categories: Vec<String>,
    /// Free-form tags.
    pub tags: TagList,
    /// Protocol bindings.
    pub protocols: ProtocolBindings,
    /// Authentication schemes the agent accepts.
    pub auth_schemes: Vec<String>,
}

/// Parameter object for reconstructing a persisted agent record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAgentData {
    /// Persisted agent identifier.
    pub id: AgentId,
    /// Persisted owning credential reference.
    pub owner: OwnerRef,
    /// Persisted display name.
    pub name: AgentName,
    /// Persisted description.
    pub description: AgentDescription,
    /// Persisted service endpoint.
    pub endpoint: EndpointUrl,
    /// Persisted version string.
    pub version: Option<String>,
    /// Persisted provider metadata.
    pub provider: Option<AgentProvider>,
    /// Persisted capabilities.
    pub capabilities: Vec<AgentCapability>,
    /// Persisted category slugs.
    pub categories: Vec<String>,
    /// Persisted tags.
    pub tags: TagList,
    /// Persisted protocol bindings.
    pub protocols: ProtocolBindings,
    /// Persisted authentication schemes.
    pub auth_schemes: Vec<String>,
    /// Persisted lifecycle status.
    pub status: AgentStatus,
    /// Persisted verification state.
    pub verification: VerificationState,
    /// Persisted latest probe outcome.
    pub last_probe: Option<ProbeRecord>,
    /// Persisted registration timestamp.
    pub registered_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Partial update to an agent record.
///
/// Absent fields keep their stored value. Present fields replace it, except
/// `provider`, which merges field by field into any existing provider. No
/// field can be cleared back to absent through a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentPatch {
    /// Replacement display name.
    pub name: Option<AgentName>,
    /// Replacement description.
    pub description: Option<AgentDescription>,
    /// Replacement service endpoint.
    pub endpoint: Option<EndpointUrl>,
    /// Replacement version string.
    pub version: Option<String>,
    /// Provider fields to merge.
    pub provider: Option<AgentProvider>,
    /// Replacement capability list.
    pub capabilities: Option<Vec<AgentCapability>>,
    /// Replacement category slugs.
    pub categories: Option<Vec<String>>,
    /// Replacement tags.
    pub tags: Option<TagList>,
    /// Replacement A2A agent card URL.
    pub a2a_agent_card_url: Option<EndpointUrl>,
    /// Replacement MCP server URL.
    pub mcp_server_url: Option<EndpointUrl>,
    /// Replacement authentication schemes.
    pub auth_schemes: Option<Vec<String>>,
    /// Replacement lifecycle status.
    pub status: Option<AgentStatus>,
}

impl AgentRecord {
    /// Creates a new record with `Active` status and no verification state.
    #[must_use]
    pub fn new(owner: OwnerRef, params: NewAgentParams, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: AgentId::new(),
            owner,
            name: params.name,
            description: params.description,
            endpoint: params.endpoint,
            version: params.version,
            provider: params.provider,
            capabilities: params.capabilities,
            categories: params.categories,
            tags: params.tags,
            protocols: params.protocols,
            auth_schemes: params.auth_schemes,
            status: AgentStatus::Active,
            verification: VerificationState::unset(),
            last_probe: None,
            registered_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAgentData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            name: data.name,
            description: data.description,
            endpoint: data.endpoint,
            version: data.version,
            provider: data.provider,
            capabilities: data.capabilities,
            categories: data.categories,
            tags: data.tags,
            protocols: data.protocols,
            auth_schemes: data.auth_schemes,
            status: data.status,
            verification: data.verification,
            last_probe: data.last_probe,
            registered_at: data.registered_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the agent identifier.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Returns the owning credential reference.
    #[must_use]
    pub const fn owner(&self) -> OwnerRef {
        self.owner
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &AgentName {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub const fn description(&self) -> &AgentDescription {
        &self.description
    }

    /// Returns the service endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &EndpointUrl {
        &self.endpoint
    }

    /// Returns the published version string.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Returns the provider metadata.
    #[must_use]
    pub const fn provider(&self) -> Option<&AgentProvider> {
        self.provider.as_ref()
    }

    /// Returns the advertised capabilities.
    #[must_use]
    pub fn capabilities(&self) -> &[AgentCapability] {
        &self.capabilities
    }

    /// Returns the category slugs.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Returns the tags.
    #[must_use]
    pub const fn tags(&self) -> &TagList {
        &self.tags
    }

    /// Returns the protocol bindings.
    #[must_use]
    pub const fn protocols(&self) -> &ProtocolBindings {
        &self.protocols
    }

    /// Returns the accepted authentication schemes.
    #[must_use]
    pub fn auth_schemes(&self) -> &[String] {
        &self.auth_schemes
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> AgentStatus {
        self.status
    }

    /// Returns the domain verification state.
    #[must_use]
    pub const fn verification(&self) -> &VerificationState {
        &self.verification
    }

    /// Returns the latest health probe outcome.
    #[must_use]
    pub const fn last_probe(&self) -> Option<&ProbeRecord> {
        self.last_probe.as_ref()
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reports whether the given credential reference owns this record.
    #[must_use]
    pub fn is_owned_by(&self, owner: OwnerRef) -> bool {
        self.owner == owner
    }

    /// Applies a partial update, field by field.
    ///
    /// The mutation timestamp advances even when the patch is empty.
    pub fn apply(&mut self, patch: AgentPatch, at: DateTime<Utc>) {
        let AgentPatch {
            name,
            description,
            endpoint,
            version,
            provider,
            capabilities,
            categories,
            tags,
            a2a_agent_card_url,
            mcp_server_url,
            auth_schemes,
            status,
        } = patch;

        if let Some(new_name) = name {
            self.name = new_name;
        }
        if let Some(new_description) = description {
            self.description = new_description;
        }
        if let Some(new_endpoint) = endpoint {
            self.endpoint = new_endpoint;
        }
        if let Some(new_version) = version {
            self.version = Some(new_version);
        }
        if let Some(update) = provider {
            let mut merged = self.provider.take().unwrap_or_default();
            merged.merge(update);
            self.provider = Some(merged);
        }
        if let Some(new_capabilities) = capabilities {
            self.capabilities = new_capabilities;
        }
        if let Some(new_categories) = categories {
            self.categories = new_categories;
        }
        if let Some(new_tags) = tags {
            self.tags = new_tags;
        }
        if let Some(card_url) = a2a_agent_card_url {
            self.protocols = self.protocols.clone().with_a2a_agent_card_url(card_url);
        }
        if let Some(server_url) = mcp_server_url {
            self.protocols = self.protocols.clone().with_mcp_server_url(server_url);
        }
        if let Some(new_schemes) = auth_schemes {
            self.auth_schemes = new_schemes;
        }
        if let Some(new_status) = status {
            self.status = new_status;
        }
        self.touch(at);
    }

    /// Stores a fresh ownership challenge, leaving any verified flag intact.
    pub fn begin_verification(&mut self, challenge: VerificationChallenge, at: DateTime<Utc>) {
        self.verification.issue(challenge);
        self.touch(at);
    }

    /// Marks the claimed domain verified at the given instant.
    pub fn mark_verified(&mut self, at: DateTime<Utc>) {
        self.verification.mark_verified(at);
        self.touch(at);
    }

    /// Stores the outcome of a health probe.
    pub fn record_probe(&mut self, probe: ProbeRecord) {
        let at = probe.checked_at();
        self.last_probe = Some(probe);
        self.touch(at);
    }

    /// Advances the mutation timestamp, never moving it backwards.
    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = self.updated_at.max(at);
    }
}
