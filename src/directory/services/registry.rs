//! Service layer for agent registration and discovery.
//!
//! Provides [`AgentRegistryService`] which coordinates agent registration,
//! updates, deletion, and discovery, keeping the search index in step with
//! the record store on every mutation.

use crate::directory::{
    domain::{
        AgentCapability, AgentDescription, AgentId, AgentName, AgentPatch, AgentProvider,
        AgentRecord, AgentStatus, CategoryCount, DirectoryDomainError, DirectoryStats, EndpointUrl,
        NewAgentParams, OwnerRef, PageBounds, ProtocolBindings, ProtocolKind, RecordPage,
        RecordQuery, SearchDocument, TagList,
    },
    ports::{AgentRepository, AgentRepositoryError, SearchIndex, SearchIndexError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for registering a new agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterAgentRequest {
    name: String,
    description: String,
    endpoint_url: String,
    version: Option<String>,
    provider: Option<AgentProvider>,
    capabilities: Vec<AgentCapability>,
    categories: Vec<String>,
    tags: Vec<String>,
    a2a_agent_card_url: Option<String>,
    mcp_server_url: Option<String>,
    auth_schemes: Vec<String>,
}

impl RegisterAgentRequest {
    /// Creates a request with the mandatory agent fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        endpoint_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            endpoint_url: endpoint_url.into(),
            version: None,
            provider: None,
            capabilities: Vec::new(),
            categories: Vec::new(),
            tags: Vec::new(),
            a2a_agent_card_url: None,
            mcp_server_url: None,
            auth_schemes: Vec::new(),
        }
    }

    /// Sets the published version string.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets provider organization metadata.
    #[must_use]
    pub fn with_provider(mut self, provider: AgentProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Sets advertised capabilities.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Vec<AgentCapability>) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Sets category slugs.
    #[must_use]
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = String>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    /// Sets free-form tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Sets the A2A agent card URL binding.
    #[must_use]
    pub fn with_a2a_agent_card_url(mut self, url: impl Into<String>) -> Self {
        self.a2a_agent_card_url = Some(url.into());
        self
    }

    /// Sets the MCP server URL binding.
    #[must_use]
    pub fn with_mcp_server_url(mut self, url: impl Into<String>) -> Self {
        self.mcp_server_url = Some(url.into());
        self
    }

    /// Sets accepted authentication schemes.
    #[must_use]
    pub fn with_auth_schemes(mut self, schemes: impl IntoIterator<Item = String>) -> Self {
        self.auth_schemes = schemes.into_iter().collect();
        self
    }
}

/// Request payload for partially updating an existing agent.
///
/// Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateAgentRequest {
    name: Option<String>,
    description: Option<String>,
    endpoint_url: Option<String>,
    version: Option<String>,
    provider: Option<AgentProvider>,
    capabilities: Option<Vec<AgentCapability>>,
    categories: Option<Vec<String>>,
    tags: Option<Vec<String>>,
    a2a_agent_card_url: Option<String>,
    mcp_server_url: Option<String>,
    auth_schemes: Option<Vec<String>>,
    status: Option<AgentStatus>,
}

impl UpdateAgentRequest {
    /// Creates an empty update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the service endpoint URL.
    #[must_use]
    pub fn with_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Replaces the published version string.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Merges provider fields into the stored provider.
    #[must_use]
    pub fn with_provider(mut self, provider: AgentProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Replaces the capability list.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Vec<AgentCapability>) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    /// Replaces the category slugs.
    #[must_use]
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = String>) -> Self {
        self.categories = Some(categories.into_iter().collect());
        self
    }

    /// Replaces the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = Some(tags.into_iter().collect());
        self
    }

    /// Replaces the A2A agent card URL binding.
    #[must_use]
    pub fn with_a2a_agent_card_url(mut self, url: impl Into<String>) -> Self {
        self.a2a_agent_card_url = Some(url.into());
        self
    }

    /// Replaces the MCP server URL binding.
    #[must_use]
    pub fn with_mcp_server_url(mut self, url: impl Into<String>) -> Self {
        self.mcp_server_url = Some(url.into());
        self
    }

    /// Replaces the accepted authentication schemes.
    #[must_use]
    pub fn with_auth_schemes(mut self, schemes: impl IntoIterator<Item = String>) -> Self {
        self.auth_schemes = Some(schemes.into_iter().collect());
        self
    }

    /// Replaces the lifecycle status.
    #[must_use]
    pub const fn with_status(mut self, status: AgentStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Request payload for querying the directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchAgentsRequest {
    query: Option<String>,
    category: Option<String>,
    tag: Option<String>,
    protocol: Option<ProtocolKind>,
    verified: Option<bool>,
    status: Option<AgentStatus>,
    limit: Option<u32>,
    offset: Option<u32>,
}

impl SearchAgentsRequest {
    /// Creates an unfiltered request for the first page of agents.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the free-text relevance query.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Filters to agents filed under a category slug.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Filters to agents carrying a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Filters to agents bound to a protocol.
    #[must_use]
    pub const fn with_protocol(mut self, protocol: ProtocolKind) -> Self {
        self.protocol = Some(protocol);
        self
    }

    /// Filters by domain verification state.
    #[must_use]
    pub const fn with_verified(mut self, verified: bool) -> Self {
        self.verified = Some(verified);
        self
    }

    /// Filters by lifecycle status.
    #[must_use]
    pub const fn with_status(mut self, status: AgentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the page size, between 1 and 100.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the number of records to skip.
    #[must_use]
    pub const fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Search index synchronization outcome of a registry mutation.
///
/// The record store write has already succeeded by the time this value is
/// produced; `Degraded` means the index write failed and search results may
/// miss the record until the next [`AgentRegistryService::rebuild_search_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchIndexSync {
    /// The index reflects the stored record.
    Synced,
    /// The index write failed after the store write succeeded.
    Degraded,
}

impl SearchIndexSync {
    /// Returns `true` when the index missed this mutation.
    #[must_use]
    pub const fn is_degraded(self) -> bool {
        matches!(self, Self::Degraded)
    }
}

/// A stored mutation together with its search index outcome.
#[derive(Debug, Clone)]
pub struct RegistryWrite {
    /// The record as stored after the mutation.
    pub record: AgentRecord,
    /// Whether the search index reflects the stored record.
    pub index_sync: SearchIndexSync,
}

/// Service-level errors for agent registry operations.
#[derive(Debug, Error)]
pub enum AgentRegistryServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] DirectoryDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] AgentRepositoryError),
    /// Search index lookup failed.
    #[error(transparent)]
    SearchIndex(#[from] SearchIndexError),
    /// The requesting owner does not own the agent.
    #[error("agent {0} belongs to a different owner")]
    Forbidden(AgentId),
}

/// Result type for agent registry service operations.
pub type AgentRegistryServiceResult<T> = Result<T, AgentRegistryServiceError>;

/// Agent registration and discovery orchestration service.
///
/// Every mutation writes the record store first and then resynchronizes the
/// search index. An index failure after a successful store write is reported
/// as [`SearchIndexSync::Degraded`] rather than rolling back the store;
/// [`Self::rebuild_search_index`] repairs any accumulated drift.
#[derive(Clone)]
pub struct AgentRegistryService<R, S, C>
where
    R: AgentRepository,
    S: SearchIndex,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    index: Arc<S>,
    clock: Arc<C>,
}

impl<R, S, C> AgentRegistryService<R, S, C>
where
    R: AgentRepository,
    S: SearchIndex,
    C: Clock + Send + Sync,
{
    /// Creates a new agent registry service.
    #[must_use]
    pub const fn new(repository: Arc<R>, index: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            repository,
            index,
            clock,
        }
    }

    /// Registers a new agent owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryServiceError`] when input validation fails or
    /// the repository rejects persistence.
    pub async fn register(
        &self,
        owner: OwnerRef,
        request: RegisterAgentRequest,
    ) -> AgentRegistryServiceResult<RegistryWrite> {
        let RegisterAgentRequest {
            name,
            description,
            endpoint_url,
            version,
            provider,
            capabilities,
            categories,
            tags,
            a2a_agent_card_url,
            mcp_server_url,
            auth_schemes,
        } = request;

        let params = NewAgentParams {
            name: AgentName::new(name)?,
            description: AgentDescription::new(description)?,
            endpoint: EndpointUrl::new(endpoint_url)?,
            version,
            provider,
            capabilities,
            categories,
            tags: TagList::new(tags)?,
            protocols: build_bindings(a2a_agent_card_url, mcp_server_url)?,
            auth_schemes,
        };

        let record = AgentRecord::new(owner, params, &*self.clock);
        self.repository.insert(&record).await?;
        let index_sync = self.sync_index(&record).await;
        Ok(RegistryWrite { record, index_sync })
    }

    /// Finds an agent record by identifier.
    ///
    /// Returns `Ok(None)` when no agent has the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn find_by_id(
        &self,
        id: AgentId,
    ) -> AgentRegistryServiceResult<Option<AgentRecord>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Applies a partial update to an agent owned by `owner`.
    ///
    /// The stored record is patched field by field; provider metadata merges
    /// into the existing provider instead of replacing it. The update bumps
    /// the record's `updated_at` even when the patch is empty.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryServiceError::Forbidden`] when `owner` does not
    /// own the agent, [`AgentRegistryServiceError::Repository`] when the agent
    /// is not found or persistence fails, and
    /// [`AgentRegistryServiceError::Domain`] when a patched field fails
    /// validation.
    pub async fn update(
        &self,
        owner: OwnerRef,
        id: AgentId,
        request: UpdateAgentRequest,
    ) -> AgentRegistryServiceResult<RegistryWrite> {
        let current = self.find_by_id_or_error(id).await?;
        ensure_owned_by(&current, owner)?;

        let patch = build_patch(request)?;
        let updated = self
            .repository
            .apply_patch(id, &patch, self.clock.utc())
            .await?
            .ok_or_else(|| AgentRepositoryError::NotFound(id))?;
        let index_sync = self.sync_index(&updated).await;
        Ok(RegistryWrite {
            record: updated,
            index_sync,
        })
    }

    /// Deletes an agent owned by `owner` and removes it from the index.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryServiceError::Forbidden`] when `owner` does not
    /// own the agent, and [`AgentRegistryServiceError::Repository`] when the
    /// agent is not found or persistence fails.
    pub async fn delete(
        &self,
        owner: OwnerRef,
        id: AgentId,
    ) -> AgentRegistryServiceResult<SearchIndexSync> {
        let record = self.find_by_id_or_error(id).await?;
        ensure_owned_by(&record, owner)?;

        let removed = self.repository.delete(id).await?;
        if !removed {
            return Err(AgentRepositoryError::NotFound(id).into());
        }

        match self.index.remove(id).await {
            Ok(()) => Ok(SearchIndexSync::Synced),
            Err(err) => {
                tracing::warn!(
                    agent_id = %id,
                    error = %err,
                    "search index removal failed; stale entry remains until the next rebuild"
                );
                Ok(SearchIndexSync::Degraded)
            }
        }
    }

    /// Queries the directory with structured filters and optional free text.
    ///
    /// A free-text query first resolves candidate IDs through the search
    /// index by relevance; structured filters then narrow the candidates.
    /// Pagination applies after filtering, and `total` counts every match
    /// rather than the returned page.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryServiceError::Domain`] when the page limit is
    /// outside 1 to 100, [`AgentRegistryServiceError::SearchIndex`] when the
    /// free-text lookup fails, and [`AgentRegistryServiceError::Repository`]
    /// when persistence lookup fails.
    pub async fn search(
        &self,
        request: SearchAgentsRequest,
    ) -> AgentRegistryServiceResult<RecordPage> {
        let SearchAgentsRequest {
            query,
            category,
            tag,
            protocol,
            verified,
            status,
            limit,
            offset,
        } = request;

        let page = PageBounds::new(limit, offset)?;
        let mut record_query = RecordQuery::new(page);
        if let Some(slug) = category {
            record_query = record_query.with_category(slug);
        }
        if let Some(label) = tag {
            record_query = record_query.with_tag(label);
        }
        if let Some(kind) = protocol {
            record_query = record_query.with_protocol(kind);
        }
        if let Some(flag) = verified {
            record_query = record_query.with_verified(flag);
        }
        if let Some(lifecycle) = status {
            record_query = record_query.with_status(lifecycle);
        }

        let needle = query
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty());
        if let Some(text) = needle {
            let candidates = self.index.match_ids(text).await?;
            if candidates.is_empty() {
                return Ok(RecordPage {
                    records: Vec::new(),
                    total: 0,
                });
            }
            record_query = record_query.with_candidates(candidates);
        }

        Ok(self.repository.search(&record_query).await?)
    }

    /// Returns aggregate directory statistics.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn stats(&self) -> AgentRegistryServiceResult<DirectoryStats> {
        Ok(self.repository.stats().await?)
    }

    /// Returns per-category agent counts, most populated first.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn categories(&self) -> AgentRegistryServiceResult<Vec<CategoryCount>> {
        Ok(self.repository.category_counts().await?)
    }

    /// Rebuilds the search index from the record store.
    ///
    /// Replaces the whole index with a projection of every stored record,
    /// repairing any drift left behind by degraded mutations. Returns the
    /// number of indexed documents.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryServiceError::Repository`] when the store scan
    /// fails, or [`AgentRegistryServiceError::SearchIndex`] when the index
    /// rejects the rebuilt documents.
    pub async fn rebuild_search_index(&self) -> AgentRegistryServiceResult<u64> {
        let records = self.repository.list_all().await?;
        let documents: Vec<SearchDocument> =
            records.iter().map(SearchDocument::from_record).collect();
        self.index.rebuild(&documents).await?;
        Ok(documents.len() as u64)
    }

    async fn find_by_id_or_error(&self, id: AgentId) -> AgentRegistryServiceResult<AgentRecord> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AgentRepositoryError::NotFound(id).into())
    }

    async fn sync_index(&self, record: &AgentRecord) -> SearchIndexSync {
        let document = SearchDocument::from_record(record);
        match self.index.upsert(&document).await {
            Ok(()) => SearchIndexSync::Synced,
            Err(err) => {
                tracing::warn!(
                    agent_id = %record.id(),
                    error = %err,
                    "search index upsert failed; record is unsearchable until the next rebuild"
                );
                SearchIndexSync::Degraded
            }
        }
    }
}

fn ensure_owned_by(record: &AgentRecord, owner: OwnerRef) -> AgentRegistryServiceResult<()> {
    if record.is_owned_by(owner) {
        Ok(())
    } else {
        Err(AgentRegistryServiceError::Forbidden(record.id()))
    }
}

fn build_bindings(
    a2a_agent_card_url: Option<String>,
    mcp_server_url: Option<String>,
) -> Result<ProtocolBindings, DirectoryDomainError> {
    let mut protocols = ProtocolBindings::new();
    if let Some(url) = a2a_agent_card_url {
        protocols = protocols.with_a2a_agent_card_url(EndpointUrl::new(url)?);
    }
    if let Some(url) = mcp_server_url {
        protocols = protocols.with_mcp_server_url(EndpointUrl::new(url)?);
    }
    Ok(protocols)
}

fn build_patch(request: UpdateAgentRequest) -> Result<AgentPatch, DirectoryDomainError> {
    let UpdateAgentRequest {
        name,
        description,
        endpoint_url,
        version,
        provider,
        capabilities,
        categories,
        tags,
        a2a_agent_card_url,
        mcp_server_url,
        auth_schemes,
        status,
    } = request;

    Ok(AgentPatch {
        name: name.map(AgentName::new).transpose()?,
        description: description.map(AgentDescription::new).transpose()?,
        endpoint: endpoint_url.map(EndpointUrl::new).transpose()?,
        version,
        provider,
        capabilities,
        categories,
        tags: tags.map(TagList::new).transpose()?,
        a2a_agent_card_url: a2a_agent_card_url.map(EndpointUrl::new).transpose()?,
        mcp_server_url: mcp_server_url.map(EndpointUrl::new).transpose()?,
        auth_schemes,
        status,
    })
}
