//! `PostgreSQL` repository implementation for agent records.

use super::{
    models::{AgentPatchChangeset, AgentRow, CategoryCountRow, NewAgentRow, StatsRow},
    schema::agents,
};
use crate::directory::{
    domain::{
        AgentDescription, AgentId, AgentName, AgentPatch, AgentProvider, AgentRecord, AgentStatus,
        CategoryCount, ChallengeToken, DirectoryStats, DomainName, EndpointUrl, OwnerRef,
        PersistedAgentData, ProbeRecord, ProbeStatus, ProtocolBindings, ProtocolKind, RecordPage,
        RecordQuery, VerificationChallenge, VerificationState,
    },
    ports::{AgentRepository, AgentRepositoryError, AgentRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde_json::Value;

/// `PostgreSQL` connection pool type used by directory adapters.
pub type DirectoryPgPool = Pool<ConnectionManager<PgConnection>>;

/// Aggregate counts over the whole `agents` table in one scan.
const STATS_SQL: &str = "SELECT COUNT(*) AS total_agents, \
     COUNT(*) FILTER (WHERE verified) AS verified_agents, \
     COUNT(*) FILTER (WHERE a2a_agent_card_url IS NOT NULL) AS a2a_agents, \
     COUNT(*) FILTER (WHERE mcp_server_url IS NOT NULL) AS mcp_agents \
     FROM agents";

/// Unnests the JSONB category arrays and counts occupancy per slug.
const CATEGORY_COUNTS_SQL: &str = "SELECT category.value AS slug, COUNT(*) AS agent_count \
     FROM agents \
     CROSS JOIN LATERAL jsonb_array_elements_text(agents.categories) AS category(value) \
     GROUP BY category.value \
     ORDER BY agent_count DESC, slug ASC";

/// `PostgreSQL`-backed agent repository.
#[derive(Debug, Clone)]
pub struct PostgresAgentRepository {
    pool: DirectoryPgPool,
}

impl PostgresAgentRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: DirectoryPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> AgentRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> AgentRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(AgentRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(AgentRepositoryError::persistence)?
    }
}

impl From<DieselError> for AgentRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl AgentRepository for PostgresAgentRepository {
    async fn insert(&self, record: &AgentRecord) -> AgentRepositoryResult<()> {
        let agent_id = record.id();
        let new_row = to_new_row(record)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(agents::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        AgentRepositoryError::Duplicate(agent_id)
                    }
                    _ => AgentRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: AgentId) -> AgentRepositoryResult<Option<AgentRecord>> {
        self.run_blocking(move |connection| {
            let row = agents::table
                .filter(agents::id.eq(id.into_inner()))
                .select(AgentRow::as_select())
                .first::<AgentRow>(connection)
                .optional()
                .map_err(AgentRepositoryError::persistence)?;
            row.map(row_to_record).transpose()
        })
        .await
    }

    async fn apply_patch(
        &self,
        id: AgentId,
        patch: &AgentPatch,
        at: DateTime<Utc>,
    ) -> AgentRepositoryResult<Option<AgentRecord>> {
        let agent_id = id.into_inner();
        let patch_update = patch.clone();

        self.run_blocking(move |connection| {
            connection.transaction::<_, AgentRepositoryError, _>(|tx| {
                let provider_column = agents::table
                    .filter(agents::id.eq(agent_id))
                    .select(agents::provider)
                    .first::<Option<Value>>(tx)
                    .optional()?;
                let Some(stored_provider) = provider_column else {
                    return Ok(None);
                };

                let changeset = build_patch_changeset(&patch_update, stored_provider, at)?;
                let row = diesel::update(agents::table.filter(agents::id.eq(agent_id)))
                    .set(&changeset)
                    .returning(AgentRow::as_returning())
                    .get_result::<AgentRow>(tx)?;
                row_to_record(row).map(Some)
            })
        })
        .await
    }

    async fn delete(&self, id: AgentId) -> AgentRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(agents::table.filter(agents::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(AgentRepositoryError::persistence)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn search(&self, query: &RecordQuery) -> AgentRepositoryResult<RecordPage> {
        let record_query = query.clone();

        self.run_blocking(move |connection| {
            let total = apply_query_filters(agents::table.into_boxed(), &record_query)
                .count()
                .get_result::<i64>(connection)
                .map_err(AgentRepositoryError::persistence)?;

            let rows = apply_query_filters(agents::table.into_boxed(), &record_query)
                .order(agents::registered_at.desc())
                .then_order_by(agents::id.desc())
                .limit(i64::from(record_query.page().limit()))
                .offset(i64::from(record_query.page().offset()))
                .select(AgentRow::as_select())
                .load::<AgentRow>(connection)
                .map_err(AgentRepositoryError::persistence)?;

            let records = rows
                .into_iter()
                .map(row_to_record)
                .collect::<AgentRepositoryResult<Vec<_>>>()?;
            Ok(RecordPage {
                records,
                total: count_to_u64(total)?,
            })
        })
        .await
    }

    async fn list_active(&self) -> AgentRepositoryResult<Vec<AgentRecord>> {
        self.run_blocking(move |connection| {
            let rows = agents::table
                .filter(agents::status.eq(AgentStatus::Active.as_str()))
                .select(AgentRow::as_select())
                .load::<AgentRow>(connection)
                .map_err(AgentRepositoryError::persistence)?;
            rows.into_iter().map(row_to_record).collect()
        })
        .await
    }

    async fn list_all(&self) -> AgentRepositoryResult<Vec<AgentRecord>> {
        self.run_blocking(move |connection| {
            let rows = agents::table
                .select(AgentRow::as_select())
                .load::<AgentRow>(connection)
                .map_err(AgentRepositoryError::persistence)?;
            rows.into_iter().map(row_to_record).collect()
        })
        .await
    }

    async fn stats(&self) -> AgentRepositoryResult<DirectoryStats> {
        self.run_blocking(move |connection| {
            let row = diesel::sql_query(STATS_SQL)
                .get_result::<StatsRow>(connection)
                .map_err(AgentRepositoryError::persistence)?;
            Ok(DirectoryStats {
                total_agents: count_to_u64(row.total_agents)?,
                verified_agents: count_to_u64(row.verified_agents)?,
                a2a_agents: count_to_u64(row.a2a_agents)?,
                mcp_agents: count_to_u64(row.mcp_agents)?,
            })
        })
        .await
    }

    async fn category_counts(&self) -> AgentRepositoryResult<Vec<CategoryCount>> {
        self.run_blocking(move |connection| {
            let rows = diesel::sql_query(CATEGORY_COUNTS_SQL)
                .load::<CategoryCountRow>(connection)
                .map_err(AgentRepositoryError::persistence)?;
            rows.into_iter()
                .map(|row| {
                    Ok(CategoryCount {
                        slug: row.slug,
                        agent_count: count_to_u64(row.agent_count)?,
                    })
                })
                .collect()
        })
        .await
    }

    async fn store_challenge(
        &self,
        id: AgentId,
        challenge: &VerificationChallenge,
        at: DateTime<Utc>,
    ) -> AgentRepositoryResult<Option<AgentRecord>> {
        let agent_id = id.into_inner();
        let domain = challenge.domain().as_str().to_owned();
        let token = challenge.token().as_str().to_owned();

        self.run_blocking(move |connection| {
            let row = diesel::update(agents::table.filter(agents::id.eq(agent_id)))
                .set((
                    agents::verification_domain.eq(&domain),
                    agents::verification_token.eq(&token),
                    agents::updated_at.eq(at),
                ))
                .returning(AgentRow::as_returning())
                .get_result::<AgentRow>(connection)
                .optional()
                .map_err(AgentRepositoryError::persistence)?;
            row.map(row_to_record).transpose()
        })
        .await
    }

    async fn mark_verified(
        &self,
        id: AgentId,
        at: DateTime<Utc>,
    ) -> AgentRepositoryResult<Option<AgentRecord>> {
        let agent_id = id.into_inner();

        self.run_blocking(move |connection| {
            let row = diesel::update(agents::table.filter(agents::id.eq(agent_id)))
                .set((
                    agents::verified.eq(true),
                    agents::verified_at.eq(at),
                    agents::updated_at.eq(at),
                ))
                .returning(AgentRow::as_returning())
                .get_result::<AgentRow>(connection)
                .optional()
                .map_err(AgentRepositoryError::persistence)?;
            row.map(row_to_record).transpose()
        })
        .await
    }

    async fn record_probe(
        &self,
        id: AgentId,
        probe: &ProbeRecord,
    ) -> AgentRepositoryResult<Option<AgentRecord>> {
        let agent_id = id.into_inner();
        let probe_status = probe.status().to_string();
        let probed_at = probe.checked_at();

        self.run_blocking(move |connection| {
            let row = diesel::update(agents::table.filter(agents::id.eq(agent_id)))
                .set((
                    agents::last_probe_status.eq(&probe_status),
                    agents::last_probe_at.eq(probed_at),
                    agents::updated_at.eq(probed_at),
                ))
                .returning(AgentRow::as_returning())
                .get_result::<AgentRow>(connection)
                .optional()
                .map_err(AgentRepositoryError::persistence)?;
            row.map(row_to_record).transpose()
        })
        .await
    }
}

/// Applies every structured predicate of the query to a boxed select.
///
/// Called once for the count and once for the page so both see identical
/// predicates; boxed queries cannot be cloned.
fn apply_query_filters(
    source: agents::BoxedQuery<'static, Pg>,
    query: &RecordQuery,
) -> agents::BoxedQuery<'static, Pg> {
    let mut filtered = source;
    if let Some(ids) = query.candidates() {
        let uuids: Vec<uuid::Uuid> = ids.iter().map(|id| id.into_inner()).collect();
        filtered = filtered.filter(agents::id.eq_any(uuids));
    }
    if let Some(category) = query.category() {
        filtered = filtered.filter(agents::categories.contains(serde_json::json!([category])));
    }
    if let Some(tag) = query.tag() {
        filtered = filtered.filter(agents::tags.contains(serde_json::json!([tag])));
    }
    match query.protocol() {
        Some(ProtocolKind::A2a) => {
            filtered = filtered.filter(agents::a2a_agent_card_url.is_not_null());
        }
        Some(ProtocolKind::Mcp) => {
            filtered = filtered.filter(agents::mcp_server_url.is_not_null());
        }
        None => {}
    }
    if let Some(verified) = query.verified() {
        filtered = filtered.filter(agents::verified.eq(verified));
    }
    if let Some(status) = query.status() {
        filtered = filtered.filter(agents::status.eq(status.as_str().to_owned()));
    }
    filtered
}

fn count_to_u64(count: i64) -> AgentRepositoryResult<u64> {
    u64::try_from(count).map_err(AgentRepositoryError::persistence)
}

fn to_new_row(record: &AgentRecord) -> AgentRepositoryResult<NewAgentRow> {
    let provider = record
        .provider()
        .map(serde_json::to_value)
        .transpose()
        .map_err(AgentRepositoryError::persistence)?;
    let capabilities =
        serde_json::to_value(record.capabilities()).map_err(AgentRepositoryError::persistence)?;
    let categories =
        serde_json::to_value(record.categories()).map_err(AgentRepositoryError::persistence)?;
    let tags = serde_json::to_value(record.tags()).map_err(AgentRepositoryError::persistence)?;
    let auth_schemes =
        serde_json::to_value(record.auth_schemes()).map_err(AgentRepositoryError::persistence)?;
    let challenge = record.verification().challenge();

    Ok(NewAgentRow {
        id: record.id().into_inner(),
        owner_id: record.owner().into_inner(),
        name: record.name().as_str().to_owned(),
        description: record.description().as_str().to_owned(),
        endpoint_url: record.endpoint().as_str().to_owned(),
        version: record.version().map(str::to_owned),
        provider,
        capabilities,
        categories,
        tags,
        a2a_agent_card_url: record
            .protocols()
            .a2a_agent_card_url()
            .map(|url| url.as_str().to_owned()),
        mcp_server_url: record
            .protocols()
            .mcp_server_url()
            .map(|url| url.as_str().to_owned()),
        auth_schemes,
        status: record.status().as_str().to_owned(),
        verification_domain: challenge.map(|pending| pending.domain().as_str().to_owned()),
        verification_token: challenge.map(|pending| pending.token().as_str().to_owned()),
        verified: record.verification().verified(),
        verified_at: record.verification().verified_at(),
        last_probe_status: record.last_probe().map(|probe| probe.status().to_string()),
        last_probe_at: record.last_probe().map(ProbeRecord::checked_at),
        registered_at: record.registered_at(),
        updated_at: record.updated_at(),
    })
}

fn build_patch_changeset(
    patch: &AgentPatch,
    stored_provider: Option<Value>,
    at: DateTime<Utc>,
) -> AgentRepositoryResult<AgentPatchChangeset> {
    let provider = patch
        .provider
        .as_ref()
        .map(|update| {
            let mut merged = stored_provider
                .map(serde_json::from_value::<AgentProvider>)
                .transpose()
                .map_err(AgentRepositoryError::invalid_persisted_data)?
                .unwrap_or_default();
            merged.merge(update.clone());
            serde_json::to_value(&merged).map_err(AgentRepositoryError::persistence)
        })
        .transpose()?;
    let capabilities = patch
        .capabilities
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(AgentRepositoryError::persistence)?;
    let categories = patch
        .categories
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(AgentRepositoryError::persistence)?;
    let tags = patch
        .tags
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(AgentRepositoryError::persistence)?;
    let auth_schemes = patch
        .auth_schemes
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(AgentRepositoryError::persistence)?;

    Ok(AgentPatchChangeset {
        name: patch.name.as_ref().map(|name| name.as_str().to_owned()),
        description: patch
            .description
            .as_ref()
            .map(|description| description.as_str().to_owned()),
        endpoint_url: patch
            .endpoint
            .as_ref()
            .map(|endpoint| endpoint.as_str().to_owned()),
        version: patch.version.clone(),
        provider,
        capabilities,
        categories,
        tags,
        a2a_agent_card_url: patch
            .a2a_agent_card_url
            .as_ref()
            .map(|url| url.as_str().to_owned()),
        mcp_server_url: patch
            .mcp_server_url
            .as_ref()
            .map(|url| url.as_str().to_owned()),
        auth_schemes,
        status: patch.status.map(|status| status.as_str().to_owned()),
        updated_at: at,
    })
}

fn row_to_record(row: AgentRow) -> AgentRepositoryResult<AgentRecord> {
    let AgentRow {
        id,
        owner_id,
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
        verification_domain,
        verification_token,
        verified,
        verified_at,
        last_probe_status,
        last_probe_at,
        registered_at,
        updated_at,
    } = row;

    let parsed_name = AgentName::new(name).map_err(AgentRepositoryError::invalid_persisted_data)?;
    let parsed_description =
        AgentDescription::new(description).map_err(AgentRepositoryError::invalid_persisted_data)?;
    let parsed_endpoint =
        EndpointUrl::new(endpoint_url).map_err(AgentRepositoryError::invalid_persisted_data)?;
    let parsed_provider = provider
        .map(serde_json::from_value::<AgentProvider>)
        .transpose()
        .map_err(AgentRepositoryError::invalid_persisted_data)?;
    let parsed_capabilities = serde_json::from_value(capabilities)
        .map_err(AgentRepositoryError::invalid_persisted_data)?;
    let parsed_categories =
        serde_json::from_value(categories).map_err(AgentRepositoryError::invalid_persisted_data)?;
    let parsed_tags =
        serde_json::from_value(tags).map_err(AgentRepositoryError::invalid_persisted_data)?;
    let parsed_auth_schemes = serde_json::from_value(auth_schemes)
        .map_err(AgentRepositoryError::invalid_persisted_data)?;
    let parsed_status = AgentStatus::try_from(status.as_str())
        .map_err(AgentRepositoryError::invalid_persisted_data)?;

    let mut protocols = ProtocolBindings::new();
    if let Some(url) = a2a_agent_card_url {
        protocols = protocols.with_a2a_agent_card_url(
            EndpointUrl::new(url).map_err(AgentRepositoryError::invalid_persisted_data)?,
        );
    }
    if let Some(url) = mcp_server_url {
        protocols = protocols.with_mcp_server_url(
            EndpointUrl::new(url).map_err(AgentRepositoryError::invalid_persisted_data)?,
        );
    }

    let domain = verification_domain
        .map(DomainName::new)
        .transpose()
        .map_err(AgentRepositoryError::invalid_persisted_data)?;
    let token = verification_token
        .map(ChallengeToken::new)
        .transpose()
        .map_err(AgentRepositoryError::invalid_persisted_data)?;
    let verification = VerificationState::from_persisted(domain, token, verified, verified_at);

    let last_probe = last_probe_status
        .zip(last_probe_at)
        .map(|(probe_status, probed_at)| {
            ProbeStatus::try_from(probe_status.as_str())
                .map(|parsed| ProbeRecord::new(parsed, probed_at))
        })
        .transpose()
        .map_err(AgentRepositoryError::invalid_persisted_data)?;

    let data = PersistedAgentData {
        id: AgentId::from_uuid(id),
        owner: OwnerRef::from_uuid(owner_id),
        name: parsed_name,
        description: parsed_description,
        endpoint: parsed_endpoint,
        version,
        provider: parsed_provider,
        capabilities: parsed_capabilities,
        categories: parsed_categories,
        tags: parsed_tags,
        protocols,
        auth_schemes: parsed_auth_schemes,
        status: parsed_status,
        verification,
        last_probe,
        registered_at,
        updated_at,
    };
    Ok(AgentRecord::from_persisted(data))
}
