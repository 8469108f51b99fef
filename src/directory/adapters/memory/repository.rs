//! In-memory repository for agent directory tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::directory::{
    domain::{
        AgentId, AgentPatch, AgentRecord, AgentStatus, CategoryCount, DirectoryStats, ProbeRecord,
        RecordPage, RecordQuery, VerificationChallenge,
    },
    ports::{AgentRepository, AgentRepositoryError, AgentRepositoryResult},
};

/// Thread-safe in-memory agent repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgentRepository {
    state: Arc<RwLock<HashMap<AgentId, AgentRecord>>>,
}

impl InMemoryAgentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(
        &self,
    ) -> AgentRepositoryResult<std::sync::RwLockReadGuard<'_, HashMap<AgentId, AgentRecord>>> {
        self.state
            .read()
            .map_err(|err| AgentRepositoryError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write_state(
        &self,
    ) -> AgentRepositoryResult<std::sync::RwLockWriteGuard<'_, HashMap<AgentId, AgentRecord>>> {
        self.state
            .write()
            .map_err(|err| AgentRepositoryError::persistence(std::io::Error::other(err.to_string())))
    }

    fn mutate(
        &self,
        id: AgentId,
        apply: impl FnOnce(&mut AgentRecord),
    ) -> AgentRepositoryResult<Option<AgentRecord>> {
        let mut state = self.write_state()?;
        Ok(state.get_mut(&id).map(|record| {
            apply(record);
            record.clone()
        }))
    }
}

#[async_trait]
impl AgentRepository for InMemoryAgentRepository {
    async fn insert(&self, record: &AgentRecord) -> AgentRepositoryResult<()> {
        let mut state = self.write_state()?;
        if state.contains_key(&record.id()) {
            return Err(AgentRepositoryError::Duplicate(record.id()));
        }
        state.insert(record.id(), record.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: AgentId) -> AgentRepositoryResult<Option<AgentRecord>> {
        let state = self.read_state()?;
        Ok(state.get(&id).cloned())
    }

    async fn apply_patch(
        &self,
        id: AgentId,
        patch: &AgentPatch,
        at: DateTime<Utc>,
    ) -> AgentRepositoryResult<Option<AgentRecord>> {
        self.mutate(id, |record| record.apply(patch.clone(), at))
    }

    async fn delete(&self, id: AgentId) -> AgentRepositoryResult<bool> {
        let mut state = self.write_state()?;
        Ok(state.remove(&id).is_some())
    }

    async fn search(&self, query: &RecordQuery) -> AgentRepositoryResult<RecordPage> {
        let state = self.read_state()?;
        let candidate_ids: Option<HashSet<AgentId>> = query
            .candidates()
            .map(|ids| ids.iter().copied().collect());

        let mut matches: Vec<AgentRecord> = state
            .values()
            .filter(|record| {
                candidate_ids
                    .as_ref()
                    .is_none_or(|ids| ids.contains(&record.id()))
            })
            .filter(|record| query.matches(record))
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            b.registered_at()
                .cmp(&a.registered_at())
                .then_with(|| b.id().as_ref().cmp(a.id().as_ref()))
        });

        let total = matches.len() as u64;
        let offset = usize::try_from(query.page().offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.page().limit()).unwrap_or(usize::MAX);
        let records = matches.into_iter().skip(offset).take(limit).collect();

        Ok(RecordPage { records, total })
    }

    async fn list_active(&self) -> AgentRepositoryResult<Vec<AgentRecord>> {
        let state = self.read_state()?;
        let active = state
            .values()
            .filter(|record| record.status() == AgentStatus::Active)
            .cloned()
            .collect();
        Ok(active)
    }

    async fn list_all(&self) -> AgentRepositoryResult<Vec<AgentRecord>> {
        let state = self.read_state()?;
        Ok(state.values().cloned().collect())
    }

    async fn stats(&self) -> AgentRepositoryResult<DirectoryStats> {
        let state = self.read_state()?;
        let mut stats = DirectoryStats::default();
        for record in state.values() {
            stats.total_agents += 1;
            if record.verification().verified() {
                stats.verified_agents += 1;
            }
            if record.protocols().a2a_agent_card_url().is_some() {
                stats.a2a_agents += 1;
            }
            if record.protocols().mcp_server_url().is_some() {
                stats.mcp_agents += 1;
            }
        }
        Ok(stats)
    }

    async fn category_counts(&self) -> AgentRepositoryResult<Vec<CategoryCount>> {
        let state = self.read_state()?;
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for record in state.values() {
            for category in record.categories() {
                *counts.entry(category.as_str()).or_insert(0) += 1;
            }
        }
        let mut counts: Vec<CategoryCount> = counts
            .into_iter()
            .map(|(slug, agent_count)| CategoryCount {
                slug: slug.to_owned(),
                agent_count,
            })
            .collect();
        counts.sort_by(|a, b| {
            b.agent_count
                .cmp(&a.agent_count)
                .then_with(|| a.slug.cmp(&b.slug))
        });
        Ok(counts)
    }

    async fn store_challenge(
        &self,
        id: AgentId,
        challenge: &VerificationChallenge,
        at: DateTime<Utc>,
    ) -> AgentRepositoryResult<Option<AgentRecord>> {
        self.mutate(id, |record| {
            record.begin_verification(challenge.clone(), at);
        })
    }

    async fn mark_verified(
        &self,
        id: AgentId,
        at: DateTime<Utc>,
    ) -> AgentRepositoryResult<Option<AgentRecord>> {
        self.mutate(id, |record| record.mark_verified(at))
    }

    async fn record_probe(
        &self,
        id: AgentId,
        probe: &ProbeRecord,
    ) -> AgentRepositoryResult<Option<AgentRecord>> {
        self.mutate(id, |record| record.record_probe(probe.clone()))
    }
}
