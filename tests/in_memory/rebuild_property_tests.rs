//! Property test for the search index rebuild invariant.
//!
//! The index is a derived view of the record store: for any sequence of
//! creates, updates, and deletes, rebuilding it from scratch must answer
//! free-text queries identically to the incrementally maintained index.

use agora::directory::{
    adapters::memory::{InMemoryAgentRepository, InMemorySearchIndex},
    domain::{AgentId, OwnerRef},
    ports::SearchIndex,
    services::{AgentRegistryService, RegisterAgentRequest, UpdateAgentRequest},
};
use mockable::DefaultClock;
use proptest::prelude::*;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Small vocabulary so generated records collide on tokens.
const WORDS: &[&str] = &["alpha", "beaver", "cedar", "delta", "ember", "fjord"];

#[derive(Debug, Clone)]
enum IndexOp {
    Create { name: usize, description: usize },
    Rename { target: usize, name: usize },
    Remove { target: usize },
}

fn index_op() -> impl Strategy<Value = IndexOp> {
    let words = WORDS.len();
    prop_oneof![
        3 => (0..words, 0..words)
            .prop_map(|(name, description)| IndexOp::Create { name, description }),
        2 => (0..8usize, 0..words).prop_map(|(target, name)| IndexOp::Rename { target, name }),
        1 => (0..8usize).prop_map(|target| IndexOp::Remove { target }),
    ]
}

async fn apply_ops(
    service: &AgentRegistryService<InMemoryAgentRepository, InMemorySearchIndex, DefaultClock>,
    owner: OwnerRef,
    ops: &[IndexOp],
) {
    let mut live: Vec<AgentId> = Vec::new();
    for op in ops {
        match op {
            IndexOp::Create { name, description } => {
                let request = RegisterAgentRequest::new(
                    format!("{} agent", WORDS[*name]),
                    format!("Handles {} workloads", WORDS[*description]),
                    "https://agent.example.com",
                );
                let written = service
                    .register(owner, request)
                    .await
                    .expect("registration should succeed");
                live.push(written.record.id());
            }
            IndexOp::Rename { target, name } => {
                if live.is_empty() {
                    continue;
                }
                let id = live[target % live.len()];
                service
                    .update(
                        owner,
                        id,
                        UpdateAgentRequest::new().with_name(format!("{} agent", WORDS[*name])),
                    )
                    .await
                    .expect("update should succeed");
            }
            IndexOp::Remove { target } => {
                if live.is_empty() {
                    continue;
                }
                let id = live.remove(target % live.len());
                service
                    .delete(owner, id)
                    .await
                    .expect("delete should succeed");
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn rebuilt_index_answers_queries_like_the_incremental_one(
        ops in prop::collection::vec(index_op(), 1..14)
    ) {
        let runtime = Runtime::new().expect("runtime should build");
        runtime.block_on(async {
            let repository = Arc::new(InMemoryAgentRepository::new());
            let incremental = Arc::new(InMemorySearchIndex::new());
            let service = AgentRegistryService::new(
                Arc::clone(&repository),
                Arc::clone(&incremental),
                Arc::new(DefaultClock),
            );
            apply_ops(&service, OwnerRef::new(), &ops).await;

            // Rebuild into a fresh index from nothing but the store.
            let rebuilt = Arc::new(InMemorySearchIndex::new());
            let repaired = AgentRegistryService::new(
                Arc::clone(&repository),
                Arc::clone(&rebuilt),
                Arc::new(DefaultClock),
            );
            repaired
                .rebuild_search_index()
                .await
                .expect("rebuild should succeed");

            for word in WORDS {
                let from_incremental = incremental
                    .match_ids(word)
                    .await
                    .expect("incremental lookup should succeed");
                let from_rebuilt = rebuilt
                    .match_ids(word)
                    .await
                    .expect("rebuilt lookup should succeed");
                prop_assert_eq!(
                    from_incremental,
                    from_rebuilt,
                    "query {} diverged after rebuild",
                    word
                );
            }
            Ok(())
        })?;
    }
}
