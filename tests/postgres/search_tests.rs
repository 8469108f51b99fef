//! Full-text search, structured filters, and aggregates over the
//! `PostgreSQL` adapters.
//!
//! These exercise the generated `search_vector` column, the JSONB
//! containment filters, and the raw aggregate queries that have no
//! in-memory equivalent.

use super::cluster::BoxError;
use super::helpers::{PostgresHarness, agent, postgres_harness, runtime};
use agora::directory::{
    domain::{AgentId, OwnerRef, ProtocolKind},
    ports::SearchIndex,
    services::SearchAgentsRequest,
};
use rstest::rstest;
use tokio::runtime::Runtime;

/// Registers three agents with distinct text, categories, and protocols.
async fn seed_directory(harness: &PostgresHarness) -> Result<[AgentId; 3], BoxError> {
    let owner = OwnerRef::new();
    let weather = harness
        .registry
        .register(
            owner,
            agent(
                "Weather Oracle",
                "Forecasts weather for any city",
                "https://weather.example.com/api",
            )
            .with_categories(["weather".to_owned(), "data".to_owned()])
            .with_tags(["forecast".to_owned()])
            .with_a2a_agent_card_url("https://weather.example.com/.well-known/agent.json"),
        )
        .await?
        .record;
    let ledger = harness
        .registry
        .register(
            owner,
            agent(
                "Ledger Keeper",
                "Reconciles accounts and ledgers",
                "https://ledger.example.com",
            )
            .with_categories(["finance".to_owned()])
            .with_tags(["accounting".to_owned()])
            .with_mcp_server_url("https://ledger.example.com/mcp"),
        )
        .await?
        .record;
    let scout = harness
        .registry
        .register(
            owner,
            agent(
                "Market Scout",
                "Watches markets for price movements",
                "https://scout.example.com",
            )
            .with_categories(["finance".to_owned(), "data".to_owned()])
            .with_tags(["pricing".to_owned()]),
        )
        .await?
        .record;
    Ok([weather.id(), ledger.id(), scout.id()])
}

#[rstest]
#[ignore = "requires an embedded PostgreSQL server"]
fn stemmed_free_text_matches_the_indexed_document(
    runtime: Result<Runtime, BoxError>,
    postgres_harness: Result<PostgresHarness, BoxError>,
) -> Result<(), BoxError> {
    let runtime = runtime?;
    let harness = postgres_harness?;
    runtime.block_on(async {
        let [weather, _, _] = seed_directory(&harness).await?;

        // "forecasting" stems to the same lexeme as "Forecasts".
        let page = harness
            .registry
            .search(SearchAgentsRequest::new().with_query("forecasting"))
            .await?;
        assert_eq!(page.total, 1);
        assert_eq!(page.records[0].id(), weather);

        let miss = harness
            .registry
            .search(SearchAgentsRequest::new().with_query("submarine"))
            .await?;
        assert_eq!(miss.total, 0);
        Ok(())
    })
}

#[rstest]
#[ignore = "requires an embedded PostgreSQL server"]
fn structured_filters_compose_over_jsonb_columns(
    runtime: Result<Runtime, BoxError>,
    postgres_harness: Result<PostgresHarness, BoxError>,
) -> Result<(), BoxError> {
    let runtime = runtime?;
    let harness = postgres_harness?;
    runtime.block_on(async {
        let [weather, ledger, scout] = seed_directory(&harness).await?;

        let finance = harness
            .registry
            .search(SearchAgentsRequest::new().with_category("finance"))
            .await?;
        assert_eq!(finance.total, 2);

        let finance_pricing = harness
            .registry
            .search(
                SearchAgentsRequest::new()
                    .with_category("finance")
                    .with_tag("pricing"),
            )
            .await?;
        assert_eq!(finance_pricing.total, 1);
        assert_eq!(finance_pricing.records[0].id(), scout);

        let a2a = harness
            .registry
            .search(SearchAgentsRequest::new().with_protocol(ProtocolKind::A2a))
            .await?;
        assert_eq!(a2a.total, 1);
        assert_eq!(a2a.records[0].id(), weather);

        let mcp = harness
            .registry
            .search(SearchAgentsRequest::new().with_protocol(ProtocolKind::Mcp))
            .await?;
        assert_eq!(mcp.total, 1);
        assert_eq!(mcp.records[0].id(), ledger);
        Ok(())
    })
}

#[rstest]
#[ignore = "requires an embedded PostgreSQL server"]
fn pagination_reports_the_full_total(
    runtime: Result<Runtime, BoxError>,
    postgres_harness: Result<PostgresHarness, BoxError>,
) -> Result<(), BoxError> {
    let runtime = runtime?;
    let harness = postgres_harness?;
    runtime.block_on(async {
        seed_directory(&harness).await?;

        let first = harness
            .registry
            .search(SearchAgentsRequest::new().with_limit(2))
            .await?;
        assert_eq!(first.records.len(), 2);
        assert_eq!(first.total, 3);

        let second = harness
            .registry
            .search(SearchAgentsRequest::new().with_limit(2).with_offset(2))
            .await?;
        assert_eq!(second.records.len(), 1);
        assert_eq!(second.total, 3);

        // Newest registration leads the page.
        assert_eq!(first.records[0].name().as_str(), "Market Scout");
        Ok(())
    })
}

#[rstest]
#[ignore = "requires an embedded PostgreSQL server"]
fn aggregates_count_agents_and_categories(
    runtime: Result<Runtime, BoxError>,
    postgres_harness: Result<PostgresHarness, BoxError>,
) -> Result<(), BoxError> {
    let runtime = runtime?;
    let harness = postgres_harness?;
    runtime.block_on(async {
        seed_directory(&harness).await?;

        let stats = harness.registry.stats().await?;
        assert_eq!(stats.total_agents, 3);
        assert_eq!(stats.verified_agents, 0);
        assert_eq!(stats.a2a_agents, 1);
        assert_eq!(stats.mcp_agents, 1);

        let categories = harness.registry.categories().await?;
        let counts: Vec<(&str, u64)> = categories
            .iter()
            .map(|entry| (entry.slug.as_str(), entry.agent_count))
            .collect();
        // Most populated first, ties broken by slug.
        assert_eq!(counts, [("data", 2), ("finance", 2), ("weather", 1)]);
        Ok(())
    })
}

#[rstest]
#[ignore = "requires an embedded PostgreSQL server"]
fn rebuild_restores_a_dropped_search_document(
    runtime: Result<Runtime, BoxError>,
    postgres_harness: Result<PostgresHarness, BoxError>,
) -> Result<(), BoxError> {
    let runtime = runtime?;
    let harness = postgres_harness?;
    runtime.block_on(async {
        let [weather, _, _] = seed_directory(&harness).await?;

        harness.index.remove(weather).await?;
        let degraded = harness
            .registry
            .search(SearchAgentsRequest::new().with_query("weather"))
            .await?;
        assert_eq!(degraded.total, 0);

        let indexed = harness.registry.rebuild_search_index().await?;
        assert_eq!(indexed, 3);

        let repaired = harness
            .registry
            .search(SearchAgentsRequest::new().with_query("weather"))
            .await?;
        assert_eq!(repaired.total, 1);
        assert_eq!(repaired.records[0].id(), weather);
        Ok(())
    })
}
