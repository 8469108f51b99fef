//! Record round-trips, patches, and deletion cascades over the
//! `PostgreSQL` adapters.
//!
//! Timestamps are compared at microsecond precision because `timestamptz`
//! truncates the nanoseconds chrono produces.

use super::cluster::BoxError;
use super::helpers::{PostgresHarness, agent, postgres_harness, runtime};
use agora::credential::services::CredentialService;
use agora::directory::{
    domain::{AgentCapability, AgentProvider, OwnerRef},
    ports::{AgentRepository, AgentRepositoryError, SearchIndex},
    services::{RegisterAgentRequest, SearchIndexSync, UpdateAgentRequest},
};
use mockable::DefaultClock;
use rstest::rstest;
use std::sync::Arc;
use tokio::runtime::Runtime;

fn full_request() -> RegisterAgentRequest {
    agent(
        "Weather Oracle",
        "Forecasts weather for any city",
        "https://weather.example.com/api",
    )
    .with_version("2.1.0")
    .with_provider(
        AgentProvider::new()
            .with_organization("Acme Weather")
            .with_url("https://acme-weather.example.com"),
    )
    .with_capabilities(vec![
        AgentCapability::new("forecast", "Forecast")
            .with_description("Five day forecasts")
            .with_input_modes(vec!["text".to_owned()]),
        AgentCapability::new("alerts", "Severe Weather Alerts"),
    ])
    .with_categories(["weather".to_owned(), "data".to_owned()])
    .with_tags(["forecast".to_owned(), "meteo".to_owned()])
    .with_a2a_agent_card_url("https://weather.example.com/.well-known/agent.json")
    .with_auth_schemes(["bearer".to_owned()])
}

#[rstest]
#[ignore = "requires an embedded PostgreSQL server"]
fn inserted_record_round_trips_jsonb_columns(
    runtime: Result<Runtime, BoxError>,
    postgres_harness: Result<PostgresHarness, BoxError>,
) -> Result<(), BoxError> {
    let runtime = runtime?;
    let harness = postgres_harness?;
    runtime.block_on(async {
        let owner = OwnerRef::new();
        let written = harness.registry.register(owner, full_request()).await?;
        assert_eq!(written.index_sync, SearchIndexSync::Synced);

        let stored = harness
            .registry
            .find_by_id(written.record.id())
            .await?
            .ok_or("record should exist after insert")?;

        assert_eq!(stored.name().as_str(), "Weather Oracle");
        assert_eq!(stored.version(), Some("2.1.0"));
        assert_eq!(stored.capabilities(), written.record.capabilities());
        assert_eq!(stored.categories(), ["weather", "data"]);
        assert_eq!(stored.tags(), ["forecast", "meteo"]);
        assert_eq!(stored.auth_schemes(), ["bearer"]);
        assert_eq!(
            stored.provider().and_then(AgentProvider::organization),
            Some("Acme Weather")
        );
        assert_eq!(
            stored.protocols().a2a_agent_card_url().map(|u| u.as_str()),
            Some("https://weather.example.com/.well-known/agent.json")
        );
        assert!(stored.is_owned_by(owner));
        assert!(!stored.verification().verified());
        assert!(stored.last_probe().is_none());
        assert_eq!(
            stored.registered_at().timestamp_micros(),
            written.record.registered_at().timestamp_micros()
        );
        Ok(())
    })
}

#[rstest]
#[ignore = "requires an embedded PostgreSQL server"]
fn duplicate_insert_reports_the_agent_id(
    runtime: Result<Runtime, BoxError>,
    postgres_harness: Result<PostgresHarness, BoxError>,
) -> Result<(), BoxError> {
    let runtime = runtime?;
    let harness = postgres_harness?;
    runtime.block_on(async {
        let written = harness
            .registry
            .register(OwnerRef::new(), full_request())
            .await?;
        let id = written.record.id();

        let second = harness.repository.insert(&written.record).await;
        assert!(matches!(
            second,
            Err(AgentRepositoryError::Duplicate(duplicate)) if duplicate == id
        ));
        Ok(())
    })
}

#[rstest]
#[ignore = "requires an embedded PostgreSQL server"]
fn partial_update_merges_provider_and_keeps_collections(
    runtime: Result<Runtime, BoxError>,
    postgres_harness: Result<PostgresHarness, BoxError>,
) -> Result<(), BoxError> {
    let runtime = runtime?;
    let harness = postgres_harness?;
    runtime.block_on(async {
        let owner = OwnerRef::new();
        let created = harness.registry.register(owner, full_request()).await?.record;

        let updated = harness
            .registry
            .update(
                owner,
                created.id(),
                UpdateAgentRequest::new()
                    .with_description("Forecasts and historical climate data")
                    .with_provider(AgentProvider::new().with_contact("ops@acme.example.com")),
            )
            .await?
            .record;

        let provider = updated.provider().ok_or("provider should survive a patch")?;
        assert_eq!(provider.organization(), Some("Acme Weather"));
        assert_eq!(provider.contact(), Some("ops@acme.example.com"));
        assert_eq!(provider.url(), Some("https://acme-weather.example.com"));

        assert_eq!(
            updated.description().as_str(),
            "Forecasts and historical climate data"
        );
        assert_eq!(updated.capabilities(), created.capabilities());
        assert_eq!(updated.categories(), created.categories());
        assert_eq!(updated.tags(), created.tags());
        assert_eq!(
            updated.registered_at().timestamp_micros(),
            created.registered_at().timestamp_micros()
        );
        Ok(())
    })
}

#[rstest]
#[ignore = "requires an embedded PostgreSQL server"]
fn deletion_cascades_to_the_search_document(
    runtime: Result<Runtime, BoxError>,
    postgres_harness: Result<PostgresHarness, BoxError>,
) -> Result<(), BoxError> {
    let runtime = runtime?;
    let harness = postgres_harness?;
    runtime.block_on(async {
        let owner = OwnerRef::new();
        let created = harness.registry.register(owner, full_request()).await?.record;
        assert_eq!(harness.index.match_ids("weather").await?, [created.id()]);

        let sync = harness.registry.delete(owner, created.id()).await?;
        assert_eq!(sync, SearchIndexSync::Synced);

        assert!(harness.registry.find_by_id(created.id()).await?.is_none());
        assert!(harness.index.match_ids("weather").await?.is_empty());

        // A second delete finds no row.
        assert!(!harness.repository.delete(created.id()).await?);
        Ok(())
    })
}

#[rstest]
#[ignore = "requires an embedded PostgreSQL server"]
fn issued_credential_authenticates_and_marks_use(
    runtime: Result<Runtime, BoxError>,
    postgres_harness: Result<PostgresHarness, BoxError>,
) -> Result<(), BoxError> {
    let runtime = runtime?;
    let harness = postgres_harness?;
    runtime.block_on(async {
        let service =
            CredentialService::new(Arc::clone(&harness.credentials), Arc::new(DefaultClock));

        let issued = service.issue(Some("ci deploys")).await?;
        assert!(issued.credential.last_used_at().is_none());

        let authenticated = service
            .authenticate(issued.key.as_str())
            .await?
            .ok_or("issued key should authenticate")?;
        assert_eq!(authenticated.id(), issued.credential.id());
        assert_eq!(authenticated.label(), Some("ci deploys"));
        assert!(authenticated.last_used_at().is_some());

        assert!(service.authenticate("agora_not_a_real_key").await?.is_none());
        Ok(())
    })
}
