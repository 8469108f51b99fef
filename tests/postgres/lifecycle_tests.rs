//! Verification and probe column round-trips over the `PostgreSQL`
//! repository.
//!
//! The targeted update paths (`store_challenge`, `mark_verified`,
//! `record_probe`) write individual columns; these tests check the
//! persisted shapes survive a full row reload.

use super::cluster::BoxError;
use super::helpers::{PostgresHarness, agent, postgres_harness, runtime};
use agora::directory::{
    domain::{
        AgentId, ChallengeToken, DomainName, OwnerRef, ProbeRecord, ProbeStatus,
        VerificationChallenge,
    },
    ports::AgentRepository,
};
use chrono::Utc;
use rstest::rstest;
use tokio::runtime::Runtime;

async fn registered_agent(harness: &PostgresHarness) -> Result<AgentId, BoxError> {
    let written = harness
        .registry
        .register(
            OwnerRef::new(),
            agent(
                "Weather Oracle",
                "Forecasts weather for any city",
                "https://weather.example.com/api",
            ),
        )
        .await?;
    Ok(written.record.id())
}

#[rstest]
#[ignore = "requires an embedded PostgreSQL server"]
fn stored_challenge_survives_a_row_reload(
    runtime: Result<Runtime, BoxError>,
    postgres_harness: Result<PostgresHarness, BoxError>,
) -> Result<(), BoxError> {
    let runtime = runtime?;
    let harness = postgres_harness?;
    runtime.block_on(async {
        let id = registered_agent(&harness).await?;
        let challenge =
            VerificationChallenge::new(DomainName::new("example.com")?, ChallengeToken::generate());

        let updated = harness
            .repository
            .store_challenge(id, &challenge, Utc::now())
            .await?
            .ok_or("challenged agent should exist")?;
        assert_eq!(updated.verification().challenge(), Some(&challenge));
        assert!(!updated.verification().verified());

        let reloaded = harness
            .repository
            .find_by_id(id)
            .await?
            .ok_or("agent should reload")?;
        assert_eq!(reloaded.verification().challenge(), Some(&challenge));
        Ok(())
    })
}

#[rstest]
#[ignore = "requires an embedded PostgreSQL server"]
fn marking_verified_sets_flag_and_instant(
    runtime: Result<Runtime, BoxError>,
    postgres_harness: Result<PostgresHarness, BoxError>,
) -> Result<(), BoxError> {
    let runtime = runtime?;
    let harness = postgres_harness?;
    runtime.block_on(async {
        let id = registered_agent(&harness).await?;
        let challenge =
            VerificationChallenge::new(DomainName::new("example.com")?, ChallengeToken::generate());
        harness
            .repository
            .store_challenge(id, &challenge, Utc::now())
            .await?;

        let at = Utc::now();
        let verified = harness
            .repository
            .mark_verified(id, at)
            .await?
            .ok_or("verified agent should exist")?;
        assert!(verified.verification().verified());
        let instant = verified
            .verification()
            .verified_at()
            .ok_or("verified_at should be set")?;
        assert_eq!(instant.timestamp_micros(), at.timestamp_micros());
        // The proving challenge stays inspectable after confirmation.
        assert_eq!(verified.verification().challenge(), Some(&challenge));
        Ok(())
    })
}

#[rstest]
#[ignore = "requires an embedded PostgreSQL server"]
fn probe_outcomes_round_trip_as_canonical_strings(
    runtime: Result<Runtime, BoxError>,
    postgres_harness: Result<PostgresHarness, BoxError>,
) -> Result<(), BoxError> {
    let runtime = runtime?;
    let harness = postgres_harness?;
    runtime.block_on(async {
        let id = registered_agent(&harness).await?;

        for status in [
            ProbeStatus::from_status_code(200),
            ProbeStatus::from_status_code(503),
            ProbeStatus::unreachable("connection timed out"),
        ] {
            let probe = ProbeRecord::new(status.clone(), Utc::now());
            harness.repository.record_probe(id, &probe).await?;

            let reloaded = harness
                .repository
                .find_by_id(id)
                .await?
                .ok_or("agent should reload")?;
            let stored = reloaded.last_probe().ok_or("probe should be recorded")?;
            assert_eq!(stored.status(), &status);
            assert_eq!(
                stored.checked_at().timestamp_micros(),
                probe.checked_at().timestamp_micros()
            );
        }
        Ok(())
    })
}

#[rstest]
#[ignore = "requires an embedded PostgreSQL server"]
fn overlong_unreachable_reason_is_stored_truncated(
    runtime: Result<Runtime, BoxError>,
    postgres_harness: Result<PostgresHarness, BoxError>,
) -> Result<(), BoxError> {
    let runtime = runtime?;
    let harness = postgres_harness?;
    runtime.block_on(async {
        let id = registered_agent(&harness).await?;

        let status = ProbeStatus::unreachable("x".repeat(500));
        harness
            .repository
            .record_probe(id, &ProbeRecord::new(status, Utc::now()))
            .await?;

        let reloaded = harness
            .repository
            .find_by_id(id)
            .await?
            .ok_or("agent should reload")?;
        let stored = reloaded.last_probe().ok_or("probe should be recorded")?;
        assert_eq!(stored.status().to_string(), format!("unreachable:{}", "x".repeat(100)));
        Ok(())
    })
}

#[rstest]
#[ignore = "requires an embedded PostgreSQL server"]
fn targeted_updates_miss_unknown_agents(
    runtime: Result<Runtime, BoxError>,
    postgres_harness: Result<PostgresHarness, BoxError>,
) -> Result<(), BoxError> {
    let runtime = runtime?;
    let harness = postgres_harness?;
    runtime.block_on(async {
        let ghost = AgentId::new();
        let challenge =
            VerificationChallenge::new(DomainName::new("example.com")?, ChallengeToken::generate());

        let challenged = harness
            .repository
            .store_challenge(ghost, &challenge, Utc::now())
            .await?;
        assert!(challenged.is_none());

        let verified = harness.repository.mark_verified(ghost, Utc::now()).await?;
        assert!(verified.is_none());

        let probed = harness
            .repository
            .record_probe(
                ghost,
                &ProbeRecord::new(ProbeStatus::from_status_code(200), Utc::now()),
            )
            .await?;
        assert!(probed.is_none());
        Ok(())
    })
}
