//! Domain verification flows: challenge issue, confirmation outcomes, and
//! re-verification.

use crate::in_memory::helpers::{DirectoryHarness, agent, harness};
use agora::directory::{
    domain::{AgentId, AgentRecord, DirectoryDomainError, OwnerRef},
    services::{ConfirmOutcome, DomainVerificationServiceError},
};
use rstest::rstest;

async fn registered_agent(harness: &DirectoryHarness) -> AgentRecord {
    harness
        .registry
        .register(
            OwnerRef::new(),
            agent(
                "Weather Oracle",
                "Forecasts weather for any city",
                "https://weather.example.com",
            ),
        )
        .await
        .expect("registration should succeed")
        .record
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn initiate_issues_namespaced_instructions(harness: DirectoryHarness) {
    let record = registered_agent(&harness).await;

    let challenge = harness
        .verification
        .initiate(record.id(), "Example.COM")
        .await
        .expect("initiate should succeed");

    assert_eq!(challenge.domain.as_str(), "example.com");
    assert!(challenge.token.as_str().starts_with("agora-verify="));
    assert_eq!(
        challenge.instructions.record_name,
        "_agora-verify.example.com"
    );
    assert_eq!(challenge.instructions.value, challenge.token.as_str());

    let stored = harness
        .registry
        .find_by_id(record.id())
        .await
        .expect("lookup should succeed")
        .expect("record should exist");
    let pending = stored
        .verification()
        .challenge()
        .expect("challenge should be pending");
    assert_eq!(pending.token(), &challenge.token);
    assert!(!stored.verification().verified());
    assert!(stored.updated_at() >= record.updated_at());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn confirm_before_dns_exists_is_a_failed_lookup(harness: DirectoryHarness) {
    let record = registered_agent(&harness).await;
    harness
        .verification
        .initiate(record.id(), "example.com")
        .await
        .expect("initiate should succeed");

    let outcome = harness
        .verification
        .confirm(record.id())
        .await
        .expect("confirm should succeed");

    assert!(matches!(outcome, ConfirmOutcome::LookupFailed { .. }));
    let stored = harness
        .registry
        .find_by_id(record.id())
        .await
        .expect("lookup should succeed")
        .expect("record should exist");
    assert!(!stored.verification().verified());
    assert!(stored.verification().verified_at().is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn wrong_txt_value_is_a_token_mismatch(harness: DirectoryHarness) {
    let record = registered_agent(&harness).await;
    harness
        .verification
        .initiate(record.id(), "example.com")
        .await
        .expect("initiate should succeed");

    harness.resolver.set_records(
        "_agora-verify.example.com",
        vec!["agora-verify=00000000000000000000000000000000".to_owned()],
    );

    let outcome = harness
        .verification
        .confirm(record.id())
        .await
        .expect("confirm should succeed");

    match outcome {
        ConfirmOutcome::TokenMismatch { domain, .. } => {
            assert_eq!(domain.as_str(), "example.com");
        }
        other => panic!("expected token mismatch, got {other:?}"),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn published_token_verifies_the_record(harness: DirectoryHarness) {
    let record = registered_agent(&harness).await;
    let challenge = harness
        .verification
        .initiate(record.id(), "example.com")
        .await
        .expect("initiate should succeed");

    // Unrelated TXT values alongside the token must not confuse matching.
    harness.resolver.set_records(
        "_agora-verify.example.com",
        vec![
            "v=spf1 -all".to_owned(),
            challenge.token.as_str().to_owned(),
        ],
    );

    let outcome = harness
        .verification
        .confirm(record.id())
        .await
        .expect("confirm should succeed");
    assert!(matches!(outcome, ConfirmOutcome::Verified(_)));

    let stored = harness
        .registry
        .find_by_id(record.id())
        .await
        .expect("lookup should succeed")
        .expect("record should exist");
    assert!(stored.verification().verified());
    assert!(stored.verification().verified_at().is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reinitiating_replaces_the_checked_token(harness: DirectoryHarness) {
    let record = registered_agent(&harness).await;
    let first = harness
        .verification
        .initiate(record.id(), "example.com")
        .await
        .expect("initiate should succeed");
    let second = harness
        .verification
        .initiate(record.id(), "example.com")
        .await
        .expect("initiate should succeed");
    assert_ne!(first.token, second.token);

    // The superseded token no longer satisfies confirmation.
    harness.resolver.set_records(
        "_agora-verify.example.com",
        vec![first.token.as_str().to_owned()],
    );
    let stale = harness
        .verification
        .confirm(record.id())
        .await
        .expect("confirm should succeed");
    assert!(matches!(stale, ConfirmOutcome::TokenMismatch { .. }));

    harness.resolver.set_records(
        "_agora-verify.example.com",
        vec![second.token.as_str().to_owned()],
    );
    let fresh = harness
        .verification
        .confirm(record.id())
        .await
        .expect("confirm should succeed");
    assert!(matches!(fresh, ConfirmOutcome::Verified(_)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reinitiating_while_verified_keeps_the_flag(harness: DirectoryHarness) {
    let record = registered_agent(&harness).await;
    let challenge = harness
        .verification
        .initiate(record.id(), "example.com")
        .await
        .expect("initiate should succeed");
    harness.resolver.set_records(
        "_agora-verify.example.com",
        vec![challenge.token.as_str().to_owned()],
    );
    harness
        .verification
        .confirm(record.id())
        .await
        .expect("confirm should succeed");

    harness
        .verification
        .initiate(record.id(), "other.example.net")
        .await
        .expect("re-initiate should succeed");

    let stored = harness
        .registry
        .find_by_id(record.id())
        .await
        .expect("lookup should succeed")
        .expect("record should exist");
    assert!(stored.verification().verified());
    assert_eq!(
        stored
            .verification()
            .challenge()
            .expect("challenge should be pending")
            .domain()
            .as_str(),
        "other.example.net"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn confirm_without_challenge_reports_no_pending(harness: DirectoryHarness) {
    let record = registered_agent(&harness).await;

    let result = harness.verification.confirm(record.id()).await;

    assert!(matches!(
        result,
        Err(DomainVerificationServiceError::Domain(
            DirectoryDomainError::NoPendingChallenge
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_agent_cannot_be_verified(harness: DirectoryHarness) {
    let result = harness
        .verification
        .initiate(AgentId::new(), "example.com")
        .await;

    assert!(matches!(
        result,
        Err(DomainVerificationServiceError::Repository(_))
    ));
}
