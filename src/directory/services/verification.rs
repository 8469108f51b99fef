//! Service layer for domain-ownership verification.
//!
//! Provides [`DomainVerificationService`] which issues DNS challenge tokens
//! and confirms them against live TXT records, moving agent records between
//! verification states.

use crate::directory::{
    domain::{
        AgentId, AgentRecord, ChallengeToken, DirectoryDomainError, DomainName,
        VerificationChallenge,
    },
    ports::{AgentRepository, AgentRepositoryError, TxtResolver},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// DNS TXT record a registrant must publish to prove domain ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsTxtInstructions {
    /// Fully qualified name of the TXT record to create.
    pub record_name: String,
    /// Exact value the TXT record must carry.
    pub value: String,
    /// Human-readable summary of the required DNS change.
    pub description: String,
}

/// Challenge issued by [`DomainVerificationService::initiate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiatedVerification {
    /// Domain the challenge covers.
    pub domain: DomainName,
    /// Token the registrant must publish.
    pub token: ChallengeToken,
    /// TXT record to create, in machine-readable form.
    pub instructions: DnsTxtInstructions,
}

/// Outcome of a confirmation attempt.
///
/// `TokenMismatch` and `LookupFailed` are deliberately distinct: a mismatch
/// means the registrant's DNS is wrong and retrying without a change is
/// pointless, while a failed lookup is transient and worth retrying.
#[derive(Debug, Clone)]
pub enum ConfirmOutcome {
    /// The token was found; the record is now verified.
    Verified(AgentRecord),
    /// The lookup succeeded but no TXT value matched the issued token.
    TokenMismatch {
        /// Domain that was queried.
        domain: DomainName,
        /// Token the TXT record was expected to carry.
        expected: ChallengeToken,
    },
    /// DNS resolution itself failed.
    LookupFailed {
        /// Resolver error description.
        reason: String,
    },
}

/// Service-level errors for verification operations.
#[derive(Debug, Error)]
pub enum DomainVerificationServiceError {
    /// Domain validation failed or no challenge is pending.
    #[error(transparent)]
    Domain(#[from] DirectoryDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] AgentRepositoryError),
}

/// Result type for verification service operations.
pub type DomainVerificationServiceResult<T> = Result<T, DomainVerificationServiceError>;

/// Domain-ownership verification orchestration service.
#[derive(Clone)]
pub struct DomainVerificationService<R, D, C>
where
    R: AgentRepository,
    D: TxtResolver,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    resolver: Arc<D>,
    clock: Arc<C>,
}

impl<R, D, C> DomainVerificationService<R, D, C>
where
    R: AgentRepository,
    D: TxtResolver,
    C: Clock + Send + Sync,
{
    /// Creates a new verification service.
    #[must_use]
    pub const fn new(repository: Arc<R>, resolver: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            repository,
            resolver,
            clock,
        }
    }

    /// Issues a fresh challenge token for a claimed domain.
    ///
    /// Any prior pending challenge is replaced; two racing initiations are
    /// last-write-wins and a later confirm checks the last writer's token.
    /// An existing verified flag stays untouched until a new confirmation
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`DomainVerificationServiceError::Domain`] when the domain
    /// name fails validation, and [`DomainVerificationServiceError::Repository`]
    /// when the agent is not found or persistence fails.
    pub async fn initiate(
        &self,
        id: AgentId,
        domain: impl Into<String>,
    ) -> DomainVerificationServiceResult<InitiatedVerification> {
        let claimed = DomainName::new(domain)?;
        let challenge = VerificationChallenge::new(claimed, ChallengeToken::generate());

        self.repository
            .store_challenge(id, &challenge, self.clock.utc())
            .await?
            .ok_or_else(|| AgentRepositoryError::NotFound(id))?;

        Ok(build_instructions(&challenge))
    }

    /// Checks the pending challenge against live DNS TXT records.
    ///
    /// Looks up `_agora-verify.<domain>` and marks the record verified iff
    /// the issued token appears among the returned TXT values. A resolution
    /// failure leaves the record untouched and reports
    /// [`ConfirmOutcome::LookupFailed`].
    ///
    /// # Errors
    ///
    /// Returns [`DomainVerificationServiceError::Domain`] when no challenge
    /// is pending, and [`DomainVerificationServiceError::Repository`] when
    /// the agent is not found or persistence fails.
    pub async fn confirm(&self, id: AgentId) -> DomainVerificationServiceResult<ConfirmOutcome> {
        let record = self.find_by_id_or_error(id).await?;
        let challenge = record
            .verification()
            .challenge()
            .ok_or(DirectoryDomainError::NoPendingChallenge)?
            .clone();

        let record_name = challenge.domain().verification_record_name();
        let values = match self.resolver.lookup_txt(&record_name).await {
            Ok(values) => values,
            Err(err) => {
                return Ok(ConfirmOutcome::LookupFailed {
                    reason: err.to_string(),
                });
            }
        };

        if values
            .iter()
            .any(|value| value.as_str() == challenge.token().as_str())
        {
            let verified = self
                .repository
                .mark_verified(id, self.clock.utc())
                .await?
                .ok_or_else(|| AgentRepositoryError::NotFound(id))?;
            return Ok(ConfirmOutcome::Verified(verified));
        }

        Ok(ConfirmOutcome::TokenMismatch {
            domain: challenge.domain().clone(),
            expected: challenge.token().clone(),
        })
    }

    async fn find_by_id_or_error(&self, id: AgentId) -> DomainVerificationServiceResult<AgentRecord> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AgentRepositoryError::NotFound(id).into())
    }
}

fn build_instructions(challenge: &VerificationChallenge) -> InitiatedVerification {
    let record_name = challenge.domain().verification_record_name();
    let token = challenge.token().as_str();
    let description = format!("Add a TXT record for {record_name} with the value: {token}");

    InitiatedVerification {
        domain: challenge.domain().clone(),
        token: challenge.token().clone(),
        instructions: DnsTxtInstructions {
            value: token.to_owned(),
            record_name,
            description,
        },
    }
}
