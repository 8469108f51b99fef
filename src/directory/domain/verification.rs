//! Domain-ownership verification state and challenge types.

use super::DirectoryDomainError;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a DNS domain name, in characters.
const MAX_DOMAIN_LENGTH: usize = 253;

/// Prefix of the TXT record name a registrant must publish.
const RECORD_PREFIX: &str = "_agora-verify";

/// Prefix of every challenge token value.
const TOKEN_PREFIX: &str = "agora-verify=";

/// Validated DNS domain an agent claims ownership of.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainName(String);

impl DomainName {
    /// Creates a validated domain name.
    ///
    /// The input is trimmed and lowercased (DNS names are case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyDomainName`] when the value is
    /// empty after trimming, [`DirectoryDomainError::InvalidDomainName`] when
    /// it contains whitespace or control characters, or
    /// [`DirectoryDomainError::DomainNameTooLong`] when it exceeds the
    /// 253-character DNS limit.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();

        if normalized.is_empty() {
            return Err(DirectoryDomainError::EmptyDomainName);
        }

        if normalized.chars().count() > MAX_DOMAIN_LENGTH {
            return Err(DirectoryDomainError::DomainNameTooLong(raw));
        }

        let is_valid = normalized
            .chars()
            .all(|c| !c.is_whitespace() && !c.is_control());

        if !is_valid {
            return Err(DirectoryDomainError::InvalidDomainName(raw));
        }

        Ok(Self(normalized))
    }

    /// Returns the domain as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the TXT record name a registrant must publish for this
    /// domain, e.g. `_agora-verify.example.com`.
    #[must_use]
    pub fn verification_record_name(&self) -> String {
        format!("{RECORD_PREFIX}.{}", self.0)
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unpredictable challenge value published via DNS TXT to prove domain
/// control.
///
/// Tokens read `agora-verify=<32 hex>`: the namespace prefix keeps them
/// visually distinguishable from unrelated TXT records, and the 16 random
/// bytes give 128 bits of entropy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeToken(String);

impl ChallengeToken {
    /// Generates a fresh random challenge token.
    #[must_use]
    pub fn generate() -> Self {
        let value: u128 = rand::rng().random();
        Self(format!("{TOKEN_PREFIX}{value:032x}"))
    }

    /// Validates a token loaded from persistence.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::InvalidChallengeToken`] when the value
    /// does not match the `agora-verify=<32 hex>` shape.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let raw = value.into();
        let is_valid = raw.strip_prefix(TOKEN_PREFIX).is_some_and(|hex| {
            hex.len() == 32 && hex.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
        });

        if !is_valid {
            return Err(DirectoryDomainError::InvalidChallengeToken(raw));
        }

        Ok(Self(raw))
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ChallengeToken {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ChallengeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A pending domain-ownership challenge: the claimed domain plus the token
/// the registrant must publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationChallenge {
    domain: DomainName,
    token: ChallengeToken,
}

impl VerificationChallenge {
    /// Creates a challenge pair.
    #[must_use]
    pub const fn new(domain: DomainName, token: ChallengeToken) -> Self {
        Self { domain, token }
    }

    /// Returns the claimed domain.
    #[must_use]
    pub const fn domain(&self) -> &DomainName {
        &self.domain
    }

    /// Returns the challenge token.
    #[must_use]
    pub const fn token(&self) -> &ChallengeToken {
        &self.token
    }
}

/// Verification state carried on every agent record.
///
/// States progress unset → pending (challenge issued) → verified. Issuing a
/// new challenge never clears an existing verified flag; only a successful
/// confirmation moves it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationState {
    challenge: Option<VerificationChallenge>,
    verified: bool,
    verified_at: Option<DateTime<Utc>>,
}

impl VerificationState {
    /// Creates the unset state: no challenge, not verified.
    #[must_use]
    pub const fn unset() -> Self {
        Self {
            challenge: None,
            verified: false,
            verified_at: None,
        }
    }

    /// Reconstructs verification state from persisted columns.
    ///
    /// A challenge exists only when both domain and token survived; a
    /// half-present pair is treated as no pending challenge.
    #[must_use]
    pub fn from_persisted(
        domain: Option<DomainName>,
        token: Option<ChallengeToken>,
        verified: bool,
        verified_at: Option<DateTime<Utc>>,
    ) -> Self {
        let challenge = domain
            .zip(token)
            .map(|(domain, token)| VerificationChallenge::new(domain, token));
        Self {
            challenge,
            verified,
            verified_at,
        }
    }

    /// Replaces the pending challenge, leaving the verified flag untouched.
    pub fn issue(&mut self, challenge: VerificationChallenge) {
        self.challenge = Some(challenge);
    }

    /// Marks the state verified at the given instant.
    ///
    /// The pending challenge is retained, so the proof that succeeded stays
    /// inspectable and the domain can be re-confirmed later.
    pub fn mark_verified(&mut self, at: DateTime<Utc>) {
        self.verified = true;
        self.verified_at = Some(at);
    }

    /// Returns the pending challenge, if any.
    #[must_use]
    pub const fn challenge(&self) -> Option<&VerificationChallenge> {
        self.challenge.as_ref()
    }

    /// Returns `true` once a confirmation has succeeded.
    #[must_use]
    pub const fn verified(&self) -> bool {
        self.verified
    }

    /// Returns the instant of the last successful confirmation.
    #[must_use]
    pub const fn verified_at(&self) -> Option<DateTime<Utc>> {
        self.verified_at
    }
}
