//! Query composition types for the record store.

use super::{AgentId, AgentStatus, DirectoryDomainError, ProtocolKind, record::AgentRecord};

/// Default page size when the caller supplies none.
const DEFAULT_LIMIT: u32 = 20;

/// Largest accepted page size.
const MAX_LIMIT: u32 = 100;

/// Validated pagination bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    limit: u32,
    offset: u32,
}

impl PageBounds {
    /// Creates pagination bounds from optional caller values.
    ///
    /// A missing limit defaults to 20, a missing offset to 0.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::LimitOutOfRange`] when an explicit
    /// limit falls outside 1..=100.
    pub fn new(limit: Option<u32>, offset: Option<u32>) -> Result<Self, DirectoryDomainError> {
        let page_limit = limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&page_limit) {
            return Err(DirectoryDomainError::LimitOutOfRange(page_limit));
        }
        Ok(Self {
            limit: page_limit,
            offset: offset.unwrap_or(0),
        })
    }

    /// Returns the page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the number of rows skipped before the page.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }
}

impl Default for PageBounds {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Structured predicate set evaluated by the record store.
///
/// All predicates are AND-composed. Candidates, when present, restrict the
/// result to ids produced by a preceding free-text index lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    candidates: Option<Vec<AgentId>>,
    category: Option<String>,
    tag: Option<String>,
    protocol: Option<ProtocolKind>,
    verified: Option<bool>,
    status: Option<AgentStatus>,
    page: PageBounds,
}

impl RecordQuery {
    /// Creates a query returning everything within the given page bounds.
    #[must_use]
    pub fn new(page: PageBounds) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    /// Restricts results to the given candidate ids.
    #[must_use]
    pub fn with_candidates(mut self, candidates: Vec<AgentId>) -> Self {
        self.candidates = Some(candidates);
        self
    }

    /// Requires membership of the given category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Requires membership of the given tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Requires a binding for the given protocol.
    #[must_use]
    pub const fn with_protocol(mut self, protocol: ProtocolKind) -> Self {
        self.protocol = Some(protocol);
        self
    }

    /// Requires the given verified flag.
    #[must_use]
    pub const fn with_verified(mut self, verified: bool) -> Self {
        self.verified = Some(verified);
        self
    }

    /// Requires the given lifecycle status.
    #[must_use]
    pub const fn with_status(mut self, status: AgentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns the candidate id restriction.
    #[must_use]
    pub fn candidates(&self) -> Option<&[AgentId]> {
        self.candidates.as_deref()
    }

    /// Returns the category predicate.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Returns the tag predicate.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Returns the protocol-presence predicate.
    #[must_use]
    pub const fn protocol(&self) -> Option<ProtocolKind> {
        self.protocol
    }

    /// Returns the verified-flag predicate.
    #[must_use]
    pub const fn verified(&self) -> Option<bool> {
        self.verified
    }

    /// Returns the status predicate.
    #[must_use]
    pub const fn status(&self) -> Option<AgentStatus> {
        self.status
    }

    /// Returns the pagination bounds.
    #[must_use]
    pub const fn page(&self) -> PageBounds {
        self.page
    }

    /// Tests a record against every predicate except candidates and paging.
    ///
    /// Category and tag membership are element-equality checks on the full
    /// collection, never substring matches.
    #[must_use]
    pub fn matches(&self, record: &AgentRecord) -> bool {
        self.category
            .as_deref()
            .is_none_or(|category| record.categories().iter().any(|c| c.as_str() == category))
            && self
                .tag
                .as_deref()
                .is_none_or(|tag| record.tags().iter().any(|t| t.as_str() == tag))
            && self
                .protocol
                .is_none_or(|protocol| record.protocols().binds(protocol))
            && self
                .verified
                .is_none_or(|verified| record.verification().verified() == verified)
            && self
                .status
                .is_none_or(|status| record.status() == status)
    }
}

/// One page of matching records plus the pre-pagination total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPage {
    /// Records on this page, most recently registered first.
    pub records: Vec<AgentRecord>,
    /// Total number of matches across all pages.
    pub total: u64,
}
