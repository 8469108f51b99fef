//! Provider descriptor for registered agents.

use serde::{Deserialize, Serialize};

/// Organization metadata the registrant supplies about an agent's operator.
///
/// Every field is optional; a descriptor with no fields set is treated as
/// absent at the persistence edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProvider {
    organization: Option<String>,
    contact: Option<String>,
    url: Option<String>,
}

impl AgentProvider {
    /// Creates an empty provider descriptor.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            organization: None,
            contact: None,
            url: None,
        }
    }

    /// Sets the operating organization.
    #[must_use]
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Sets a contact address.
    #[must_use]
    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    /// Sets the provider's website URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Returns the operating organization.
    #[must_use]
    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    /// Returns the contact address.
    #[must_use]
    pub fn contact(&self) -> Option<&str> {
        self.contact.as_deref()
    }

    /// Returns the provider's website URL.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Returns `true` when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.organization.is_none() && self.contact.is_none() && self.url.is_none()
    }

    /// Merges another descriptor over this one, field by field.
    ///
    /// Fields present in `patch` replace the current value; absent fields are
    /// left untouched. This backs partial update semantics for provider
    /// sub-fields.
    pub fn merge(&mut self, patch: Self) {
        if let Some(organization) = patch.organization {
            self.organization = Some(organization);
        }
        if let Some(contact) = patch.contact {
            self.contact = Some(contact);
        }
        if let Some(url) = patch.url {
            self.url = Some(url);
        }
    }
}
