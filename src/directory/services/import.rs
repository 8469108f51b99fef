//! A2A agent-card import mapping.
//!
//! Maps an externally-fetched agent-card document into a registration
//! request. Fetching and JSON parsing are the caller's job; the mapped
//! request is validated and stored exactly like a manual registration.

use super::registry::RegisterAgentRequest;
use crate::directory::domain::{AgentCapability, AgentProvider};
use serde::Deserialize;

/// An A2A agent-card document as published at
/// `/.well-known/agent.json`.
///
/// Every field is optional; the mapping substitutes fallbacks for anything
/// the card leaves out.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentCard {
    /// Display name.
    pub name: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Service endpoint URL.
    pub url: Option<String>,
    /// Published version string.
    pub version: Option<String>,
    /// Provider organization block.
    pub provider: Option<CardProvider>,
    /// Skill descriptors, the usual field name.
    pub skills: Option<Vec<CardSkill>>,
    /// Skill descriptors under the older field name.
    pub capabilities: Option<Vec<CardSkill>>,
    /// Category slugs.
    pub categories: Option<Vec<String>>,
    /// Free-form tags.
    pub tags: Option<Vec<String>>,
    /// Authentication block.
    pub authentication: Option<CardAuthentication>,
}

/// Provider block of an agent card.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardProvider {
    /// Organization name.
    pub organization: Option<String>,
    /// Contact address.
    pub contact: Option<String>,
    /// Organization URL.
    pub url: Option<String>,
}

/// Skill descriptor of an agent card.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardSkill {
    /// Stable skill identifier.
    pub id: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Accepted input modes.
    pub input_modes: Option<Vec<String>>,
    /// Produced output modes.
    pub output_modes: Option<Vec<String>>,
}

/// Authentication block of an agent card.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardAuthentication {
    /// Accepted authentication scheme identifiers.
    pub schemes: Option<Vec<String>>,
}

/// Maps an agent card fetched from `card_url` into a registration request.
///
/// Missing or empty card fields fall back to placeholders: the name becomes
/// "Unknown Agent", the description "Imported from A2A Agent Card", and the
/// endpoint the card URL with its `/.well-known/agent.json` suffix removed.
/// The A2A protocol binding always points at `card_url` itself.
#[must_use]
pub fn registration_from_card(card: AgentCard, card_url: &str) -> RegisterAgentRequest {
    let AgentCard {
        name,
        description,
        url,
        version,
        provider,
        skills,
        capabilities,
        categories,
        tags,
        authentication,
    } = card;

    let endpoint = non_empty(url)
        .unwrap_or_else(|| card_url.replace("/.well-known/agent.json", ""));
    let descriptors = skills.or(capabilities).unwrap_or_default();

    let mut request = RegisterAgentRequest::new(
        non_empty(name).unwrap_or_else(|| "Unknown Agent".to_owned()),
        non_empty(description).unwrap_or_else(|| "Imported from A2A Agent Card".to_owned()),
        endpoint,
    )
    .with_a2a_agent_card_url(card_url)
    .with_capabilities(descriptors.into_iter().map(map_skill).collect())
    .with_categories(categories.unwrap_or_default())
    .with_tags(tags.unwrap_or_default())
    .with_auth_schemes(
        authentication
            .and_then(|auth| auth.schemes)
            .unwrap_or_default(),
    );

    if let Some(value) = non_empty(version) {
        request = request.with_version(value);
    }
    if let Some(block) = provider {
        request = request.with_provider(map_provider(block));
    }
    request
}

fn map_skill(skill: CardSkill) -> AgentCapability {
    let CardSkill {
        id,
        name,
        description,
        input_modes,
        output_modes,
    } = skill;

    let raw_id = non_empty(id);
    let raw_name = non_empty(name);
    let capability_id = raw_id
        .clone()
        .or_else(|| raw_name.as_deref().map(slugify))
        .unwrap_or_else(|| "unknown".to_owned());
    let capability_name = raw_name.or(raw_id).unwrap_or_else(|| "Unknown".to_owned());

    let mut capability = AgentCapability::new(capability_id, capability_name);
    if let Some(text) = description {
        capability = capability.with_description(text);
    }
    if let Some(modes) = input_modes {
        capability = capability.with_input_modes(modes);
    }
    if let Some(modes) = output_modes {
        capability = capability.with_output_modes(modes);
    }
    capability
}

fn map_provider(block: CardProvider) -> AgentProvider {
    let CardProvider {
        organization,
        contact,
        url,
    } = block;

    let mut provider = AgentProvider::new();
    if let Some(value) = organization {
        provider = provider.with_organization(value);
    }
    if let Some(value) = contact {
        provider = provider.with_contact(value);
    }
    if let Some(value) = url {
        provider = provider.with_url(value);
    }
    provider
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

fn slugify(value: &str) -> String {
    value
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
