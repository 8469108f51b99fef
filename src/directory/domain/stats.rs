//! Directory-wide aggregate figures.

use serde::{Deserialize, Serialize};

/// Headline counts across the whole directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryStats {
    /// Number of stored records.
    pub total_agents: u64,
    /// Number of records with a verified domain.
    pub verified_agents: u64,
    /// Number of records carrying an A2A binding.
    pub a2a_agents: u64,
    /// Number of records carrying an MCP binding.
    pub mcp_agents: u64,
}

/// Occupancy of one category across the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Category value as stored on the records.
    pub slug: String,
    /// Number of records listing the category.
    pub agent_count: u64,
}

impl CategoryCount {
    /// Renders the slug as a human-readable name.
    ///
    /// Hyphens become spaces and each word gains an initial capital, so
    /// `data-analysis` displays as `Data Analysis`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.slug
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_uppercase().chain(chars).collect()
                })
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
