//! Search index projection and the shared tokenization scheme.

use super::{AgentId, record::AgentRecord};
use rust_stemmers::{Algorithm, Stemmer};

/// Denormalized, tokenizable projection of one agent record.
///
/// This is the only shape the search index ever sees: a derived, disposable
/// view that can be regenerated from the record store at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchDocument {
    /// Identifier of the projected agent.
    pub agent_id: AgentId,
    /// Agent display name.
    pub name: String,
    /// Agent description.
    pub description: String,
    /// Space-joined category slugs.
    pub categories_text: String,
    /// Space-joined tags.
    pub tags_text: String,
    /// Concatenated capability names and descriptions.
    pub capabilities_text: String,
}

impl SearchDocument {
    /// Projects an agent record into its index document.
    #[must_use]
    pub fn from_record(record: &AgentRecord) -> Self {
        let capabilities_text = record
            .capabilities()
            .iter()
            .map(|capability| {
                format!(
                    "{} {}",
                    capability.name(),
                    capability.description().unwrap_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            agent_id: record.id(),
            name: record.name().as_str().to_owned(),
            description: record.description().as_str().to_owned(),
            categories_text: record.categories().join(" "),
            tags_text: record.tags().as_slice().join(" "),
            capabilities_text,
        }
    }

    /// Returns every indexed field joined into one text block.
    #[must_use]
    pub fn full_text(&self) -> String {
        [
            self.name.as_str(),
            self.description.as_str(),
            self.categories_text.as_str(),
            self.tags_text.as_str(),
            self.capabilities_text.as_str(),
        ]
        .join(" ")
    }
}

/// Tokenizes text for indexing and querying.
///
/// Both sides of a search must use the same scheme or matching silently
/// breaks: lowercase, split on non-alphanumeric boundaries, Porter-stemmed
/// English word tokens.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let stemmer = Stemmer::create(Algorithm::English);
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| stemmer.stem(&word.to_lowercase()).into_owned())
        .collect()
}
