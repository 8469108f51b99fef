//! Tag collection with a bounded entry count.

use super::DirectoryDomainError;
use serde::{Deserialize, Serialize};

/// Maximum number of tags on a single agent record.
const MAX_TAGS: usize = 20;

/// Bounded list of free-text tags.
///
/// Tag content is unrestricted (search filters compare tags by exact
/// element equality); only the entry count is capped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagList(Vec<String>);

impl TagList {
    /// Creates a tag list from raw values.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::TooManyTags`] when more than 20 tags
    /// are supplied.
    pub fn new(tags: Vec<String>) -> Result<Self, DirectoryDomainError> {
        if tags.len() > MAX_TAGS {
            return Err(DirectoryDomainError::TooManyTags(tags.len()));
        }
        Ok(Self(tags))
    }

    /// Returns the tags as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Returns the number of tags.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no tags are present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the tags.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl<const N: usize> PartialEq<[&str; N]> for TagList {
    fn eq(&self, other: &[&str; N]) -> bool {
        self.0.iter().map(String::as_str).eq(other.iter().copied())
    }
}

impl<const N: usize> PartialEq<[&str; N]> for &TagList {
    fn eq(&self, other: &[&str; N]) -> bool {
        <TagList as PartialEq<[&str; N]>>::eq(self, other)
    }
}

impl<'a> IntoIterator for &'a TagList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
