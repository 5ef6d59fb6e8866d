use std::fmt;

use serde::Serialize;

/// Country label derived from an article file name (title-cased leading token).
/// Examples: `Kenya`, `South Sudan`, `Cote D'Ivoire`
pub type CountryLabel = String;
/// Year label derived from an article file name or its parent directory.
/// Examples: `2021`, `Articles 2022`
pub type YearLabel = String;
/// Human-readable entity name as carried by the boundary reference.
/// Examples: `Ivory Coast`, `Dem. Rep. Congo`
pub type DisplayName = String;
/// Article URL as read from a source row.
/// Example: `https://example.org/news/climate-adaptation`
pub type ArticleUrl = String;
/// Column header text from a tabular input.
/// Examples: `Population (thousands)`, `GDP (billion USD)`
pub type ColumnName = String;

/// Normalized join key shared by article, metadata, and boundary rows.
///
/// Keys are only produced by [`crate::alias::AliasResolver`], so every key is
/// lower-cased, whitespace-collapsed, and already a fixed point of the alias table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub(crate) fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Return the key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
