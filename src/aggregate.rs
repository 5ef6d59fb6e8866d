//! Article aggregation by year and country.
//!
//! Counting follows the selector semantics of the coverage views: a record
//! belongs to year `Y` when its year label contains the text of `Y`, and only
//! rows with a non-empty URL are counted.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use tracing::debug;

use crate::alias::AliasResolver;
use crate::data::{RawArticleRecord, YearlyCount};
use crate::types::{CanonicalKey, CountryLabel};
use crate::utils::find_year_token;

/// Numeric year carried by a year label, if any.
pub fn year_number(label: &str) -> Option<i32> {
    find_year_token(label).and_then(|token| token.parse().ok())
}

/// Sorted, de-duplicated numeric years present across `records`.
pub fn available_years(records: &[RawArticleRecord]) -> Vec<i32> {
    records
        .iter()
        .filter_map(|record| year_number(record.year()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted, de-duplicated country labels present across `records`.
pub fn countries(records: &[RawArticleRecord]) -> Vec<CountryLabel> {
    records
        .iter()
        .map(|record| record.country().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Whether a year label matches the selected year.
pub fn label_matches_year(label: &str, year: i32) -> bool {
    label.contains(&year.to_string())
}

/// Count articles per canonical key for `year`.
///
/// Rows are grouped by country label first; each label is then resolved, and
/// labels resolving to the same key are summed. Labels that resolve to nothing
/// are dropped.
pub fn article_counts_by_key(
    records: &[RawArticleRecord],
    year: i32,
    resolver: &AliasResolver,
) -> IndexMap<CanonicalKey, u64> {
    let mut by_label: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        if !label_matches_year(record.year(), year) {
            continue;
        }
        let count = by_label.entry(record.country()).or_insert(0);
        if record.url.is_some() {
            *count += 1;
        }
    }

    let mut by_key: IndexMap<CanonicalKey, u64> = IndexMap::with_capacity(by_label.len());
    for (label, count) in by_label {
        let Some(key) = resolver.resolve(label) else {
            continue;
        };
        *by_key.entry(key).or_insert(0) += count;
    }
    debug!(year, keys = by_key.len(), "aggregated article counts");
    by_key
}

/// Per-year article totals for one country label, ascending by year.
///
/// Records whose year label carries no numeric year are skipped.
pub fn country_time_series(records: &[RawArticleRecord], country: &str) -> Vec<YearlyCount> {
    let mut by_year: BTreeMap<i32, u64> = BTreeMap::new();
    for record in records.iter().filter(|record| record.country() == country) {
        let Some(year) = year_number(record.year()) else {
            continue;
        };
        let count = by_year.entry(year).or_insert(0);
        if record.url.is_some() {
            *count += 1;
        }
    }
    by_year
        .into_iter()
        .map(|(year, total_articles)| YearlyCount {
            year,
            total_articles,
        })
        .collect()
}
