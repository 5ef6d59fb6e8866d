//! Socioeconomic reference table loading and unit normalization.
//!
//! Column names may drift (units in the header), so population and GDP
//! columns are located by case-sensitive substring rather than exact match.
//! Population units are corrected with a single global heuristic: when the
//! largest parsed population is below one million the whole table is assumed
//! to be in thousands. This is best-effort; a table containing only countries
//! with fewer than one million inhabitants would be wrongly scaled.

use std::fs::File;
use std::io;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::{debug, info, warn};

use crate::alias::AliasResolver;
use crate::constants::metadata::{
    COUNTRY_COLUMN, GDP_MARKER, POPULATION_MARKER, THOUSANDS_FACTOR, THOUSANDS_THRESHOLD,
};
use crate::data::MetadataRecord;
use crate::errors::AtlasError;
use crate::types::{CanonicalKey, ColumnName};
use crate::utils::strip_numeric_noise;

/// Column positions resolved from the reference table header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataColumns {
    /// Index of the `Country` column.
    pub country: usize,
    /// Index of the first header containing the population marker.
    pub population: usize,
    /// Index of the first header containing the GDP marker.
    pub gdp: usize,
}

impl MetadataColumns {
    /// Locate the country, population, and GDP columns in trimmed headers.
    ///
    /// A header containing both markers is treated as GDP. When several
    /// headers match a marker the first one is used.
    pub fn resolve(headers: &[ColumnName], origin: &Path) -> Result<Self, AtlasError> {
        let country = headers
            .iter()
            .position(|header| header == COUNTRY_COLUMN)
            .ok_or_else(|| {
                AtlasError::fatal_input(origin, format!("missing '{COUNTRY_COLUMN}' column"))
            })?;
        let gdp = headers
            .iter()
            .position(|header| header.contains(GDP_MARKER))
            .ok_or_else(|| {
                AtlasError::fatal_input(
                    origin,
                    format!("no column name contains '{GDP_MARKER}'"),
                )
            })?;
        let population = headers
            .iter()
            .position(|header| header.contains(POPULATION_MARKER) && !header.contains(GDP_MARKER))
            .ok_or_else(|| {
                AtlasError::fatal_input(
                    origin,
                    format!("no column name contains '{POPULATION_MARKER}'"),
                )
            })?;
        debug!(
            path = %origin.display(),
            population = %headers[population],
            gdp = %headers[gdp],
            "resolved metadata columns"
        );
        Ok(Self {
            country,
            population,
            gdp,
        })
    }
}

/// Load and normalize the reference table at `path`.
///
/// A missing or unparseable file is fatal; unparseable numeric cells become `None`.
pub fn load_metadata(
    path: &Path,
    resolver: &AliasResolver,
) -> Result<Vec<MetadataRecord>, AtlasError> {
    let file = File::open(path).map_err(|err| AtlasError::fatal_input(path, err))?;
    let records = parse_metadata(file, path, resolver)?;
    info!(path = %path.display(), rows = records.len(), "loaded metadata table");
    Ok(records)
}

/// Parse a reference table from any reader; `origin` is used in errors and logs.
pub fn parse_metadata<R: io::Read>(
    reader: R,
    origin: &Path,
    resolver: &AliasResolver,
) -> Result<Vec<MetadataRecord>, AtlasError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<ColumnName> = reader
        .headers()
        .map_err(|err| AtlasError::fatal_input(origin, err))?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();
    let columns = MetadataColumns::resolve(&headers, origin)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|err| AtlasError::fatal_input(origin, err))?;
        records.push(parse_row(&row, &columns, resolver));
    }

    if apply_thousands_heuristic(&mut records) {
        info!(
            path = %origin.display(),
            factor = THOUSANDS_FACTOR,
            "population values look like thousands; scaled to absolute counts"
        );
    }
    Ok(records)
}

fn parse_row(
    row: &StringRecord,
    columns: &MetadataColumns,
    resolver: &AliasResolver,
) -> MetadataRecord {
    let country = row
        .get(columns.country)
        .unwrap_or_default()
        .trim()
        .to_string();
    let key = resolver.resolve(&country);
    if key.is_none() {
        warn!("metadata row has an empty country name");
    }
    MetadataRecord {
        population: parse_numeric(row.get(columns.population), POPULATION_MARKER, &country),
        gdp: parse_numeric(row.get(columns.gdp), GDP_MARKER, &country),
        country,
        key,
    }
}

/// Parse a numeric cell after stripping separators and whitespace.
///
/// Empty cells yield `None` silently; unparseable, negative, or non-finite
/// values yield `None` with a warning.
pub fn parse_numeric(raw: Option<&str>, field: &str, country: &str) -> Option<f64> {
    let raw = raw?;
    let cleaned = strip_numeric_noise(raw);
    if cleaned.is_empty() {
        return None;
    }
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
        Ok(value) => {
            warn!(field, country, value, "out-of-range numeric value set to null");
            None
        }
        Err(err) => {
            warn!(field, country, raw, error = %err, "unparseable numeric value set to null");
            None
        }
    }
}

/// Scale every population by the thousands factor when the maximum is below the threshold.
///
/// Scans all rows first, then corrects; returns whether the correction was applied.
/// Tables with no parsed population are left untouched.
pub fn apply_thousands_heuristic(records: &mut [MetadataRecord]) -> bool {
    let max = records
        .iter()
        .filter_map(|record| record.population)
        .fold(None, |acc: Option<f64>, value| {
            Some(acc.map_or(value, |current| current.max(value)))
        });
    match max {
        Some(max) if max < THOUSANDS_THRESHOLD => {
            for record in records.iter_mut() {
                if let Some(population) = record.population.as_mut() {
                    *population *= THOUSANDS_FACTOR;
                }
            }
            true
        }
        _ => false,
    }
}

/// Index metadata rows by canonical key.
///
/// Rows without a key are dropped. When two rows share a key the first wins
/// and the duplicate is logged, keeping the join one-to-one.
pub fn metadata_by_key(records: &[MetadataRecord]) -> IndexMap<CanonicalKey, MetadataRecord> {
    let mut by_key = IndexMap::with_capacity(records.len());
    for record in records {
        let Some(key) = record.key.clone() else {
            continue;
        };
        match by_key.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
            }
            Entry::Occupied(existing) => {
                warn!(
                    key = %existing.key(),
                    kept = %existing.get().country,
                    dropped = %record.country,
                    "duplicate metadata rows for one canonical key"
                );
            }
        }
    }
    by_key
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn resolver() -> AliasResolver {
        AliasResolver::standard().unwrap()
    }

    fn parse(text: &str) -> Vec<MetadataRecord> {
        parse_metadata(text.as_bytes(), &PathBuf::from("meta.csv"), &resolver()).unwrap()
    }

    #[test]
    fn maps_drifting_headers_and_scales_thousands() {
        let records = parse(
            " Country ,Population (thousands), GDP (billion USD) \nKenya,\"53,005\",110.3\nGhana,\"1,200\",76.4\n",
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].population, Some(53_005_000.0));
        assert_eq!(records[1].population, Some(1_200_000.0));
        assert_eq!(records[0].gdp, Some(110.3));
        assert_eq!(records[0].key.as_ref().map(CanonicalKey::as_str), Some("kenya"));
    }

    #[test]
    fn absolute_populations_are_left_alone() {
        let records = parse("Country,Population,GDP\nNigeria,\"218,541,212\",477.4\nSeychelles,\"100,000\",2.1\n");
        assert_eq!(records[0].population, Some(218_541_212.0));
        assert_eq!(records[1].population, Some(100_000.0));
    }

    #[test]
    fn unparseable_cells_become_none() {
        let records = parse("Country,Population,GDP\nKenya,n/a,110\nGhana,-5,\nTogo,\"8,800\",inf\n");
        assert_eq!(records[0].population, None);
        assert_eq!(records[0].gdp, Some(110.0));
        assert_eq!(records[1].population, None);
        assert_eq!(records[1].gdp, None);
        assert_eq!(records[2].population, Some(8_800_000.0));
        assert_eq!(records[2].gdp, None);
    }

    #[test]
    fn country_names_pass_through_alias_resolver() {
        let records = parse("Country,Population,GDP\nCôte d'Ivoire,28000,70\nSwaziland,1200,4.8\n");
        assert_eq!(records[0].key.as_ref().map(CanonicalKey::as_str), Some("ivory coast"));
        assert_eq!(records[1].key.as_ref().map(CanonicalKey::as_str), Some("eswatini"));
        assert_eq!(records[0].country, "Côte d'Ivoire");
    }

    #[test]
    fn missing_columns_are_fatal() {
        let err = parse_metadata(
            "Country,Area\nKenya,580367\n".as_bytes(),
            Path::new("meta.csv"),
            &resolver(),
        )
        .unwrap_err();
        assert!(matches!(err, AtlasError::FatalInput { .. }));
    }

    #[test]
    fn missing_file_is_fatal() {
        let temp = tempdir().unwrap();
        let err = load_metadata(&temp.path().join("absent.csv"), &resolver()).unwrap_err();
        match err {
            AtlasError::FatalInput { path, .. } => assert!(path.ends_with("absent.csv")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn loads_from_disk() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("meta.csv");
        fs::write(&path, "Country,Population,GDP\nKenya,\"53,005\",110\n").unwrap();
        let records = load_metadata(&path, &resolver()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].population, Some(53_005_000.0));
    }

    #[test]
    fn thousands_heuristic_is_global_and_skips_empty_tables() {
        let mut records = vec![
            MetadataRecord {
                country: "A".into(),
                key: None,
                population: Some(999_999.0),
                gdp: None,
            },
            MetadataRecord {
                country: "B".into(),
                key: None,
                population: None,
                gdp: None,
            },
        ];
        assert!(apply_thousands_heuristic(&mut records));
        assert_eq!(records[0].population, Some(999_999_000.0));
        assert_eq!(records[1].population, None);

        let mut empty: Vec<MetadataRecord> = records
            .iter()
            .cloned()
            .map(|mut record| {
                record.population = None;
                record
            })
            .collect();
        assert!(!apply_thousands_heuristic(&mut empty));
    }

    #[test]
    fn metadata_by_key_keeps_first_duplicate() {
        let records = parse("Country,Population,GDP\nCape Verde,\"598,682\",2.6\nCabo Verde,\"600,000\",2.7\n,5,5\n");
        let by_key = metadata_by_key(&records);
        assert_eq!(by_key.len(), 1);
        let entry = by_key.values().next().unwrap();
        assert_eq!(entry.country, "Cape Verde");
    }
}
