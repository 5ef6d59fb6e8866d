use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;

pub use crate::types::{ArticleUrl, CanonicalKey, CountryLabel, DisplayName, YearLabel};

/// Path context shared by every row parsed from one article file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileProvenance {
    /// File the rows were read from.
    pub path: PathBuf,
    /// Country label derived from the file name.
    pub country: CountryLabel,
    /// Year label derived from the file name or parent directory.
    pub year: YearLabel,
}

/// One article observation, carrying the provenance of the file it came from.
#[derive(Clone, Debug)]
pub struct RawArticleRecord {
    /// Article URL; `None` when the cell is empty.
    pub url: Option<ArticleUrl>,
    /// Publication timestamp; `None` when absent or unparseable.
    pub published: Option<NaiveDateTime>,
    /// Shared path context for the source file.
    pub provenance: Arc<FileProvenance>,
}

impl RawArticleRecord {
    /// Country label of the source file.
    pub fn country(&self) -> &str {
        &self.provenance.country
    }

    /// Year label of the source file.
    pub fn year(&self) -> &str {
        &self.provenance.year
    }
}

/// One row of the socioeconomic reference table after unit normalization.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetadataRecord {
    /// Country name as written in the reference table.
    pub country: String,
    /// Join key; `None` when the country cell is empty.
    pub key: Option<CanonicalKey>,
    /// Absolute population count.
    pub population: Option<f64>,
    /// GDP in billions of USD.
    pub gdp: Option<f64>,
}

/// One named feature of the boundary reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GeoEntity {
    /// Join key derived from the display name; `None` when the name is blank.
    pub key: Option<CanonicalKey>,
    /// Feature name exactly as carried by the boundary file.
    pub display_name: DisplayName,
}

/// One output row per geo entity.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReconciledRow {
    /// Feature name from the boundary file.
    pub display_name: DisplayName,
    /// Join key of the geo entity; `None` for a blank feature name.
    pub key: Option<CanonicalKey>,
    /// Article count for the selected year; zero when nothing matched.
    pub total_articles: u64,
    /// Absolute population from the reference table.
    pub population: Option<f64>,
    /// GDP in billions of USD from the reference table.
    pub gdp: Option<f64>,
    /// Articles per million people; `None` when population is missing or zero.
    pub articles_per_million: Option<f64>,
    /// Articles per billion USD of GDP; `None` when GDP is missing or zero.
    pub articles_per_gdp_unit: Option<f64>,
}

/// Per-year article total for a single country.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct YearlyCount {
    /// Numeric year.
    pub year: i32,
    /// Rows with a non-empty URL in that year.
    pub total_articles: u64,
}
