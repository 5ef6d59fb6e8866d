#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Article aggregation by year and country.
pub mod aggregate;
/// Country-name canonicalization.
pub mod alias;
/// Pipeline configuration types.
pub mod config;
/// Centralized constants used across loaders and metrics.
pub mod constants;
/// Record and output row types.
pub mod data;
/// Reusable CLI runners shared by the demo binaries.
pub mod example_apps;
/// Boundary reference loading.
pub mod geo;
mod hash;
/// Article scan caching.
pub mod ingestion;
/// Socioeconomic reference table loading.
pub mod metadata;
/// Normalized coverage metrics.
pub mod metrics;
/// End-to-end coverage pipeline.
pub mod pipeline;
/// Reconciliation onto the boundary universe.
pub mod reconcile;
/// Article source traits and built-in sources.
pub mod source;
/// Input transports used by sources (filesystem today).
pub mod transport;
/// Shared type aliases and the canonical key type.
pub mod types;
/// Text normalization helpers.
pub mod utils;

mod errors;

pub use alias::AliasResolver;
pub use config::PipelineConfig;
pub use data::{
    FileProvenance, GeoEntity, MetadataRecord, RawArticleRecord, ReconciledRow, YearlyCount,
};
pub use errors::AtlasError;
pub use geo::{GeoReference, load_geo_entities, load_geo_reference};
pub use ingestion::{ArticleCache, ArticleRows};
pub use metadata::load_metadata;
pub use metrics::{CoverageMetric, derive_metrics};
pub use pipeline::{CoveragePipeline, CoverageTable};
pub use reconcile::{AliasCollision, reconcile};
pub use source::{ArticleFiles, ArticleFilesConfig, ArticleSource};
pub use types::{CanonicalKey, CountryLabel, DisplayName, YearLabel};
