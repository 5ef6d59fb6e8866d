//! End-to-end coverage pipeline.
//!
//! Article rows are the only stage memoized (through [`ArticleCache`]); the
//! metadata table and boundary reference are re-read on each call, so a year
//! or metric change re-runs aggregation, reconciliation, and metric derivation
//! against fresh inputs.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::aggregate::{article_counts_by_key, available_years, countries, country_time_series};
use crate::alias::AliasResolver;
use crate::config::PipelineConfig;
use crate::data::{ReconciledRow, YearlyCount};
use crate::errors::AtlasError;
use crate::geo::{GeoReference, load_geo_reference};
use crate::ingestion::{ArticleCache, ArticleRows};
use crate::metadata::{load_metadata, metadata_by_key};
use crate::metrics::derive_metrics;
use crate::reconcile::{AliasCollision, alias_collisions, reconcile};
use crate::source::ArticleFiles;
use crate::types::CountryLabel;

/// Reconciled table for one selected year.
#[derive(Clone, Debug, Serialize)]
pub struct CoverageTable {
    /// Year the article counts were filtered to.
    pub year: i32,
    /// One row per boundary entity, in boundary file order.
    pub rows: Vec<ReconciledRow>,
    /// Canonical keys shared by several boundary entities.
    pub collisions: Vec<AliasCollision>,
}

/// Pipeline facade over the configured inputs.
pub struct CoveragePipeline {
    config: PipelineConfig,
    resolver: AliasResolver,
    articles: ArticleFiles,
    cache: ArticleCache,
}

impl CoveragePipeline {
    /// Build a pipeline with the built-in alias table, validating it once.
    pub fn new(config: PipelineConfig) -> Result<Self, AtlasError> {
        Ok(Self::with_resolver(config, AliasResolver::standard()?))
    }

    /// Build a pipeline with an already validated resolver.
    pub fn with_resolver(config: PipelineConfig, resolver: AliasResolver) -> Self {
        let articles = ArticleFiles::new(config.article_files());
        Self {
            config,
            resolver,
            articles,
            cache: ArticleCache::new(),
        }
    }

    /// Share an existing article cache between pipelines.
    pub fn with_cache(mut self, cache: ArticleCache) -> Self {
        self.cache = cache;
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Alias resolver in use.
    pub fn resolver(&self) -> &AliasResolver {
        &self.resolver
    }

    /// Article cache in use.
    pub fn cache(&self) -> &ArticleCache {
        &self.cache
    }

    /// Article rows, reusing the cached scan while the directory is unchanged.
    pub fn articles(&self) -> Result<ArticleRows, AtlasError> {
        self.cache.get_or_load(&self.articles)
    }

    /// Drop the cached article scan so the next call rescans.
    pub fn invalidate_articles(&self) -> bool {
        self.cache.invalidate(&self.config.articles_root)
    }

    /// Load the boundary reference, including the raw collection for map rendering.
    pub fn geo_reference(&self) -> Result<GeoReference, AtlasError> {
        load_geo_reference(&self.config.geo_path, &self.resolver)
    }

    /// Numeric years present in the article data.
    pub fn available_years(&self) -> Result<Vec<i32>, AtlasError> {
        Ok(available_years(&self.articles()?))
    }

    /// Earliest available year, the default selection.
    pub fn default_year(&self) -> Result<i32, AtlasError> {
        self.available_years()?.first().copied().ok_or_else(|| {
            AtlasError::NoData(format!(
                "no article file under '{}' carries a four-digit year",
                self.config.articles_root.display()
            ))
        })
    }

    /// Country labels present in the article data.
    pub fn countries(&self) -> Result<Vec<CountryLabel>, AtlasError> {
        Ok(countries(&self.articles()?))
    }

    /// Reconciled table with derived metrics for `year`.
    ///
    /// Fails when the boundary reference, metadata table, or article scan is
    /// missing or malformed.
    pub fn coverage_for_year(&self, year: i32) -> Result<CoverageTable, AtlasError> {
        let geo_entities = self.geo_reference()?.entities;
        let metadata = load_metadata(&self.config.metadata_path, &self.resolver)?;
        let articles = self.articles()?;

        let counts = article_counts_by_key(&articles, year, &self.resolver);
        let metadata = metadata_by_key(&metadata);
        let rows: Vec<ReconciledRow> = reconcile(&geo_entities, &counts, &metadata)
            .into_iter()
            .map(derive_metrics)
            .collect();
        info!(
            year,
            rows = rows.len(),
            with_articles = rows.iter().filter(|row| row.total_articles > 0).count(),
            "coverage table ready"
        );
        Ok(CoverageTable {
            year,
            collisions: alias_collisions(&geo_entities),
            rows,
        })
    }

    /// Per-year totals for one country label.
    pub fn time_series(&self, country: &str) -> Result<Vec<YearlyCount>, AtlasError> {
        Ok(country_time_series(&self.articles()?, country))
    }

    /// Root of the article scan.
    pub fn articles_root(&self) -> &Path {
        &self.config.articles_root
    }
}
