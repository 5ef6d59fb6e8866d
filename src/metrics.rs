use std::fmt;

use crate::constants::metrics::PEOPLE_PER_MILLION;
use crate::data::ReconciledRow;

/// Divide `numerator` by `denominator`, or `None` when the denominator is missing,
/// non-positive, or non-finite.
pub fn guarded_ratio(numerator: f64, denominator: Option<f64>) -> Option<f64> {
    let denominator = denominator?;
    if !denominator.is_finite() || denominator <= 0.0 {
        return None;
    }
    let value = numerator / denominator;
    value.is_finite().then_some(value)
}

/// Articles per million people.
pub fn articles_per_million(total_articles: u64, population: Option<f64>) -> Option<f64> {
    guarded_ratio(
        total_articles as f64,
        population.map(|people| people / PEOPLE_PER_MILLION),
    )
}

/// Articles per GDP unit (billion USD).
pub fn articles_per_gdp_unit(total_articles: u64, gdp: Option<f64>) -> Option<f64> {
    guarded_ratio(total_articles as f64, gdp)
}

/// Fill the normalized metrics of a reconciled row.
///
/// A missing or zero denominator leaves the metric `None`, keeping "no data"
/// distinct from a true zero.
pub fn derive_metrics(mut row: ReconciledRow) -> ReconciledRow {
    row.articles_per_million = articles_per_million(row.total_articles, row.population);
    row.articles_per_gdp_unit = articles_per_gdp_unit(row.total_articles, row.gdp);
    row
}

/// Metric plotted for each entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoverageMetric {
    /// Raw article count.
    RawArticles,
    /// Articles per million people.
    ArticlesPerMillion,
    /// Articles per billion USD of GDP.
    ArticlesPerGdpUnit,
}

impl CoverageMetric {
    /// All metrics in selector order.
    pub const ALL: [CoverageMetric; 3] = [
        CoverageMetric::RawArticles,
        CoverageMetric::ArticlesPerMillion,
        CoverageMetric::ArticlesPerGdpUnit,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            CoverageMetric::RawArticles => "Raw Articles",
            CoverageMetric::ArticlesPerMillion => "Articles per Million People",
            CoverageMetric::ArticlesPerGdpUnit => "Articles per Billion GDP",
        }
    }

    /// Value of this metric for `row`; raw articles are always present.
    pub fn value(self, row: &ReconciledRow) -> Option<f64> {
        match self {
            CoverageMetric::RawArticles => Some(row.total_articles as f64),
            CoverageMetric::ArticlesPerMillion => row.articles_per_million,
            CoverageMetric::ArticlesPerGdpUnit => row.articles_per_gdp_unit,
        }
    }
}

impl fmt::Display for CoverageMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
