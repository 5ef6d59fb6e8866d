use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum, error::ErrorKind};

use crate::config::PipelineConfig;
use crate::constants::metadata::GDP_UNIT_LABEL;
use crate::data::{ReconciledRow, YearlyCount};
use crate::metrics::CoverageMetric;
use crate::pipeline::{CoveragePipeline, CoverageTable};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MetricArg {
    Raw,
    PerMillion,
    PerGdp,
}

impl From<MetricArg> for CoverageMetric {
    fn from(value: MetricArg) -> Self {
        match value {
            MetricArg::Raw => CoverageMetric::RawArticles,
            MetricArg::PerMillion => CoverageMetric::ArticlesPerMillion,
            MetricArg::PerGdp => CoverageMetric::ArticlesPerGdpUnit,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "coverage_report",
    disable_help_subcommand = true,
    about = "Reconciled news coverage per country",
    long_about = "Join per-country article counts with population/GDP metadata onto the boundary reference and print normalized coverage metrics.",
    after_help = "Input paths are resolved in order by explicit arg, environment variables (COVERAGE_ATLAS_ARTICLES_DIR, COVERAGE_ATLAS_METADATA_FILE, COVERAGE_ATLAS_GEO_FILE), then project defaults."
)]
/// CLI for `coverage_report`.
///
/// Common usage:
/// - Map table for the earliest year: `coverage_report`
/// - Map table for a year and metric: `--year 2022 --metric per-million`
/// - Time series for one country: `--country Kenya`
struct CoverageReportCli {
    #[arg(long = "articles-root", value_name = "DIR", help = "Directory of article tables")]
    articles_root: Option<PathBuf>,
    #[arg(long = "metadata", value_name = "FILE", help = "Population/GDP reference table")]
    metadata: Option<PathBuf>,
    #[arg(long = "geo", value_name = "FILE", help = "Boundary feature collection")]
    geo: Option<PathBuf>,
    #[arg(long, help = "Selected year (defaults to the earliest available)")]
    year: Option<i32>,
    #[arg(long, value_enum, default_value = "raw", help = "Metric shown per country")]
    metric: MetricArg,
    #[arg(long, value_name = "COUNTRY", help = "Print the yearly series for one country instead")]
    country: Option<String>,
    #[arg(long, help = "Skip malformed article files instead of aborting")]
    skip_malformed: bool,
    #[arg(long, help = "Emit JSON instead of a text table")]
    json: bool,
}

/// Run the `coverage_report` demo with `args_iter` (program name excluded).
pub fn run_coverage_report<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) = parse_cli::<CoverageReportCli, _>(
        std::iter::once("coverage_report".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let config = PipelineConfig::from_overrides(cli.articles_root, cli.metadata, cli.geo)
        .with_skip_malformed_files(cli.skip_malformed);
    let pipeline = CoveragePipeline::new(config)?;

    if let Some(country) = cli.country {
        let series = pipeline.time_series(&country)?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&series)?);
        } else if series.is_empty() {
            let known = pipeline.countries()?;
            println!(
                "No articles found for '{}'. Known countries: {}",
                country,
                known.join(", ")
            );
        } else {
            print_time_series(&country, &series);
        }
        return Ok(());
    }

    let year = match cli.year {
        Some(year) => year,
        None => pipeline.default_year()?,
    };
    let table = pipeline.coverage_for_year(year)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        print_coverage_table(&table, cli.metric.into());
    }
    Ok(())
}

fn print_coverage_table(table: &CoverageTable, metric: CoverageMetric) {
    println!("=== coverage for {} ({}) ===", table.year, metric);
    println!(
        "{:<28} {:>9} {:>13} {:>14} {:>14}",
        "country", "articles", "population(M)", "gdp", "metric"
    );
    for row in &table.rows {
        println!(
            "{:<28} {:>9} {:>13} {:>14} {:>14}",
            row.display_name,
            row.total_articles,
            format_optional(row.population.map(|people| people / 1_000_000.0), 1),
            format_optional(row.gdp, 1),
            format_optional(metric.value(row), 2),
        );
    }
    println!();
    println!("GDP is in {GDP_UNIT_LABEL}; n/a marks a missing population or GDP.");
    print_summary(&table.rows);
    for collision in &table.collisions {
        println!(
            "warning: {} share key '{}' and receive identical data",
            collision.display_names.join(", "),
            collision.key
        );
    }
}

fn print_summary(rows: &[ReconciledRow]) {
    let covered = rows.iter().filter(|row| row.total_articles > 0).count();
    let total: u64 = rows.iter().map(|row| row.total_articles).sum();
    println!(
        "{} of {} entities have articles ({} articles total)",
        covered,
        rows.len(),
        total
    );
}

fn print_time_series(country: &str, series: &[YearlyCount]) {
    println!("=== coverage over time: {country} ===");
    for point in series {
        println!("{:>6} {:>9}", point.year, point.total_articles);
    }
}

fn format_optional(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(value) => format!("{value:.precision$}"),
        None => "n/a".to_string(),
    }
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}
