/// Constants used by the alias resolver.
pub mod alias {
    /// Override table of known spelling variants, as `(normalized variant, canonical key)`.
    ///
    /// Every variant must already be normalized and every canonical key must be a
    /// fixed point of the table; `AliasResolver::standard` rejects the table otherwise.
    pub const ALIAS_OVERRIDES: &[(&str, &str)] = &[
        ("south sudan", "s. sudan"),
        ("republic of djibouti", "djibouti"),
        ("djibouti.", "djibouti"),
        ("eq. guinea", "equatorial guinea"),
        ("eq guinea", "equatorial guinea"),
        ("equatorial guinea", "equatorial guinea"),
        ("dem. rep. congo", "dem. rep. congo"),
        ("democratic republic of the congo", "dem. rep. congo"),
        ("central african republic", "central african rep."),
        ("côte d'ivoire", "ivory coast"),
        ("cote d'ivoire", "ivory coast"),
        ("the gambia", "gambia"),
        ("sao tome and principe", "são tomé and príncipe"),
        ("são tomé and principe", "são tomé and príncipe"),
        ("cape verde", "cabo verde"),
        ("swaziland", "eswatini"),
    ];
}

/// Constants used by article file discovery and row parsing.
pub mod articles {
    /// Separator between the country token and the rest of an article file stem.
    pub const FILENAME_DELIMITER: char = '_';
    /// Number of consecutive digits that form a year token.
    pub const YEAR_DIGITS: usize = 4;
    /// Column carrying the article URL (counted during aggregation).
    pub const URL_COLUMN: &str = "url";
    /// Optional column carrying the article publication date.
    pub const DATE_PUBLISHED_COLUMN: &str = "date_published";
    /// Default extension of article files.
    pub const DEFAULT_EXTENSION: &str = "csv";
    /// Log message used when a malformed article file is skipped.
    pub const SKIP_MALFORMED_MSG: &str = "skipping malformed article file";
}

/// Constants used by the socioeconomic reference table.
pub mod metadata {
    /// Header naming the country column (compared after trimming).
    pub const COUNTRY_COLUMN: &str = "Country";
    /// Case-sensitive substring that marks the population column.
    pub const POPULATION_MARKER: &str = "Population";
    /// Case-sensitive substring that marks the GDP column.
    pub const GDP_MARKER: &str = "GDP";
    /// Maximum population below which the table is assumed to be in thousands.
    pub const THOUSANDS_THRESHOLD: f64 = 1_000_000.0;
    /// Factor applied to every population value when the thousands heuristic triggers.
    pub const THOUSANDS_FACTOR: f64 = 1_000.0;
    /// Unit GDP values are carried in (no conversion is applied).
    pub const GDP_UNIT_LABEL: &str = "billion USD";
}

/// Constants used by the boundary reference loader.
pub mod geo {
    /// Top-level key of the feature array in a feature collection.
    pub const FEATURES_KEY: &str = "features";
    /// Per-feature key holding the property object.
    pub const PROPERTIES_KEY: &str = "properties";
    /// Property carrying the feature display name.
    pub const NAME_PROPERTY: &str = "name";
}

/// Constants used by the metric deriver.
pub mod metrics {
    /// Population divisor for the per-million metric.
    pub const PEOPLE_PER_MILLION: f64 = 1_000_000.0;
}

/// Constants used by pipeline configuration defaults.
pub mod config {
    /// Default article directory.
    pub const DEFAULT_ARTICLES_DIR: &str = "AfricanArticles";
    /// Default socioeconomic reference table.
    pub const DEFAULT_METADATA_FILE: &str = "africa_gdp_population.csv";
    /// Default boundary reference file.
    pub const DEFAULT_GEO_FILE: &str = "africa_countries.geo.json";
    /// Environment variable overriding the article directory.
    pub const ENV_ARTICLES_DIR: &str = "COVERAGE_ATLAS_ARTICLES_DIR";
    /// Environment variable overriding the reference table path.
    pub const ENV_METADATA_FILE: &str = "COVERAGE_ATLAS_METADATA_FILE";
    /// Environment variable overriding the boundary file path.
    pub const ENV_GEO_FILE: &str = "COVERAGE_ATLAS_GEO_FILE";
}
