use std::env;
use std::path::{Path, PathBuf};

use crate::constants::articles::DEFAULT_EXTENSION;
use crate::constants::config::{
    DEFAULT_ARTICLES_DIR, DEFAULT_GEO_FILE, DEFAULT_METADATA_FILE, ENV_ARTICLES_DIR,
    ENV_GEO_FILE, ENV_METADATA_FILE,
};
use crate::source::ArticleFilesConfig;

/// Input locations and loader options for a coverage pipeline.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Directory tree of per-country, per-year article tables.
    pub articles_root: PathBuf,
    /// Socioeconomic reference table.
    pub metadata_path: PathBuf,
    /// Boundary feature collection.
    pub geo_path: PathBuf,
    /// Whether to follow symlinks while scanning articles.
    pub follow_links: bool,
    /// Extensions treated as article tables.
    pub article_extensions: Vec<String>,
    /// Skip malformed article files instead of aborting the load.
    pub skip_malformed_files: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            articles_root: PathBuf::from(DEFAULT_ARTICLES_DIR),
            metadata_path: PathBuf::from(DEFAULT_METADATA_FILE),
            geo_path: PathBuf::from(DEFAULT_GEO_FILE),
            follow_links: true,
            article_extensions: vec![DEFAULT_EXTENSION.to_string()],
            skip_malformed_files: false,
        }
    }
}

impl PipelineConfig {
    /// Create a config with explicit input locations.
    pub fn new(
        articles_root: impl Into<PathBuf>,
        metadata_path: impl Into<PathBuf>,
        geo_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            articles_root: articles_root.into(),
            metadata_path: metadata_path.into(),
            geo_path: geo_path.into(),
            ..Self::default()
        }
    }

    /// Resolve each input by explicit value, then environment variable, then default.
    pub fn from_overrides(
        articles_root: Option<PathBuf>,
        metadata_path: Option<PathBuf>,
        geo_path: Option<PathBuf>,
    ) -> Self {
        Self {
            articles_root: resolve_input(articles_root, ENV_ARTICLES_DIR, DEFAULT_ARTICLES_DIR),
            metadata_path: resolve_input(metadata_path, ENV_METADATA_FILE, DEFAULT_METADATA_FILE),
            geo_path: resolve_input(geo_path, ENV_GEO_FILE, DEFAULT_GEO_FILE),
            ..Self::default()
        }
    }

    /// Override symlink traversal for the article scan.
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Override the accepted article file extensions.
    pub fn with_article_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.article_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Isolate malformed article files instead of failing the scan.
    pub fn with_skip_malformed_files(mut self, skip_malformed_files: bool) -> Self {
        self.skip_malformed_files = skip_malformed_files;
        self
    }

    /// Article source configuration derived from this pipeline config.
    pub fn article_files(&self) -> ArticleFilesConfig {
        ArticleFilesConfig::new(&self.articles_root)
            .with_follow_links(self.follow_links)
            .with_extensions(self.article_extensions.iter().cloned())
            .with_skip_malformed_files(self.skip_malformed_files)
    }
}

fn resolve_input(explicit: Option<PathBuf>, env_key: &str, default: &str) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    env_path(env_key).unwrap_or_else(|| Path::new(default).to_path_buf())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
