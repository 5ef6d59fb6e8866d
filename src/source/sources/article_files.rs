use std::path::{Path, PathBuf};
use std::hash::Hash;
use std::sync::Arc;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

use crate::constants::articles::{
    DATE_PUBLISHED_COLUMN, DEFAULT_EXTENSION, SKIP_MALFORMED_MSG, URL_COLUMN,
};
use crate::data::RawArticleRecord;
use crate::errors::AtlasError;
use crate::hash::stable_hash_with;
use crate::source::ArticleSource;
use crate::source::indexing::date_helpers::parse_publication_date;
use crate::source::indexing::file_naming::provenance_for;
use crate::transport::fs::{DirectorySignature, FileStream};

/// Configuration for a directory of per-country, per-year article tables.
#[derive(Clone, Debug)]
pub struct ArticleFilesConfig {
    /// Root directory scanned recursively.
    pub root: PathBuf,
    /// Whether to follow symlinks while walking the root.
    pub follow_links: bool,
    /// File extensions treated as article tables (case-insensitive).
    pub extensions: Vec<String>,
    /// Skip malformed files with a warning instead of aborting the load.
    pub skip_malformed_files: bool,
}

impl ArticleFilesConfig {
    /// Create a config for `root` with default settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_links: true,
            extensions: vec![DEFAULT_EXTENSION.to_string()],
            skip_malformed_files: false,
        }
    }

    /// Override whether symlinks are followed during the walk.
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Override the accepted file extensions.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Isolate per-file parse failures instead of failing the whole load.
    pub fn with_skip_malformed_files(mut self, skip_malformed_files: bool) -> Self {
        self.skip_malformed_files = skip_malformed_files;
        self
    }
}

/// Article source backed by a directory tree of tabular files.
///
/// Country and year are taken from each file's name (see
/// [`crate::source::indexing::file_naming`]), never from row content.
pub struct ArticleFiles {
    config: ArticleFilesConfig,
}

impl ArticleFiles {
    /// Create a source from configuration.
    pub fn new(config: ArticleFilesConfig) -> Self {
        Self { config }
    }

    fn file_stream(&self) -> FileStream {
        FileStream::new(&self.config.root, &self.config.extensions)
            .with_follow_symlinks(self.config.follow_links)
    }

    fn read_file(&self, path: &Path) -> Result<Vec<RawArticleRecord>, AtlasError> {
        let provenance = Arc::new(provenance_for(path)?);
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|err| AtlasError::fatal_input(path, err))?;
        let headers = reader
            .headers()
            .map_err(|err| AtlasError::fatal_input(path, err))?
            .clone();
        let url_idx = column_index(&headers, URL_COLUMN).ok_or_else(|| {
            AtlasError::fatal_input(path, format!("missing '{URL_COLUMN}' column"))
        })?;
        let date_idx = column_index(&headers, DATE_PUBLISHED_COLUMN);

        let mut records = Vec::new();
        let mut unparsed_dates = 0usize;
        for row in reader.records() {
            let row = row.map_err(|err| AtlasError::fatal_input(path, err))?;
            let url = row
                .get(url_idx)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string);
            let published = match date_idx.and_then(|idx| row.get(idx)) {
                Some(raw) => {
                    let parsed = parse_publication_date(raw);
                    if parsed.is_none() && !raw.trim().is_empty() {
                        unparsed_dates += 1;
                    }
                    parsed
                }
                None => None,
            };
            records.push(RawArticleRecord {
                url,
                published,
                provenance: Arc::clone(&provenance),
            });
        }

        if unparsed_dates > 0 {
            warn!(
                path = %path.display(),
                count = unparsed_dates,
                "unparseable publication dates set to null"
            );
        }
        debug!(
            path = %path.display(),
            country = %provenance.country,
            year = %provenance.year,
            rows = records.len(),
            "loaded article file"
        );
        Ok(records)
    }
}

impl ArticleSource for ArticleFiles {
    fn root(&self) -> &Path {
        &self.config.root
    }

    fn signature(&self) -> Result<DirectorySignature, AtlasError> {
        self.file_stream().signature()
    }

    fn options_digest(&self) -> u64 {
        let mut extensions: Vec<String> = self
            .config
            .extensions
            .iter()
            .map(|ext| ext.to_ascii_lowercase())
            .collect();
        extensions.sort();
        extensions.dedup();
        stable_hash_with(|hasher| {
            extensions.hash(hasher);
            self.config.follow_links.hash(hasher);
            self.config.skip_malformed_files.hash(hasher);
        })
    }

    fn load_all(&self) -> Result<Vec<RawArticleRecord>, AtlasError> {
        let files = self.file_stream().list_files()?;
        let mut records = Vec::new();
        let mut skipped = 0usize;
        for path in &files {
            match self.read_file(path) {
                Ok(rows) => records.extend(rows),
                Err(err) if self.config.skip_malformed_files => {
                    skipped += 1;
                    warn!(path = %path.display(), error = %err, "{}", SKIP_MALFORMED_MSG);
                }
                Err(err) => return Err(err),
            }
        }
        info!(
            root = %self.config.root.display(),
            files = files.len(),
            skipped,
            records = records.len(),
            "article scan complete"
        );
        Ok(records)
    }
}

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|header| header.trim() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn attaches_file_provenance_to_every_row() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("kenya_2021.csv"),
            "url,title\nhttps://a.example/1,One\nhttps://a.example/2,Two\n",
        )
        .unwrap();

        let source = ArticleFiles::new(ArticleFilesConfig::new(temp.path()));
        let records = source.load_all().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|record| record.country() == "Kenya"));
        assert!(records.iter().all(|record| record.year() == "2021"));
        assert!(Arc::ptr_eq(&records[0].provenance, &records[1].provenance));
    }

    #[test]
    fn unparseable_dates_become_none() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("ghana_2022.csv"),
            "url,date_published\nhttps://g.example/1,2022-03-04\nhttps://g.example/2,someday\nhttps://g.example/3,\n",
        )
        .unwrap();

        let source = ArticleFiles::new(ArticleFilesConfig::new(temp.path()));
        let records = source.load_all().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0].published.map(|parsed| parsed.date()),
            NaiveDate::from_ymd_opt(2022, 3, 4)
        );
        assert!(records[1].published.is_none());
        assert!(records[2].published.is_none());
    }

    #[test]
    fn empty_url_cells_are_kept_as_none() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("togo_2020.csv"),
            "url\nhttps://t.example/1\n\"\"\n",
        )
        .unwrap();

        let records = ArticleFiles::new(ArticleFilesConfig::new(temp.path()))
            .load_all()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].url.is_some());
        assert!(records[1].url.is_none());
    }

    #[test]
    fn malformed_file_aborts_load_by_default() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("kenya_2021.csv"), "url\nhttps://k.example/1\n").unwrap();
        fs::write(temp.path().join("mali_2021.csv"), "url,title\nonly-one-field\n").unwrap();

        let err = ArticleFiles::new(ArticleFilesConfig::new(temp.path()))
            .load_all()
            .unwrap_err();
        match err {
            AtlasError::FatalInput { path, .. } => assert!(path.ends_with("mali_2021.csv")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_file_is_skipped_when_isolation_enabled() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("kenya_2021.csv"), "url\nhttps://k.example/1\n").unwrap();
        fs::write(temp.path().join("mali_2021.csv"), "title\nno url column\n").unwrap();

        let records = ArticleFiles::new(
            ArticleFilesConfig::new(temp.path()).with_skip_malformed_files(true),
        )
        .load_all()
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].country(), "Kenya");
    }

    #[test]
    fn options_digest_tracks_load_policy() {
        let base = ArticleFiles::new(ArticleFilesConfig::new("articles"));
        let same = ArticleFiles::new(ArticleFilesConfig::new("articles").with_extensions(["CSV"]));
        let lenient = ArticleFiles::new(
            ArticleFilesConfig::new("articles").with_skip_malformed_files(true),
        );
        let no_links =
            ArticleFiles::new(ArticleFilesConfig::new("articles").with_follow_links(false));
        assert_eq!(base.options_digest(), same.options_digest());
        assert_ne!(base.options_digest(), lenient.options_digest());
        assert_ne!(base.options_digest(), no_links.options_digest());
    }

    #[test]
    fn respects_configured_extensions() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("kenya_2021.csv"), "url\nhttps://k.example/1\n").unwrap();
        fs::write(temp.path().join("kenya_2022.tsv"), "url\nhttps://k.example/2\n").unwrap();

        let source =
            ArticleFiles::new(ArticleFilesConfig::new(temp.path()).with_extensions(["tsv"]));
        let records = source.load_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year(), "2022");
        assert_eq!(source.root(), temp.path());
    }
}
