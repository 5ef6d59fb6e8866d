//! Article source interfaces.
//!
//! Ownership model:
//! - `ArticleSource` is the pipeline-facing interface that produces raw article rows.
//! - `sources::article_files` walks a directory of per-country, per-year tables.
//! - `indexing` holds the path and date parsing helpers used while loading.

use std::path::Path;

use crate::data::RawArticleRecord;
use crate::errors::AtlasError;
use crate::transport::fs::DirectorySignature;

/// Path and date helpers used while indexing article files.
pub mod indexing;
/// Source implementation modules.
pub mod sources;

pub use sources::article_files::{ArticleFiles, ArticleFilesConfig};

/// Pipeline-facing article source.
///
/// For a fixed directory state, `load_all` must return the same rows and
/// `signature` the same value, so results can be memoized by signature.
pub trait ArticleSource: Send + Sync {
    /// Root identifying this source in caches and logs.
    fn root(&self) -> &Path;

    /// Content signature of the current input state.
    fn signature(&self) -> Result<DirectorySignature, AtlasError>;

    /// Digest of the options that shape `load_all` output (file filter,
    /// link traversal, malformed-file policy). Scans loaded under different
    /// options are never shared.
    fn options_digest(&self) -> u64;

    /// Load every article row.
    fn load_all(&self) -> Result<Vec<RawArticleRecord>, AtlasError>;
}
