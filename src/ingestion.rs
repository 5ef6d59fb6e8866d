use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use indexmap::IndexMap;
use tracing::debug;

use crate::data::RawArticleRecord;
use crate::errors::AtlasError;
use crate::source::ArticleSource;
use crate::transport::fs::DirectorySignature;

/// Shared article rows produced by one source scan.
pub type ArticleRows = Arc<Vec<RawArticleRecord>>;

/// Explicit memo of article scans keyed by source root and load options.
///
/// A cached scan is reused only while the root's directory signature is
/// unchanged and only by sources with the same options digest. `invalidate`
/// and `clear` drop entries manually.
#[derive(Clone, Default)]
pub struct ArticleCache {
    inner: Arc<RwLock<ArticleCacheInner>>,
}

/// Internal mutable cache storage behind `ArticleCache` locks.
#[derive(Default)]
struct ArticleCacheInner {
    entries: IndexMap<ScanKey, CachedScan>,
    hits: u64,
    misses: u64,
}

/// Source root plus the digest of its load options.
type ScanKey = (PathBuf, u64);

/// Internal cache entry: the signature observed at load time plus the rows.
struct CachedScan {
    signature: DirectorySignature,
    rows: ArticleRows,
}

/// Hit/miss counters for cache inspection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArticleCacheStats {
    /// Lookups answered from a cached scan.
    pub hits: u64,
    /// Lookups that triggered a full scan.
    pub misses: u64,
    /// Cached scans currently held.
    pub entries: usize,
}

impl ArticleCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return cached rows for `source` when its signature is unchanged, otherwise reload.
    pub fn get_or_load<S>(&self, source: &S) -> Result<ArticleRows, AtlasError>
    where
        S: ArticleSource + ?Sized,
    {
        let root = source.root().to_path_buf();
        let key: ScanKey = (root.clone(), source.options_digest());
        let signature = source.signature()?;
        {
            let mut inner = self.inner.write().expect("article cache poisoned");
            if let Some(entry) = inner.entries.get(&key)
                && entry.signature == signature
            {
                let rows = Arc::clone(&entry.rows);
                inner.hits = inner.hits.saturating_add(1);
                debug!(root = %root.display(), files = signature.files, "article cache hit");
                return Ok(rows);
            }
        }

        debug!(root = %root.display(), files = signature.files, "article cache miss");
        let rows: ArticleRows = Arc::new(source.load_all()?);
        let mut inner = self.inner.write().expect("article cache poisoned");
        inner.misses = inner.misses.saturating_add(1);
        inner.entries.insert(
            key,
            CachedScan {
                signature,
                rows: Arc::clone(&rows),
            },
        );
        Ok(rows)
    }

    /// Drop every cached scan for `root`. Returns `true` when an entry was removed.
    pub fn invalidate(&self, root: &Path) -> bool {
        let mut inner = self.inner.write().expect("article cache poisoned");
        let before = inner.entries.len();
        inner.entries.retain(|(cached_root, _), _| cached_root != root);
        inner.entries.len() != before
    }

    /// Remove all cached scans.
    pub fn clear(&self) {
        let mut inner = self.inner.write().expect("article cache poisoned");
        inner.entries.clear();
    }

    /// Return the number of cached scans.
    pub fn len(&self) -> usize {
        let inner = self.inner.read().expect("article cache poisoned");
        inner.entries.len()
    }

    /// Returns `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        let inner = self.inner.read().expect("article cache poisoned");
        inner.entries.is_empty()
    }

    /// Snapshot of hit/miss counters.
    pub fn stats(&self) -> ArticleCacheStats {
        let inner = self.inner.read().expect("article cache poisoned");
        ArticleCacheStats {
            hits: inner.hits,
            misses: inner.misses,
            entries: inner.entries.len(),
        }
    }
}
