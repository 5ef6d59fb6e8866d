use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::AtlasError;
use crate::hash::{hash_file_entry, stable_hash_with};

/// Content signature of a directory tree, used to detect when a cached scan is stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DirectorySignature {
    /// Number of matching files.
    pub files: usize,
    /// Hash over relative path, size, and modification time of every matching file.
    pub digest: u64,
}

/// Filesystem walker that lists tabular files under a root.
pub struct FileStream {
    root: PathBuf,
    follow_links: bool,
    extensions: Vec<String>,
}

impl FileStream {
    /// Create a stream rooted at `root` matching `extensions` (case-insensitive).
    pub fn new(root: impl Into<PathBuf>, extensions: &[String]) -> Self {
        Self {
            root: root.into(),
            follow_links: false,
            extensions: extensions.to_vec(),
        }
    }

    /// Configure symlink traversal.
    pub fn with_follow_symlinks(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Root this stream walks.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List every matching file under the root, sorted by path.
    ///
    /// A missing root or an unreadable directory entry is fatal.
    pub fn list_files(&self) -> Result<Vec<PathBuf>, AtlasError> {
        if !self.root.is_dir() {
            return Err(AtlasError::fatal_input(
                &self.root,
                "article directory not found",
            ));
        }
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(self.follow_links) {
            let entry = entry.map_err(|err| {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.root.clone());
                AtlasError::fatal_input(path, err)
            })?;
            if entry.file_type().is_file() && has_extension(entry.path(), &self.extensions) {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Compute the signature of the matching files under the root.
    pub fn signature(&self) -> Result<DirectorySignature, AtlasError> {
        let files = self.list_files()?;
        let digest = stable_hash_with(|hasher| {
            for path in &files {
                let rel = path.strip_prefix(&self.root).unwrap_or(path);
                let metadata = fs::metadata(path).ok();
                let len = metadata.as_ref().map(|meta| meta.len()).unwrap_or(0);
                let modified = metadata.and_then(|meta| meta.modified().ok());
                hash_file_entry(hasher, rel, len, modified);
            }
        });
        Ok(DirectorySignature {
            files: files.len(),
            digest,
        })
    }
}

/// True if the path's extension matches one of `extensions` (case-insensitive).
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            extensions
                .iter()
                .any(|wanted| ext.eq_ignore_ascii_case(wanted))
        })
        .unwrap_or(false)
}
