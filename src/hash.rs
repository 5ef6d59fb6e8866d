use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::time::SystemTime;

pub fn stable_hash_with(f: impl FnOnce(&mut DefaultHasher)) -> u64 {
    let mut hasher = DefaultHasher::new();
    f(&mut hasher);
    hasher.finish()
}

/// Feed one file's identity (relative path, size, mtime) into a running hasher.
pub fn hash_file_entry(
    hasher: &mut DefaultHasher,
    rel_path: &Path,
    len: u64,
    modified: Option<SystemTime>,
) {
    rel_path.to_string_lossy().hash(hasher);
    len.hash(hasher);
    modified
        .and_then(|time| time.duration_since(SystemTime::UNIX_EPOCH).ok())
        .map(|since| since.as_nanos())
        .hash(hasher);
}
