/// Filesystem discovery and directory signatures.
pub mod fs;
