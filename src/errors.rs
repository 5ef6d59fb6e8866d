use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for input loading, alias configuration, and pipeline failures.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// A required input is missing or cannot be parsed; the pipeline cannot continue.
    #[error("input '{}' is missing or malformed: {reason}", .path.display())]
    FatalInput {
        /// Offending input file or directory.
        path: PathBuf,
        /// Underlying parse or I/O failure.
        reason: String,
    },
    /// Invalid alias table or pipeline setting.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The inputs loaded but hold nothing to select from.
    #[error("no data available: {0}")]
    NoData(String),
    /// Filesystem failure outside input parsing.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AtlasError {
    pub(crate) fn fatal_input(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::FatalInput {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_input_message_names_the_file() {
        let err = AtlasError::fatal_input("africa_countries.geo.json", "file not found");
        let message = err.to_string();
        assert!(message.contains("africa_countries.geo.json"));
        assert!(message.contains("file not found"));
    }
}
