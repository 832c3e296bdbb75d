//! Typed errors for the roster extraction library.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or compiling the pattern tables.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read pattern file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse pattern tables: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid {table} pattern `{pattern}`: {source}")]
    InvalidPattern {
        table: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A canonical label appears in both the executive and the board set.
    #[error("role `{0}` is listed as both an executive and a board role")]
    OverlappingRoleSets(String),
}

/// Errors raised by a name-recognition backend for a single section.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("name recognizer failed: {0}")]
    Backend(String),

    #[error("name span {start}..{end} does not align with a section of {len} bytes")]
    Misaligned { start: usize, end: usize, len: usize },

    /// The backend panicked; the payload message is kept.
    #[error("name recognizer panicked: {0}")]
    Panicked(String),
}
