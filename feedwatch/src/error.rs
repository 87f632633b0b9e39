//! Error types for the feed pipeline.
//!
//! `ParseError` is per-record and never leaves the processing step.
//! `FeedError` terminates the run loop.

use std::{io, path::PathBuf};

/// Why a single line was rejected.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    #[error("missing timestamp")]
    MissingTimestamp,

    #[error("invalid timestamp {value:?}: expected YYYY-MM-DD HH:MM:SS")]
    InvalidTimestamp { value: String },
}

/// Failures that stop the feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("data file {} does not exist", .0.display())]
    FileMissing(PathBuf),

    #[error("i/o error while reading the feed")]
    Io(#[from] io::Error),

    #[error("terminal error: {0}")]
    Terminal(io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration problems detected before the feed starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read palette file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse palette file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown color {color:?} for category {category:?}")]
    UnknownColor { category: String, color: String },

    #[error("category {0:?} appears more than once in the palette")]
    DuplicateCategory(String),

    #[error("palette has no categories")]
    EmptyPalette,
}
