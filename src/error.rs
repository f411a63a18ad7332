//! Engine error types.
//!
//! Only configuration problems surface as errors. Per-node failures are
//! recorded on the node itself and never abort a run.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = IngestError> = std::result::Result<T, E>;

/// A pattern that could not be compiled.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("empty pattern")]
    Empty,

    #[error("pattern '{0}' negates nothing")]
    BareNegation(String),

    #[error("include pattern '{0}' cannot be negated")]
    NegatedInclude(String),

    #[error("invalid glob '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Errors that fail a run before traversal starts.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Path does not exist: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Cannot read root {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {list} pattern: {source}")]
    Pattern {
        list: &'static str,
        #[source]
        source: PatternError,
    },

    #[error("Invalid option '{name}': must be greater than zero")]
    ZeroCeiling { name: &'static str },
}
