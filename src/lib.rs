//! repo-digest: turn a directory tree into one bounded, LLM-friendly digest.
//!
//! The engine walks a root directory depth-first, filters paths through
//! ignore/include patterns, loads the surviving files under size ceilings,
//! and assembles a summary, a rendered tree, and the concatenated contents.

pub mod budget;
pub mod cancel;
pub mod config;
pub mod domain;
pub mod error;
pub mod ingest;
pub mod load;
pub mod pattern;
pub mod render;
pub mod scan;
pub mod utils;

pub use cancel::CancellationToken;
pub use domain::{
    Completion, Decision, Diagnostic, Digest, IngestOptions, IngestStats, TraversalNode,
};
pub use error::{IngestError, PatternError};
pub use ingest::{ingest, IngestReport};
