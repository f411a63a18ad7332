//! Core data types shared by the walker, loader and renderers.

pub mod config;
pub mod digest;
pub mod node;

pub use config::IngestOptions;
pub use digest::{Completion, ContentChunk, Digest, IngestStats};
pub use node::{
    BudgetReason, Decision, Diagnostic, ExcludeReason, FileContent, NodeKind, TraversalNode,
};
