//! Glob-style include/exclude rules.
//!
//! Patterns are compiled once per run (the built-in set once per process)
//! and evaluated against root-relative, forward-slash paths.

pub mod defaults;
pub mod matcher;
pub mod rule;

pub use defaults::DEFAULT_IGNORE_PATTERNS;
pub use matcher::{IgnoreRuleSet, PatternMatcher};
pub use rule::{IgnoreRule, PatternKind, Polarity};
