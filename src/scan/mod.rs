//! Directory traversal

use crate::budget::Budget;
use crate::error::Result;
use crate::pattern::PatternMatcher;
use std::path::Path;

pub mod walker;

pub use walker::TreeWalker;

/// Start a lazy walk of `root`. The returned iterator is single-pass.
pub fn walk<'a>(
    root: &Path,
    matcher: &'a PatternMatcher,
    budget: Budget,
    max_depth: usize,
) -> Result<TreeWalker<'a>> {
    TreeWalker::new(root, matcher, budget, max_depth)
}
