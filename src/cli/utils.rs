//! Shared CLI utilities.

use repo_digest::domain::config::split_patterns;

/// Flatten repeated pattern flags, each of which may itself hold a comma or
/// space separated list.
pub fn parse_patterns(values: &[String]) -> Vec<String> {
    values.iter().flat_map(|value| split_patterns(value)).collect()
}
