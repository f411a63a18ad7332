//! Run options handed to the engine by the CLI or an embedding caller.

use crate::error::{IngestError, Result};
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_MAX_TOTAL_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_MAX_FILE_BYTES: u64 = 1024 * 1024;
pub const DEFAULT_MAX_FILES: usize = 10_000;
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// Options for one ingestion run.
///
/// Every field has a documented default so that a partial config file (or
/// none at all) still yields a usable set of options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    /// Ceiling on the content bytes loaded across the whole run (10 MiB).
    pub max_total_bytes: u64,
    /// Files larger than this are skipped without being read (1 MiB).
    pub max_file_bytes: u64,
    /// Ceiling on the number of files whose content is loaded (10 000).
    pub max_files: usize,
    /// Directories deeper than this are listed but not descended (20).
    pub max_depth: usize,
    /// When non-empty, only files matching one of these are loaded.
    #[serde(deserialize_with = "deserialize_patterns")]
    pub include_patterns: Vec<String>,
    /// Extra ignore rules; `!pattern` re-includes.
    #[serde(deserialize_with = "deserialize_patterns")]
    pub exclude_patterns: Vec<String>,
    /// Layer the built-in ignore set beneath `exclude_patterns`.
    pub include_default_ignores: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            max_total_bytes: DEFAULT_MAX_TOTAL_BYTES,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_files: DEFAULT_MAX_FILES,
            max_depth: DEFAULT_MAX_DEPTH,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            include_default_ignores: true,
        }
    }
}

impl IngestOptions {
    /// Reject ceilings that would make every run empty.
    pub fn validate(&self) -> Result<()> {
        if self.max_total_bytes == 0 {
            return Err(IngestError::ZeroCeiling { name: "max_total_bytes" });
        }
        if self.max_file_bytes == 0 {
            return Err(IngestError::ZeroCeiling { name: "max_file_bytes" });
        }
        if self.max_files == 0 {
            return Err(IngestError::ZeroCeiling { name: "max_files" });
        }
        if self.max_depth == 0 {
            return Err(IngestError::ZeroCeiling { name: "max_depth" });
        }
        Ok(())
    }
}

/// Split a pattern string on commas and whitespace, dropping empty pieces.
pub fn split_patterns(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Accept either a single comma/space separated string or a list of strings.
fn deserialize_patterns<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(raw) => split_patterns(&raw),
        OneOrMany::Many(items) => items.iter().flat_map(|item| split_patterns(item)).collect(),
    })
}
