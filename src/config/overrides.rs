//! Command-line overrides layered on top of file options.

use crate::domain::IngestOptions;

/// Values given explicitly on the command line. `None` (or an empty list)
/// leaves the file/default value untouched.
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    pub max_total_bytes: Option<u64>,
    pub max_file_bytes: Option<u64>,
    pub max_files: Option<usize>,
    pub max_depth: Option<usize>,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub no_default_ignores: bool,
}

impl OptionOverrides {
    /// Apply onto `options`. Include patterns replace the file's list;
    /// exclude patterns extend it so `!` re-includes from the command line
    /// are evaluated after file rules.
    pub fn apply(self, mut options: IngestOptions) -> IngestOptions {
        if let Some(value) = self.max_total_bytes {
            options.max_total_bytes = value;
        }
        if let Some(value) = self.max_file_bytes {
            options.max_file_bytes = value;
        }
        if let Some(value) = self.max_files {
            options.max_files = value;
        }
        if let Some(value) = self.max_depth {
            options.max_depth = value;
        }
        if !self.include_patterns.is_empty() {
            options.include_patterns = self.include_patterns;
        }
        options.exclude_patterns.extend(self.exclude_patterns);
        if self.no_default_ignores {
            options.include_default_ignores = false;
        }
        options
    }
}
