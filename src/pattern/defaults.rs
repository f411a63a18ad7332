//! Built-in ignore set.

use super::rule::IgnoreRule;
use once_cell::sync::Lazy;

/// Patterns excluded unless `include_default_ignores` is turned off.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    // Version control
    ".git",
    ".svn",
    ".hg",
    ".bzr",
    // Dependencies and virtual environments
    "node_modules",
    "bower_components",
    "vendor/bundle",
    ".venv",
    "venv",
    "env/",
    "*.egg-info",
    ".eggs",
    // Build output and caches
    "__pycache__",
    ".mypy_cache",
    ".pytest_cache",
    ".ruff_cache",
    ".tox",
    ".gradle",
    ".next",
    ".cache/",
    "build/",
    "dist/",
    "target/",
    // Editors and OS metadata
    ".idea",
    ".vscode",
    ".DS_Store",
    "Thumbs.db",
    "*.swp",
    "*.swo",
    // Compiled artifacts
    "*.pyc",
    "*.pyo",
    "*.pyd",
    "*.so",
    "*.dylib",
    "*.dll",
    "*.exe",
    "*.o",
    "*.a",
    "*.obj",
    "*.class",
    "*.jar",
    "*.war",
    "*.whl",
    // Media and archives
    "*.png",
    "*.jpg",
    "*.jpeg",
    "*.gif",
    "*.bmp",
    "*.ico",
    "*.svg",
    "*.zip",
    "*.tar",
    "*.gz",
    "*.tgz",
    "*.7z",
    "*.rar",
    // Logs and temp files
    "*.log",
    "*.bak",
    "*.tmp",
    // Lock files
    "package-lock.json",
    "npm-shrinkwrap.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "poetry.lock",
    "Pipfile.lock",
    "Cargo.lock",
    "Gemfile.lock",
    "composer.lock",
    "go.sum",
];

/// Compiled once per process and shared read-only by every run.
pub static DEFAULT_RULES: Lazy<Vec<IgnoreRule>> = Lazy::new(|| {
    DEFAULT_IGNORE_PATTERNS
        .iter()
        .map(|pattern| {
            IgnoreRule::parse_builtin(pattern).expect("built-in ignore pattern is valid")
        })
        .collect()
});
