//! Config file loading

use crate::domain::IngestOptions;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Section names a config file may nest its options under.
const NESTED_SECTIONS: [&str; 2] = ["repo-digest", "digest"];

const CANDIDATES: [&str; 6] = [
    "repo-digest.toml",
    ".repo-digest.toml",
    "repo-digest.yml",
    ".repo-digest.yml",
    "repo-digest.yaml",
    ".repo-digest.yaml",
];

/// Load options from `config_path`, or from a config file discovered next to
/// `root`.
///
/// An explicit file must parse. A discovered one that does not is reported
/// and replaced by the defaults.
pub fn load_options(root: &Path, config_path: Option<&Path>) -> Result<IngestOptions> {
    let explicit = config_path.is_some();
    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(root),
    };
    let Some(config_file) = discovered else {
        return Ok(IngestOptions::default());
    };

    match read_config(&config_file) {
        Ok(options) => {
            tracing::debug!("Loaded config from {}", config_file.display());
            Ok(options)
        }
        Err(err) if explicit => Err(err),
        Err(err) => {
            tracing::warn!(
                "Ignoring auto-discovered config {}: {:#}",
                config_file.display(),
                err
            );
            Ok(IngestOptions::default())
        }
    }
}

fn read_config(config_file: &Path) -> Result<IngestOptions> {
    let content = fs::read_to_string(config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;
    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    match ext.as_str() {
        "toml" => parse_toml_config(&content, config_file),
        "yaml" | "yml" => parse_yaml_config(&content, config_file),
        other => anyhow::bail!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        ),
    }
}

fn parse_toml_config(content: &str, config_file: &Path) -> Result<IngestOptions> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;
    let section = NESTED_SECTIONS.iter().find_map(|name| raw.get(*name)).cloned();
    section
        .unwrap_or(raw)
        .try_into()
        .with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

fn parse_yaml_config(content: &str, config_file: &Path) -> Result<IngestOptions> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;
    // An empty document parses as null; treat it as "all defaults".
    if raw.is_null() {
        return Ok(IngestOptions::default());
    }
    let section = NESTED_SECTIONS.iter().find_map(|name| raw.get(*name)).cloned();
    serde_yaml::from_value(section.unwrap_or(raw))
        .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
}

/// Config files live in the ingested directory, or next to a single file.
fn discover_config(root: &Path) -> Option<PathBuf> {
    let dir = if root.is_dir() { root } else { root.parent()? };
    CANDIDATES.iter().map(|candidate| dir.join(candidate)).find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{DEFAULT_MAX_FILE_BYTES, DEFAULT_MAX_TOTAL_BYTES};
    use tempfile::TempDir;

    #[test]
    fn defaults_when_missing() {
        let tmp = TempDir::new().expect("tmp");
        let options = load_options(tmp.path(), None).expect("options");
        assert_eq!(options, IngestOptions::default());
    }

    #[test]
    fn loads_discovered_toml() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("repo-digest.toml"),
            "max_file_bytes = 999\nexclude_patterns = \"*.csv, fixtures/\"\n",
        )
        .expect("write");

        let options = load_options(tmp.path(), None).expect("options");
        assert_eq!(options.max_file_bytes, 999);
        assert_eq!(options.max_total_bytes, DEFAULT_MAX_TOTAL_BYTES);
        assert_eq!(options.exclude_patterns, vec!["*.csv", "fixtures/"]);
    }

    #[test]
    fn reads_nested_section() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("tools.toml");
        fs::write(&path, "[repo-digest]\nmax_depth = 3\ninclude_default_ignores = false\n")
            .expect("write");

        let options = load_options(tmp.path(), Some(&path)).expect("options");
        assert_eq!(options.max_depth, 3);
        assert!(!options.include_default_ignores);
    }

    #[test]
    fn loads_yaml_lists() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join(".repo-digest.yaml"),
            "include_patterns:\n  - \"*.rs\"\n  - \"docs/**\"\nmax_files: 50\n",
        )
        .expect("write");

        let options = load_options(tmp.path(), None).expect("options");
        assert_eq!(options.include_patterns, vec!["*.rs", "docs/**"]);
        assert_eq!(options.max_files, 50);
    }

    #[test]
    fn explicit_config_with_bad_type_is_an_error() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "max_file_bytes = \"lots\"\n").expect("write");

        let err = load_options(tmp.path(), Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid TOML config"), "got: {err:#}");
    }

    #[test]
    fn explicit_config_with_unknown_extension_is_an_error() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("settings.ini");
        fs::write(&path, "max_depth=3\n").expect("write");
        assert!(load_options(tmp.path(), Some(&path)).is_err());
    }

    #[test]
    fn discovered_config_soft_fails_to_defaults() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("repo-digest.toml"), "exclude_patterns = false\n")
            .expect("write");

        let options = load_options(tmp.path(), None).expect("should not error on discovery");
        assert_eq!(options.max_file_bytes, DEFAULT_MAX_FILE_BYTES);
    }

    #[test]
    fn discovers_next_to_single_file_root() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("repo-digest.toml"), "max_depth = 4\n").expect("write");
        let file = tmp.path().join("notes.md");
        fs::write(&file, "# notes").expect("write");

        let options = load_options(&file, None).expect("options");
        assert_eq!(options.max_depth, 4);
    }
}
