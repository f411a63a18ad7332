//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn repo_digest() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("repo-digest"))
}

fn sample_repo() -> TempDir {
    let tmp = TempDir::new().expect("tmp");
    let root = tmp.path();
    fs::create_dir_all(root.join("src")).expect("mkdir");
    fs::create_dir_all(root.join("node_modules/pkg")).expect("mkdir");
    fs::write(root.join("src/main.py"), "print('hello')\n").expect("write");
    fs::write(root.join("README.md"), "# Sample\n").expect("write");
    fs::write(root.join("node_modules/pkg/index.js"), "module.exports = 1;\n").expect("write");
    tmp
}

#[test]
fn test_cli_version() {
    repo_digest()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("repo-digest"));
}

#[test]
fn test_cli_help() {
    repo_digest()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("digest"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_digest_to_stdout() {
    let repo = sample_repo();
    repo_digest()
        .args(["digest", "--output", "-"])
        .arg(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Files analyzed: 2"))
        .stdout(predicate::str::contains("Directory structure:"))
        .stdout(predicate::str::contains("File: src/main.py"))
        .stdout(predicate::str::contains("node_modules/ [excluded: default ignore"))
        .stdout(predicate::str::contains("module.exports").not())
        .stderr(predicate::str::contains("Analysis complete!"));
}

#[test]
fn test_digest_writes_output_and_report() {
    let repo = sample_repo();
    let out = TempDir::new().expect("out");
    let digest_path = out.path().join("nested/digest.txt");
    let report_path = out.path().join("report.json");

    repo_digest()
        .arg("digest")
        .arg(repo.path())
        .arg("--output")
        .arg(&digest_path)
        .arg("--report")
        .arg(&report_path)
        .arg("--no-timestamp")
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to:"));

    let text = fs::read_to_string(&digest_path).expect("digest");
    assert!(text.contains("File: README.md"));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).expect("report")).expect("json");
    assert_eq!(report["completion"], "complete");
    assert!(report.get("generated_at").is_none());
    assert_eq!(report["stats"]["files_included"], 2);
}

#[test]
fn test_digest_include_and_exclude_flags() {
    let repo = sample_repo();
    repo_digest()
        .args(["digest", "-o", "-", "-i", "*.py,*.md", "-e", "README.md"])
        .arg(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("File: src/main.py"))
        .stdout(predicate::str::contains("README.md [excluded: exclude pattern 'README.md']"));
}

#[test]
fn test_digest_reads_discovered_config() {
    let repo = sample_repo();
    fs::write(repo.path().join("repo-digest.toml"), "exclude_patterns = [\"src/\"]\n")
        .expect("write config");
    repo_digest()
        .args(["digest", "-o", "-"])
        .arg(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("src/ [excluded: exclude pattern 'src/']"));
}

#[test]
fn test_digest_rejects_explicit_bad_config() {
    let repo = sample_repo();
    let config = repo.path().join("broken.toml");
    fs::write(&config, "max_depth = \"deep\"\n").expect("write config");
    repo_digest()
        .args(["digest", "-o", "-", "--config"])
        .arg(&config)
        .arg(repo.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid TOML config"));
}

#[test]
fn test_digest_rejects_missing_path() {
    let tmp = TempDir::new().expect("tmp");
    repo_digest()
        .args(["digest", "-o", "-"])
        .arg(tmp.path().join("absent"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path does not exist"));
}

#[test]
fn test_digest_rejects_zero_ceiling() {
    let repo = sample_repo();
    repo_digest()
        .args(["digest", "-o", "-", "--max-files", "0"])
        .arg(repo.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be greater than zero"));
}

#[test]
fn test_digest_rejects_malformed_pattern() {
    let repo = sample_repo();
    repo_digest()
        .args(["digest", "-o", "-", "-e", "src/["])
        .arg(repo.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid exclude pattern"));
}

#[test]
fn test_completions_for_bash() {
    repo_digest()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("repo-digest"));
}
