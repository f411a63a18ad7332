//! End-to-end engine scenarios through the public library API.

use repo_digest::domain::digest::BINARY_PLACEHOLDER;
use repo_digest::domain::{BudgetReason, ExcludeReason};
use repo_digest::{ingest, CancellationToken, Completion, Decision, IngestOptions, IngestReport};
use similar_asserts::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn run(root: &Path, options: &IngestOptions) -> IngestReport {
    ingest(root, options, CancellationToken::new()).expect("ingest")
}

fn decision<'r>(report: &'r IngestReport, rel: &str) -> &'r Decision {
    &report
        .nodes
        .iter()
        .find(|n| n.relative_path == rel)
        .unwrap_or_else(|| panic!("no node for {rel}"))
        .decision
}

fn write_sized(path: &Path, len: usize) {
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, "a".repeat(len)).expect("write");
}

#[test]
fn default_ignores_keep_vcs_and_dependencies_out() {
    let tmp = TempDir::new().expect("tmp");
    let root = tmp.path();
    write_sized(&root.join("src/main.py"), 120);
    write_sized(&root.join(".git/config"), 50);
    write_sized(&root.join("node_modules/x.js"), 200);
    write_sized(&root.join("README.md"), 80);

    let report = run(root, &IngestOptions::default());
    let paths: Vec<String> = report.digest.split_content().into_iter().map(|c| c.path).collect();
    assert_eq!(paths, vec!["README.md", "src/main.py"]);

    let summary = report.digest.summary();
    assert!(summary.contains("Files analyzed: 2\n"), "summary: {summary}");
    assert!(summary.contains("Total size: 200 bytes\n"), "summary: {summary}");

    let tree = report.digest.tree();
    assert!(tree.contains(".git/ [excluded: default ignore '.git']"), "tree: {tree}");
    assert!(tree.contains("node_modules/ [excluded: default ignore"), "tree: {tree}");
    assert!(!tree.contains("config"), "excluded dirs are not descended: {tree}");
}

#[test]
fn oversized_file_is_skipped_without_counting() {
    let tmp = TempDir::new().expect("tmp");
    let big = tmp.path().join("huge.txt");
    let file = fs::File::create(&big).expect("create");
    file.set_len(50 * 1024 * 1024).expect("sparse file");

    let options = IngestOptions { max_file_bytes: 1024 * 1024, ..Default::default() };
    let report = run(tmp.path(), &options);

    assert!(matches!(
        decision(&report, "huge.txt"),
        Decision::Skipped(BudgetReason::FileTooLarge { .. })
    ));
    assert_eq!(report.stats.total_bytes, 0);
    assert!(report.digest.split_content().is_empty());
    assert!(report.digest.tree().contains("huge.txt [skipped: file too large"));
}

#[test]
fn binary_file_gets_placeholder_and_counts() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("blob.dat"), [0u8, 159, 146, 150, 0, 1, 2, 3]).expect("write");
    fs::write(tmp.path().join("notes.txt"), "plain text\n").expect("write");

    let report = run(tmp.path(), &IngestOptions::default());
    let chunks = report.digest.split_content();
    let blob = chunks.iter().find(|c| c.path == "blob.dat").expect("blob chunk");
    assert_eq!(blob.body, BINARY_PLACEHOLDER);
    assert!(report.digest.summary().contains("Files analyzed: 2\n"));
    assert_eq!(report.stats.files_binary, 1);
    assert!(report.digest.tree().contains("blob.dat [binary]"));
}

#[test]
fn output_is_deterministic() {
    let tmp = TempDir::new().expect("tmp");
    let root = tmp.path();
    let files = [("b.rs", "fn b() {}"), ("a/z.md", "# z"), ("a/b.py", "x = 1"), ("C.txt", "c")];
    for (rel, body) in files {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, body).expect("write");
    }

    let first = run(root, &IngestOptions::default());
    let second = run(root, &IngestOptions::default());
    assert_eq!(first.digest.to_text(), second.digest.to_text());
    assert_eq!(first.digest.fingerprint(), second.digest.fingerprint());
}

#[test]
fn tree_and_diagnostics_agree_for_every_node() {
    let tmp = TempDir::new().expect("tmp");
    let root = tmp.path();
    write_sized(&root.join("keep/a.txt"), 10);
    write_sized(&root.join("keep/big.txt"), 500);
    write_sized(&root.join("target/debug/out"), 10);
    write_sized(&root.join("debug.log"), 10);

    let options = IngestOptions { max_file_bytes: 100, ..Default::default() };
    let report = run(root, &options);
    let tree_lines: Vec<&str> = report.digest.tree().lines().skip(1).collect();

    assert_eq!(tree_lines.len(), report.nodes.len());
    assert_eq!(report.diagnostics.len(), report.nodes.len());
    for (line, diag) in tree_lines.iter().zip(&report.diagnostics) {
        let annotated = line.contains("[excluded:") || line.contains("[skipped:");
        let filtered = diag.decision == "excluded" || diag.decision == "skipped";
        assert_eq!(annotated, filtered, "line {line:?} vs {diag:?}");
        if let Some(reason) = &diag.reason {
            assert!(line.contains(reason.as_str()), "line {line:?} missing {reason}");
        }
    }
}

#[test]
fn include_patterns_cannot_resurrect_ignored_directories() {
    let tmp = TempDir::new().expect("tmp");
    let root = tmp.path();
    write_sized(&root.join("node_modules/lib.js"), 10);
    write_sized(&root.join("app.js"), 10);

    let options = IngestOptions { include_patterns: vec!["*.js".into()], ..Default::default() };
    let report = run(root, &options);
    let paths: Vec<String> = report.digest.split_content().into_iter().map(|c| c.path).collect();
    assert_eq!(paths, vec!["app.js"]);
    assert!(matches!(
        decision(&report, "node_modules"),
        Decision::Excluded(ExcludeReason::DefaultIgnore(_))
    ));
}

#[test]
fn reinclude_rule_restores_ignored_directory() {
    let tmp = TempDir::new().expect("tmp");
    let root = tmp.path();
    write_sized(&root.join("node_modules/lib.js"), 10);
    write_sized(&root.join("app.js"), 10);

    let options = IngestOptions {
        exclude_patterns: vec!["!node_modules".into()],
        ..Default::default()
    };
    let report = run(root, &options);
    let paths: Vec<String> = report.digest.split_content().into_iter().map(|c| c.path).collect();
    assert_eq!(paths, vec!["app.js", "node_modules/lib.js"]);
}

#[test]
fn total_budget_truncates_then_stops() {
    let tmp = TempDir::new().expect("tmp");
    let root = tmp.path();
    write_sized(&root.join("a.txt"), 60);
    write_sized(&root.join("b.txt"), 60);
    write_sized(&root.join("c.txt"), 60);

    let options = IngestOptions { max_total_bytes: 100, ..Default::default() };
    let report = run(root, &options);

    assert_eq!(report.stats.total_bytes, 100);
    assert_eq!(report.stats.files_truncated, 1);
    assert_eq!(report.exhausted, Some(BudgetReason::TotalBytesExhausted));
    assert_eq!(
        decision(&report, "c.txt"),
        &Decision::Skipped(BudgetReason::TotalBytesExhausted)
    );
    let summary = report.digest.summary();
    assert!(summary.contains("Truncated: 1 file"), "summary: {summary}");
    assert!(summary.contains("Incomplete: total size limit reached"), "summary: {summary}");
    assert!(report.digest.content().contains("File: b.txt (truncated)\n"));
}

#[test]
fn binary_near_the_limit_overshoots_by_at_most_one_file() {
    let tmp = TempDir::new().expect("tmp");
    let root = tmp.path();
    write_sized(&root.join("a.txt"), 50);
    write_sized(&root.join("b.txt"), 45);
    fs::write(root.join("z.bin"), [0u8; 30]).expect("write");

    let options = IngestOptions { max_total_bytes: 100, max_file_bytes: 60, ..Default::default() };
    let report = run(root, &options);

    assert_eq!(report.stats.files_binary, 1);
    assert!(report.stats.total_bytes > options.max_total_bytes);
    assert!(report.stats.total_bytes <= options.max_total_bytes + options.max_file_bytes);
    assert_eq!(report.exhausted, Some(BudgetReason::TotalBytesExhausted));
}

#[test]
fn cancelled_before_start_reports_cancelled() {
    let tmp = TempDir::new().expect("tmp");
    write_sized(&tmp.path().join("a.txt"), 10);
    let token = CancellationToken::new();
    token.cancel();

    let report = ingest(tmp.path(), &IngestOptions::default(), token).expect("ingest");
    assert_eq!(report.completion, Completion::Cancelled);
    assert!(!report.is_complete());
}

#[test]
fn split_content_recovers_bodies_verbatim() {
    let tmp = TempDir::new().expect("tmp");
    let root = tmp.path();
    fs::write(root.join("one.md"), "# One\n\nBody text.\n").expect("write");
    fs::write(root.join("two.py"), "def f():\n    return 2").expect("write");

    let report = run(root, &IngestOptions::default());
    let chunks = report.digest.split_content();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].body, "# One\n\nBody text.\n");
    assert_eq!(chunks[1].body, "def f():\n    return 2");
    assert!(chunks.iter().all(|c| !c.truncated));
}

#[cfg(unix)]
#[test]
fn symlink_loop_terminates() {
    use std::os::unix::fs::symlink;

    let tmp = TempDir::new().expect("tmp");
    let root = tmp.path();
    write_sized(&root.join("pkg/mod.rs"), 10);
    symlink(root, root.join("pkg/up")).expect("link");
    symlink(root.join("pkg"), root.join("pkg/self")).expect("link");

    let report = run(root, &IngestOptions::default());
    assert_eq!(decision(&report, "pkg/up"), &Decision::Excluded(ExcludeReason::SymlinkCycle));
    assert_eq!(decision(&report, "pkg/self"), &Decision::Excluded(ExcludeReason::SymlinkCycle));
    assert_eq!(report.digest.split_content().len(), 1);
}
