//! Digest command implementation

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::utils::parse_patterns;
use repo_digest::config::{load_options, OptionOverrides};
use repo_digest::render::write_report;
use repo_digest::{ingest, CancellationToken, Completion, IngestReport};

/// Output name used when `--output` is not given.
const DEFAULT_OUTPUT: &str = "digest.txt";

#[derive(Args)]
pub struct DigestArgs {
    /// Directory (or single file) to ingest
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Config file (TOML or YAML); discovered in PATH when omitted
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only load files matching these patterns (repeatable, comma-separated)
    #[arg(short = 'i', long = "include-pattern", value_name = "PATTERNS")]
    pub include_patterns: Vec<String>,

    /// Ignore paths matching these patterns; prefix with ! to re-include
    #[arg(short = 'e', long = "exclude-pattern", value_name = "PATTERNS")]
    pub exclude_patterns: Vec<String>,

    /// Skip files larger than this (bytes)
    #[arg(long, value_name = "BYTES")]
    pub max_file_bytes: Option<u64>,

    /// Stop loading content once this many bytes have been read
    #[arg(long, value_name = "BYTES")]
    pub max_total_bytes: Option<u64>,

    /// Stop loading content after this many files
    #[arg(long, value_name = "N")]
    pub max_files: Option<usize>,

    /// Do not descend below this directory depth
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Do not apply the built-in ignore patterns
    #[arg(long)]
    pub no_default_ignores: bool,

    /// Where to write the digest ("-" for stdout)
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Also write a JSON report of every path and its decision
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Omit the generation timestamp from the JSON report
    #[arg(long)]
    pub no_timestamp: bool,

    /// Give up after this many seconds and keep what was collected
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl DigestArgs {
    fn overrides(&self) -> OptionOverrides {
        OptionOverrides {
            max_total_bytes: self.max_total_bytes,
            max_file_bytes: self.max_file_bytes,
            max_files: self.max_files,
            max_depth: self.max_depth,
            include_patterns: parse_patterns(&self.include_patterns),
            exclude_patterns: parse_patterns(&self.exclude_patterns),
            no_default_ignores: self.no_default_ignores,
        }
    }

    fn writes_to_stdout(&self) -> bool {
        self.output.as_os_str() == "-"
    }
}

pub fn run(args: DigestArgs) -> Result<()> {
    let file_options = load_options(&args.path, args.config.as_deref())?;
    let options = args.overrides().apply(file_options);

    let cancel = match args.timeout {
        Some(secs) => CancellationToken::with_timeout(Duration::from_secs(secs)),
        None => CancellationToken::new(),
    };
    let handle = cancel.clone();
    if let Err(err) = ctrlc::set_handler(move || handle.cancel()) {
        tracing::warn!("Could not install Ctrl+C handler: {}", err);
    }

    let report = ingest(&args.path, &options, cancel)
        .with_context(|| format!("Failed to ingest {}", args.path.display()))?;

    let text = report.digest.to_text();
    if args.writes_to_stdout() {
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes()).context("Failed to write digest to stdout")?;
        stdout.flush()?;
    } else {
        write_output(&args.output, &text)?;
    }

    if let Some(report_path) = &args.report {
        write_report(report_path, &report, !args.no_timestamp)?;
    }

    print_status(&args, &report);
    Ok(())
}

fn write_output(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

/// Status goes to stderr when the digest itself is on stdout.
fn print_status(args: &DigestArgs, report: &IngestReport) {
    let mut lines = Vec::new();
    if report.completion == Completion::Cancelled {
        lines.push(format!(
            "{} Run interrupted; the digest covers only what was visited.",
            style("warning:").yellow().bold()
        ));
    }
    if args.writes_to_stdout() {
        lines.push(style("Analysis complete!").green().bold().to_string());
    } else {
        lines.push(format!(
            "{} Output written to: {}",
            style("Analysis complete!").green().bold(),
            style(args.output.display()).cyan()
        ));
    }
    if let Some(report_path) = &args.report {
        lines.push(format!("Report written to: {}", style(report_path.display()).cyan()));
    }
    lines.push(String::new());
    lines.push(style("Summary:").bold().to_string());
    lines.extend(report.digest.summary().lines().map(|line| format!("  {line}")));

    let block = lines.join("\n");
    if args.writes_to_stdout() {
        eprintln!("{block}");
    } else {
        println!("{block}");
    }
}
