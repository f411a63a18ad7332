//! Report JSON generation.

use crate::ingest::IngestReport;
use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::{Map, Value};
use std::path::Path;

pub const REPORT_SCHEMA_VERSION: &str = "1.0";

/// Machine-readable account of a run: counters plus one diagnostic per node.
pub fn report_value(report: &IngestReport, include_timestamp: bool) -> Result<Value> {
    let mut out = Map::new();
    out.insert("schema_version".to_string(), Value::String(REPORT_SCHEMA_VERSION.to_string()));
    if include_timestamp {
        out.insert(
            "generated_at".to_string(),
            Value::String(Utc::now().format("%Y-%m-%dT%H:%M:%S+00:00").to_string()),
        );
    }
    out.insert("root".to_string(), Value::String(report.root_name.clone()));
    out.insert("completion".to_string(), serde_json::to_value(report.completion)?);
    out.insert("fingerprint".to_string(), Value::String(report.digest.fingerprint()));
    out.insert("stats".to_string(), serde_json::to_value(&report.stats)?);
    out.insert("options".to_string(), serde_json::to_value(&report.options)?);
    out.insert("diagnostics".to_string(), serde_json::to_value(&report.diagnostics)?);
    Ok(Value::Object(out))
}

pub fn write_report(
    report_path: &Path,
    report: &IngestReport,
    include_timestamp: bool,
) -> Result<()> {
    let value = report_value(report, include_timestamp)?;
    if let Some(parent) = report_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(report_path, serde_json::to_string_pretty(&value)?)
        .with_context(|| format!("Failed to write report to {}", report_path.display()))?;
    Ok(())
}
