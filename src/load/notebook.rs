//! Jupyter notebook flattening.
//!
//! Code cells are kept verbatim; markdown and raw cells become
//! triple-quoted blocks so the result reads like a Python script.

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;

pub fn is_notebook(name: &str) -> bool {
    name.ends_with(".ipynb")
}

/// Convert notebook JSON into script-like text.
pub fn flatten_notebook(json: &str) -> Result<String> {
    let notebook: Value = serde_json::from_str(json).context("Invalid notebook JSON")?;

    // Pre-v4 notebooks nest cells under `worksheets`; only the first is used.
    let container = match notebook.get("worksheets").and_then(Value::as_array) {
        Some(worksheets) => {
            if worksheets.len() > 1 {
                tracing::warn!(
                    "Notebook has {} worksheets; only the first is used",
                    worksheets.len()
                );
            }
            worksheets.first().ok_or_else(|| anyhow!("Notebook has an empty worksheets list"))?
        }
        None => &notebook,
    };

    let cells = container
        .get("cells")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("Notebook has no cells array"))?;

    let mut blocks = Vec::with_capacity(cells.len());
    for cell in cells {
        let cell_type = cell.get("cell_type").and_then(Value::as_str).unwrap_or("");
        if !matches!(cell_type, "code" | "markdown" | "raw") {
            bail!("Unknown cell type: {cell_type}");
        }

        let source = cell_source(cell.get("source"));
        if source.is_empty() {
            continue;
        }

        if cell_type == "code" {
            blocks.push(source);
        } else {
            blocks.push(format!("\"\"\"\n{source}\n\"\"\""));
        }
    }

    Ok(blocks.join("\n\n"))
}

/// Cell sources are either a list of lines or a single string.
fn cell_source(source: Option<&Value>) -> String {
    match source {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(lines)) => lines.iter().filter_map(Value::as_str).collect(),
        _ => String::new(),
    }
}
