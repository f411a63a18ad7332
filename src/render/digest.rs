//! Digest assembly: summary, tree and content blocks.

use crate::domain::digest::{
    BINARY_PLACEHOLDER, FILE_HEADER_PREFIX, FILE_SEPARATOR, TRUNCATED_SUFFIX,
};
use crate::domain::{BudgetReason, Completion, Digest, FileContent, TraversalNode};
use crate::utils::{estimate_tokens, format_token_count, format_with_commas};

/// What the assembler needs to know about the run beyond its nodes.
#[derive(Debug, Clone)]
pub struct RunContext<'a> {
    /// Display name of the root (directory or file name).
    pub root_name: &'a str,
    /// The root was a regular file rather than a directory.
    pub single_file: bool,
    /// Ceiling that stopped content loading, if any.
    pub exhausted: Option<&'a BudgetReason>,
    pub completion: Completion,
}

/// Build the digest from the walk's nodes and the already rendered tree.
pub fn assemble(context: &RunContext<'_>, nodes: &[TraversalNode], tree: &str) -> Digest {
    let content = render_content(nodes);
    let tokens = estimate_tokens(&content) + estimate_tokens(tree);
    let summary = render_summary(context, nodes, tokens);
    Digest::new(summary, tree.to_string(), content)
}

fn render_content(nodes: &[TraversalNode]) -> String {
    let mut out = String::new();
    for node in nodes.iter().filter(|n| n.decision.is_included()) {
        let (body, truncated) = match &node.content {
            Some(FileContent::Text { text, truncated, .. }) => (text.as_str(), *truncated),
            Some(FileContent::Binary) => (BINARY_PLACEHOLDER, false),
            None => continue,
        };
        out.push_str(FILE_SEPARATOR);
        out.push('\n');
        out.push_str(FILE_HEADER_PREFIX);
        out.push_str(&node.relative_path);
        if truncated {
            out.push_str(TRUNCATED_SUFFIX);
        }
        out.push('\n');
        out.push_str(FILE_SEPARATOR);
        out.push('\n');
        out.push_str(body);
        out.push_str("\n\n");
    }
    out
}

fn render_summary(context: &RunContext<'_>, nodes: &[TraversalNode], tokens: u64) -> String {
    let loaded: Vec<&TraversalNode> =
        nodes.iter().filter(|n| n.decision.is_included() && n.content.is_some()).collect();
    let total_bytes: u64 = loaded.iter().map(|n| n.content_bytes()).sum();

    let mut lines = Vec::new();
    if context.single_file {
        lines.push(format!("File: {}", context.root_name));
        lines.push(format!("Size: {} bytes", format_with_commas(total_bytes)));
        let line_count = match loaded.first().and_then(|n| n.content.as_ref()) {
            Some(FileContent::Text { text, .. }) => text.lines().count() as u64,
            _ => 0,
        };
        lines.push(format!("Lines: {}", format_with_commas(line_count)));
    } else {
        lines.push(format!("Directory: {}", context.root_name));
        lines.push(format!("Files analyzed: {}", format_with_commas(loaded.len() as u64)));
        lines.push(format!("Total size: {} bytes", format_with_commas(total_bytes)));
    }
    lines.push(format!("Estimated tokens: {}", format_token_count(tokens)));

    let truncated = loaded.iter().filter(|n| n.is_truncated()).count();
    if truncated > 0 {
        let noun = if truncated == 1 { "file" } else { "files" };
        lines.push(format!("Truncated: {truncated} {noun} cut at the size limit"));
    }
    match (context.completion, context.exhausted) {
        (Completion::Cancelled, _) => {
            lines.push("Incomplete: run cancelled before the walk finished".to_string());
        }
        (Completion::Complete, Some(reason)) => {
            lines.push(format!("Incomplete: {reason}; remaining files were not loaded"));
        }
        (Completion::Complete, None) => {}
    }

    let mut summary = lines.join("\n");
    summary.push('\n');
    summary
}
