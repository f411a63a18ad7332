//! End-to-end ingestion: options in, digest and diagnostics out.

use crate::budget::Budget;
use crate::cancel::CancellationToken;
use crate::domain::{
    BudgetReason, Completion, Decision, Diagnostic, Digest, IngestOptions, IngestStats, NodeKind,
    TraversalNode,
};
use crate::error::Result;
use crate::pattern::PatternMatcher;
use crate::render::{assemble, render_tree, RunContext};
use crate::scan::walk;
use crate::utils::estimate_tokens;
use std::path::Path;
use std::time::Instant;

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub root_name: String,
    /// Effective options, echoed into the JSON report.
    pub options: IngestOptions,
    pub digest: Digest,
    pub nodes: Vec<TraversalNode>,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: IngestStats,
    pub completion: Completion,
    /// Ceiling that stopped content loading, if one was hit.
    pub exhausted: Option<BudgetReason>,
}

impl IngestReport {
    pub fn is_complete(&self) -> bool {
        self.completion == Completion::Complete
    }
}

/// Ingest `root` (a directory or a single file).
///
/// Configuration problems fail here before any traversal. Everything that
/// goes wrong afterwards is recorded per node, and cancellation still yields
/// a report carrying the partial digest.
pub fn ingest(
    root: &Path,
    options: &IngestOptions,
    cancel: CancellationToken,
) -> Result<IngestReport> {
    options.validate()?;
    let matcher = PatternMatcher::new(options)?;
    let started = Instant::now();

    let mut walker = walk(root, &matcher, Budget::new(options), options.max_depth)?
        .with_cancellation(cancel);
    let root_name = walker
        .root()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| walker.root().display().to_string());
    let single_file = !walker.root().is_dir();

    tracing::info!("Ingesting {}", walker.root().display());
    let nodes: Vec<TraversalNode> = walker.by_ref().collect();
    let completion =
        if walker.is_interrupted() { Completion::Cancelled } else { Completion::Complete };
    let exhausted = walker.budget().exhausted().cloned();

    let tree = render_tree(&nodes);
    let context = RunContext {
        root_name: &root_name,
        single_file,
        exhausted: exhausted.as_ref(),
        completion,
    };
    let digest = assemble(&context, &nodes, &tree);

    let mut stats = collect_stats(&nodes);
    stats.estimated_tokens = estimate_tokens(digest.content()) + estimate_tokens(digest.tree());
    let diagnostics = nodes.iter().map(TraversalNode::diagnostic).collect();

    tracing::info!(
        files = stats.files_included,
        bytes = stats.total_bytes,
        tokens = stats.estimated_tokens,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Ingest finished ({:?})",
        completion
    );

    Ok(IngestReport {
        root_name,
        options: options.clone(),
        digest,
        nodes,
        diagnostics,
        stats,
        completion,
        exhausted,
    })
}

fn collect_stats(nodes: &[TraversalNode]) -> IngestStats {
    let mut stats = IngestStats::default();
    for node in nodes {
        if node.kind == NodeKind::Directory {
            stats.directories += 1;
            continue;
        }
        stats.files_visited += 1;
        match &node.decision {
            Decision::Included if node.content.is_some() => {
                stats.files_included += 1;
                stats.total_bytes += node.content_bytes();
                if node.is_binary() {
                    stats.files_binary += 1;
                }
                if node.is_truncated() {
                    stats.files_truncated += 1;
                }
            }
            // Included links to in-root directories carry no content.
            Decision::Included => {}
            Decision::Excluded(_) => stats.files_excluded += 1,
            Decision::Skipped(_) => stats.files_skipped += 1,
            Decision::Errored(_) => stats.files_errored += 1,
        }
    }
    stats
}
