//! Depth-first traversal that decides the fate of every visited path.
//!
//! The walker is a lazy, single-pass iterator. Children are visited in
//! byte-wise lexicographic order of their names, so an unchanged tree always
//! yields the same node sequence.

use crate::budget::{Admission, Budget};
use crate::cancel::CancellationToken;
use crate::domain::{BudgetReason, Decision, ExcludeReason, FileContent, NodeKind, TraversalNode};
use crate::error::{IngestError, Result};
use crate::load::{describe_io_error, ContentLoader, LoadOutcome};
use crate::pattern::PatternMatcher;
use crate::utils::relative_path;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

struct Pending {
    path: PathBuf,
    depth: usize,
}

/// Iterator over [`TraversalNode`]s rooted at a directory (or single file).
pub struct TreeWalker<'a> {
    root: PathBuf,
    matcher: &'a PatternMatcher,
    budget: Budget,
    loader: ContentLoader,
    max_depth: usize,
    cancel: CancellationToken,
    pending: Vec<Pending>,
    interrupted: bool,
}

impl<'a> TreeWalker<'a> {
    /// Prepare a walk. The root is canonicalized so that symlink targets can
    /// be compared against it.
    pub fn new(
        root: &Path,
        matcher: &'a PatternMatcher,
        budget: Budget,
        max_depth: usize,
    ) -> Result<Self> {
        let root = fs::canonicalize(root).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => IngestError::RootNotFound { path: root.to_path_buf() },
            _ => IngestError::RootUnreadable { path: root.to_path_buf(), source },
        })?;

        Ok(Self {
            pending: vec![Pending { path: root.clone(), depth: 0 }],
            root,
            matcher,
            budget,
            loader: ContentLoader::default(),
            max_depth,
            cancel: CancellationToken::new(),
            interrupted: false,
        })
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Canonical root the walk is anchored at.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    /// True when the walk stopped because of cancellation.
    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    fn visit(&mut self, pending: Pending) -> TraversalNode {
        let Pending { path, depth } = pending;
        let relative = relative_path(&self.root, &path);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| ".".to_string());

        let mut node = TraversalNode {
            path,
            relative_path: relative,
            name,
            kind: NodeKind::File,
            size_bytes: 0,
            depth,
            decision: Decision::Included,
            content: None,
        };

        let metadata = match fs::symlink_metadata(&node.path) {
            Ok(metadata) => metadata,
            Err(err) => {
                node.decision = Decision::Errored(describe_io_error(&err));
                return node;
            }
        };

        let file_type = metadata.file_type();
        if depth == 0 && !file_type.is_dir() {
            // Single-file root: name the file by itself.
            node.relative_path = node.name.clone();
        }
        if file_type.is_symlink() {
            self.visit_symlink(&mut node);
        } else if file_type.is_dir() {
            node.kind = NodeKind::Directory;
            self.visit_directory(&mut node);
        } else {
            node.size_bytes = metadata.len();
            if let Some(reason) = self.excluded(&node, false) {
                node.decision = Decision::Excluded(reason);
            } else if !file_type.is_file() {
                node.decision = Decision::Excluded(ExcludeReason::NotRegularFile);
            } else {
                let read_path = node.path.clone();
                self.admit_and_load(&mut node, &read_path);
            }
        }

        tracing::debug!(
            path = %node.relative_path,
            decision = node.decision.label(),
            reason = %node.decision.reason().unwrap_or_default(),
            "visited"
        );
        node
    }

    /// Rule check; the root itself is never filtered.
    fn excluded(&self, node: &TraversalNode, is_dir: bool) -> Option<ExcludeReason> {
        if node.depth == 0 {
            return None;
        }
        self.matcher.decide(&node.relative_path, is_dir)
    }

    fn visit_directory(&mut self, node: &mut TraversalNode) {
        if let Some(reason) = self.excluded(node, true) {
            node.decision = Decision::Excluded(reason);
            return;
        }
        if node.depth > self.max_depth {
            node.decision = Decision::Skipped(BudgetReason::DepthLimit);
            return;
        }

        match sorted_children(&node.path) {
            Ok(children) => {
                self.budget.record_directory();
                let depth = node.depth + 1;
                self.pending.extend(children.into_iter().rev().map(|path| Pending { path, depth }));
            }
            Err(err) => {
                tracing::warn!("Cannot read directory {}: {}", node.path.display(), err);
                node.decision = Decision::Errored(describe_io_error(&err));
            }
        }
    }

    fn visit_symlink(&mut self, node: &mut TraversalNode) {
        let link_text = fs::read_link(&node.path)
            .map(|target| target.to_string_lossy().into_owned())
            .unwrap_or_default();

        let resolved = match fs::canonicalize(&node.path) {
            Ok(resolved) => resolved,
            Err(_) => {
                node.kind = NodeKind::Symlink { target: link_text, target_is_dir: false };
                node.decision = match self.excluded(node, false) {
                    Some(reason) => Decision::Excluded(reason),
                    None => Decision::Errored("broken symlink".to_string()),
                };
                return;
            }
        };

        let inside_root = resolved.starts_with(&self.root);
        let target_is_dir = resolved.is_dir();
        let target_rel = inside_root.then(|| relative_path(&self.root, &resolved));
        let target = target_rel.clone().unwrap_or(link_text);
        node.kind = NodeKind::Symlink { target, target_is_dir };

        if let Some(reason) = self.excluded(node, node.kind.is_dir_like()) {
            node.decision = Decision::Excluded(reason);
            return;
        }
        let Some(target_rel) = target_rel else {
            node.decision = Decision::Excluded(ExcludeReason::SymlinkOutsideRoot);
            return;
        };
        // The target is reached without walking its parents, so their
        // exclusions have to be checked here.
        if !target_rel.is_empty() {
            if let Some(reason) = self.matcher.ignored_with_ancestors(&target_rel, target_is_dir) {
                node.decision = Decision::Excluded(reason);
                return;
            }
        }

        if target_is_dir {
            // Directory links are never descended: the target is walked under
            // its real path. A link to an ancestor would loop forever.
            let parent = node.path.parent().and_then(|p| fs::canonicalize(p).ok());
            if parent.map_or(true, |parent| parent.starts_with(&resolved)) {
                node.decision = Decision::Excluded(ExcludeReason::SymlinkCycle);
            }
            return;
        }

        match fs::metadata(&resolved) {
            Ok(metadata) if metadata.is_file() => {
                node.size_bytes = metadata.len();
                self.admit_and_load(node, &resolved);
            }
            Ok(_) => node.decision = Decision::Excluded(ExcludeReason::NotRegularFile),
            Err(err) => node.decision = Decision::Errored(describe_io_error(&err)),
        }
    }

    fn admit_and_load(&mut self, node: &mut TraversalNode, read_path: &Path) {
        let read_limit = match self.budget.admit(node.size_bytes) {
            Admission::Allowed { read_limit } => read_limit,
            Admission::Rejected(reason) => {
                node.decision = Decision::Skipped(reason);
                return;
            }
        };

        match self.loader.load(read_path, read_limit) {
            LoadOutcome::Text { content, bytes_read, truncated } => {
                self.budget.record_text(bytes_read, &content);
                node.content = Some(FileContent::Text { text: content, bytes_read, truncated });
            }
            LoadOutcome::Binary => {
                self.budget.record_binary(node.size_bytes);
                node.content = Some(FileContent::Binary);
            }
            LoadOutcome::ReadError(message) => {
                tracing::warn!("Cannot read {}: {}", node.path.display(), message);
                node.decision = Decision::Errored(message);
            }
        }

        if let Some(reason) = self.budget.exhausted() {
            tracing::debug!("Budget exhausted after {}: {}", node.relative_path, reason);
        }
    }
}

impl Iterator for TreeWalker<'_> {
    type Item = TraversalNode;

    fn next(&mut self) -> Option<Self::Item> {
        if self.interrupted {
            return None;
        }
        let pending = self.pending.pop()?;
        if self.cancel.is_cancelled() {
            tracing::info!("Walk cancelled with {} entries pending", self.pending.len() + 1);
            self.interrupted = true;
            self.pending.clear();
            return None;
        }
        Some(self.visit(pending))
    }
}

fn sorted_children(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)?.map(|entry| entry.map(|e| e.path()));
    Ok(readable_children(dir, entries))
}

/// A failing entry is logged and dropped; its siblings are kept.
fn readable_children(
    dir: &Path,
    entries: impl Iterator<Item = io::Result<PathBuf>>,
) -> Vec<PathBuf> {
    let mut children: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::warn!("Skipping unreadable entry in {}: {}", dir.display(), err);
                None
            }
        })
        .collect();
    children.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    children
}
