//! Traversal nodes and their per-run decisions.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// What kind of filesystem entry a node is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    File,
    Directory,
    /// A symbolic link. `target` is root-relative when the link stays inside
    /// the root, otherwise the raw link text.
    Symlink { target: String, target_is_dir: bool },
}

impl NodeKind {
    /// True when the node should be treated as a directory for matching.
    pub fn is_dir_like(&self) -> bool {
        match self {
            NodeKind::Directory => true,
            NodeKind::Symlink { target_is_dir, .. } => *target_is_dir,
            NodeKind::File => false,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Directory => "directory",
            NodeKind::Symlink { .. } => "symlink",
        }
    }
}

/// Why a path was filtered out by rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", content = "pattern", rename_all = "snake_case")]
pub enum ExcludeReason {
    /// Matched a built-in ignore pattern.
    DefaultIgnore(String),
    /// Matched a user exclude pattern.
    UserIgnore(String),
    /// Include patterns were given and none matched.
    NotIncluded,
    SymlinkOutsideRoot,
    SymlinkCycle,
    /// FIFO, socket or device; never opened.
    NotRegularFile,
}

impl fmt::Display for ExcludeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExcludeReason::DefaultIgnore(pattern) => write!(f, "default ignore '{pattern}'"),
            ExcludeReason::UserIgnore(pattern) => write!(f, "exclude pattern '{pattern}'"),
            ExcludeReason::NotIncluded => f.write_str("not matched by include patterns"),
            ExcludeReason::SymlinkOutsideRoot => f.write_str("symlink points outside root"),
            ExcludeReason::SymlinkCycle => f.write_str("symlink cycle"),
            ExcludeReason::NotRegularFile => f.write_str("not a regular file"),
        }
    }
}

/// Why a path was left without content even though rules allowed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetReason {
    FileTooLarge { size: u64, limit: u64 },
    TotalBytesExhausted,
    FileCountReached,
    DepthLimit,
}

impl fmt::Display for BudgetReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetReason::FileTooLarge { size, limit } => {
                write!(f, "file too large ({size} > {limit} bytes)")
            }
            BudgetReason::TotalBytesExhausted => f.write_str("total size limit reached"),
            BudgetReason::FileCountReached => f.write_str("file count limit reached"),
            BudgetReason::DepthLimit => f.write_str("depth limit"),
        }
    }
}

/// The single, final decision for a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum Decision {
    Included,
    Excluded(ExcludeReason),
    Skipped(BudgetReason),
    Errored(String),
}

impl Decision {
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Included => "included",
            Decision::Excluded(_) => "excluded",
            Decision::Skipped(_) => "skipped",
            Decision::Errored(_) => "errored",
        }
    }

    pub fn reason(&self) -> Option<String> {
        match self {
            Decision::Included => None,
            Decision::Excluded(reason) => Some(reason.to_string()),
            Decision::Skipped(reason) => Some(reason.to_string()),
            Decision::Errored(message) => Some(message.clone()),
        }
    }

    pub fn is_included(&self) -> bool {
        matches!(self, Decision::Included)
    }
}

/// Loaded content of an included file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text { text: String, bytes_read: u64, truncated: bool },
    Binary,
}

/// One filesystem entry visited during a walk.
#[derive(Debug, Clone)]
pub struct TraversalNode {
    pub path: PathBuf,
    /// Root-relative path with forward slashes; empty for the root itself.
    pub relative_path: String,
    pub name: String,
    pub kind: NodeKind,
    pub size_bytes: u64,
    pub depth: usize,
    pub decision: Decision,
    pub content: Option<FileContent>,
}

impl TraversalNode {
    pub fn is_truncated(&self) -> bool {
        matches!(self.content, Some(FileContent::Text { truncated: true, .. }))
    }

    pub fn is_binary(&self) -> bool {
        matches!(self.content, Some(FileContent::Binary))
    }

    /// Bytes this node contributes to the summary size.
    pub fn content_bytes(&self) -> u64 {
        match &self.content {
            Some(FileContent::Text { bytes_read, .. }) => *bytes_read,
            Some(FileContent::Binary) => self.size_bytes,
            None => 0,
        }
    }

    pub fn diagnostic(&self) -> Diagnostic {
        Diagnostic {
            path: if self.relative_path.is_empty() {
                ".".to_string()
            } else {
                self.relative_path.clone()
            },
            kind: self.kind.label(),
            decision: self.decision.label(),
            reason: self.decision.reason(),
            truncated: self.is_truncated(),
            binary: self.is_binary(),
        }
    }
}

/// Flat record of one node's fate, for "what was skipped and why" views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub path: String,
    pub kind: &'static str,
    pub decision: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub binary: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_node(decision: Decision, content: Option<FileContent>) -> TraversalNode {
        TraversalNode {
            path: PathBuf::from("/repo/src/a.rs"),
            relative_path: "src/a.rs".to_string(),
            name: "a.rs".to_string(),
            kind: NodeKind::File,
            size_bytes: 42,
            depth: 2,
            decision,
            content,
        }
    }

    #[test]
    fn diagnostic_mirrors_decision() {
        let node = file_node(
            Decision::Skipped(BudgetReason::FileTooLarge { size: 42, limit: 10 }),
            None,
        );
        let diag = node.diagnostic();
        assert_eq!(diag.decision, "skipped");
        assert_eq!(diag.reason.as_deref(), Some("file too large (42 > 10 bytes)"));
        assert_eq!(diag.kind, "file");
    }

    #[test]
    fn binary_content_counts_full_size() {
        let node = file_node(Decision::Included, Some(FileContent::Binary));
        assert_eq!(node.content_bytes(), 42);
        assert!(node.diagnostic().binary);
    }

    #[test]
    fn truncated_text_counts_bytes_read() {
        let node = file_node(
            Decision::Included,
            Some(FileContent::Text { text: "abc".into(), bytes_read: 3, truncated: true }),
        );
        assert_eq!(node.content_bytes(), 3);
        assert!(node.is_truncated());
    }

    #[test]
    fn diagnostic_serializes_compactly() {
        let node = file_node(Decision::Excluded(ExcludeReason::NotIncluded), None);
        let value = serde_json::to_value(node.diagnostic()).expect("json");
        assert_eq!(value["decision"], "excluded");
        assert!(value.get("truncated").is_none());
    }
}
