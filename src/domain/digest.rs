//! The digest triple and the counters reported alongside it.

use serde::Serialize;
use sha2::{Digest as _, Sha256};

/// Line that opens and closes each per-file header in the content section.
pub const FILE_SEPARATOR: &str = "================================================";
/// Header prefix naming a file inside the content section.
pub const FILE_HEADER_PREFIX: &str = "File: ";
/// Header suffix marking a file whose content was cut by a size ceiling.
pub const TRUNCATED_SUFFIX: &str = " (truncated)";
/// Content shown for binary files.
pub const BINARY_PLACEHOLDER: &str = "[Binary file]";

/// Immutable output of a run: summary, rendered tree, concatenated content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Digest {
    summary: String,
    tree: String,
    content: String,
}

/// One file chunk recovered from a content section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChunk {
    pub path: String,
    pub truncated: bool,
    pub body: String,
}

impl Digest {
    pub fn new(summary: String, tree: String, content: String) -> Self {
        Self { summary, tree, content }
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn tree(&self) -> &str {
        &self.tree
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Plain-text concatenation used for "copy all" and file output.
    pub fn to_text(&self) -> String {
        format!("{}\n{}\n{}", self.summary, self.tree, self.content)
    }

    /// Stable short hash of the full text, usable as a cache key.
    pub fn fingerprint(&self) -> String {
        let hash = Sha256::digest(self.to_text().as_bytes());
        format!("{:x}", hash)[..16].to_string()
    }

    /// Split the content section back into per-file chunks.
    pub fn split_content(&self) -> Vec<ContentChunk> {
        split_content(&self.content)
    }
}

/// Split a content section produced by the assembler into per-file chunks.
///
/// Each block is `SEP\nFile: path\nSEP\n<body>\n\n`. Bodies may themselves
/// contain separator lines; a block only starts where a separator is
/// immediately followed by a header line and a second separator.
pub fn split_content(content: &str) -> Vec<ContentChunk> {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut starts = Vec::new();
    let mut i = 0;
    while i + 2 < lines.len() {
        if lines[i] == FILE_SEPARATOR
            && lines[i + 1].starts_with(FILE_HEADER_PREFIX)
            && lines[i + 2] == FILE_SEPARATOR
        {
            starts.push(i);
            i += 3;
        } else {
            i += 1;
        }
    }

    let mut chunks = Vec::with_capacity(starts.len());
    for (idx, &start) in starts.iter().enumerate() {
        let end = starts.get(idx + 1).copied().unwrap_or(lines.len());
        let header = &lines[start + 1][FILE_HEADER_PREFIX.len()..];
        let (path, truncated) = match header.strip_suffix(TRUNCATED_SUFFIX) {
            Some(path) => (path.to_string(), true),
            None => (header.to_string(), false),
        };
        let mut body = lines[start + 3..end].join("\n");
        // The newline before the next separator was consumed by the split.
        if end < lines.len() {
            body.push('\n');
        }
        let body = body.strip_suffix("\n\n").unwrap_or(&body).to_string();
        chunks.push(ContentChunk { path, truncated, body });
    }
    chunks
}

/// Counters describing a finished (or interrupted) run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub files_visited: usize,
    pub files_included: usize,
    pub files_excluded: usize,
    pub files_skipped: usize,
    pub files_errored: usize,
    pub files_binary: usize,
    pub files_truncated: usize,
    pub directories: usize,
    pub total_bytes: u64,
    pub estimated_tokens: u64,
}

/// Whether the walk ran to the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    Complete,
    /// The caller cancelled the run; the digest covers what was visited so far.
    Cancelled,
}
