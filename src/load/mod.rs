//! Content loading for admitted files.

pub mod encoding;
pub mod notebook;

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

pub use encoding::{decode, is_binary, DEFAULT_SAMPLE_SIZE};

/// Result of reading one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// `bytes_read` counts raw bytes taken from disk, which is what the
    /// budget is charged. It includes a BOM and any partial UTF-8 sequence
    /// dropped at the cut, so it can exceed `content.len()`.
    Text { content: String, bytes_read: u64, truncated: bool },
    Binary,
    ReadError(String),
}

/// Reads, classifies, and decodes file content under a byte limit.
#[derive(Debug, Clone)]
pub struct ContentLoader {
    sample_size: usize,
}

impl Default for ContentLoader {
    fn default() -> Self {
        Self { sample_size: DEFAULT_SAMPLE_SIZE }
    }
}

impl ContentLoader {
    /// Read at most `limit` bytes of `path`.
    ///
    /// The read is capped rather than read-then-discarded; one extra byte is
    /// requested only to learn whether the file continues past the limit.
    pub fn load(&self, path: &Path, limit: u64) -> LoadOutcome {
        let bytes = match read_capped(path, limit.saturating_add(1)) {
            Ok(bytes) => bytes,
            Err(err) => return LoadOutcome::ReadError(describe_io_error(&err)),
        };

        let truncated = bytes.len() as u64 > limit;
        let kept = if truncated { &bytes[..limit as usize] } else { &bytes[..] };

        let sample = &kept[..kept.len().min(self.sample_size)];
        if is_binary(sample) {
            return LoadOutcome::Binary;
        }

        let mut content = decode(kept, truncated);
        if !truncated && is_notebook_path(path) {
            match notebook::flatten_notebook(&content) {
                Ok(script) => content = script,
                Err(err) => {
                    tracing::warn!("Keeping raw notebook {}: {:#}", path.display(), err);
                }
            }
        }

        LoadOutcome::Text { content, bytes_read: kept.len() as u64, truncated }
    }
}

fn read_capped(path: &Path, cap: u64) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut bytes = Vec::new();
    file.take(cap).read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn is_notebook_path(path: &Path) -> bool {
    path.file_name().and_then(|n| n.to_str()).is_some_and(notebook::is_notebook)
}

/// Short human-readable description used for tree markers and diagnostics.
pub fn describe_io_error(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::PermissionDenied => "permission denied".to_string(),
        io::ErrorKind::NotFound => "file not found".to_string(),
        _ => format!("read failed: {err}"),
    }
}
