//! Size and token accounting against the run's ceilings.
//!
//! Files are admitted before they are read. The admitted read limit never
//! exceeds the remaining byte budget, so text content cannot push the total
//! past `max_total_bytes`. Binary files are charged their on-disk size,
//! which is bounded by `max_file_bytes`.

use crate::domain::{BudgetReason, IngestOptions};
use crate::utils::estimate_tokens;

/// Outcome of asking the budget whether a file's content may be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Load at most `read_limit` bytes.
    Allowed { read_limit: u64 },
    Rejected(BudgetReason),
}

#[derive(Debug, Clone)]
pub struct Budget {
    max_total_bytes: u64,
    max_file_bytes: u64,
    max_files: usize,
    bytes_consumed: u64,
    tokens: u64,
    files: usize,
    directories: usize,
    exhausted: Option<BudgetReason>,
}

impl Budget {
    pub fn new(options: &IngestOptions) -> Self {
        Self {
            max_total_bytes: options.max_total_bytes,
            max_file_bytes: options.max_file_bytes,
            max_files: options.max_files,
            bytes_consumed: 0,
            tokens: 0,
            files: 0,
            directories: 0,
            exhausted: None,
        }
    }

    pub fn admit(&self, file_size: u64) -> Admission {
        if let Some(reason) = &self.exhausted {
            return Admission::Rejected(reason.clone());
        }
        if file_size > self.max_file_bytes {
            return Admission::Rejected(BudgetReason::FileTooLarge {
                size: file_size,
                limit: self.max_file_bytes,
            });
        }
        Admission::Allowed { read_limit: file_size.min(self.remaining_bytes()) }
    }

    /// Charge a loaded text file.
    pub fn record_text(&mut self, bytes_read: u64, text: &str) {
        self.bytes_consumed = self.bytes_consumed.saturating_add(bytes_read);
        self.tokens = self.tokens.saturating_add(estimate_tokens(text));
        self.record_file();
    }

    /// Charge a binary file at its full size.
    pub fn record_binary(&mut self, size: u64) {
        self.bytes_consumed = self.bytes_consumed.saturating_add(size);
        self.record_file();
    }

    pub fn record_directory(&mut self) {
        self.directories += 1;
    }

    fn record_file(&mut self) {
        self.files += 1;
        if self.exhausted.is_some() {
            return;
        }
        if self.bytes_consumed >= self.max_total_bytes {
            self.exhausted = Some(BudgetReason::TotalBytesExhausted);
        } else if self.files >= self.max_files {
            self.exhausted = Some(BudgetReason::FileCountReached);
        }
    }

    pub fn remaining_bytes(&self) -> u64 {
        self.max_total_bytes.saturating_sub(self.bytes_consumed)
    }

    /// Set once a ceiling is hit; never cleared.
    pub fn exhausted(&self) -> Option<&BudgetReason> {
        self.exhausted.as_ref()
    }

    pub fn bytes_consumed(&self) -> u64 {
        self.bytes_consumed
    }

    pub fn tokens(&self) -> u64 {
        self.tokens
    }

    pub fn files(&self) -> usize {
        self.files
    }

    pub fn directories(&self) -> usize {
        self.directories
    }
}
