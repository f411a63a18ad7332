//! Small shared helpers.

pub mod paths;
pub mod tokens;

pub use paths::{normalize_path, relative_path};
pub use tokens::{estimate_tokens, format_token_count};

/// Format an integer with thousands separators (`12345` -> `12,345`).
pub fn format_with_commas(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
