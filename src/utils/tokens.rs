//! Token estimation

/// Estimate tokens with a word-based heuristic.
///
/// Each whitespace-delimited word costs `ceil(chars / 4)` tokens, counting
/// Unicode code points rather than bytes so multi-byte text is not
/// over-counted. The estimate is additive over concatenation at word
/// boundaries, which keeps per-file running totals monotonic.
pub fn estimate_tokens(text: &str) -> u64 {
    text.split_whitespace().map(|word| (word.chars().count() as u64).div_ceil(4)).sum()
}

/// Format a token count the way the summary shows it (`950`, `1.2k`, `3.4M`).
pub fn format_token_count(tokens: u64) -> String {
    if tokens > 1_000_000 {
        format!("{:.1}M", tokens as f64 / 1_000_000.0)
    } else if tokens > 1_000 {
        format!("{:.1}k", tokens as f64 / 1_000.0)
    } else {
        tokens.to_string()
    }
}
