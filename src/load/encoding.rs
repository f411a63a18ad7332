//! Binary detection and permissive decoding.
//!
//! This module provides robust decoding that handles:
//! - BOM detection (UTF-8, UTF-16 LE/BE)
//! - UTF-8 with replacement characters for invalid sequences
//! - Multi-byte sequences cut off by a read limit
//! - Line ending normalization

use encoding_rs::{Encoding, UTF_8};

pub const DEFAULT_SAMPLE_SIZE: usize = 8192;

/// Share of text bytes below which a sample is treated as binary.
const MIN_TEXT_RATIO: f64 = 0.70;

/// Detect if a byte sample is binary (not text).
///
/// Uses two heuristics:
/// 1. Null byte check (strong binary indicator)
/// 2. Ratio of text bytes (< 70% = likely binary)
///
/// Text bytes are BEL, BS, TAB, LF, FF, CR, ESC and everything from 0x20
/// upward except DEL, so UTF-8 and Latin-1 text both pass.
pub fn is_binary(sample: &[u8]) -> bool {
    // UTF-16 text is full of NUL bytes but announces itself with a BOM.
    if sample.starts_with(&[0xff, 0xfe]) || sample.starts_with(&[0xfe, 0xff]) {
        return false;
    }
    if sample.is_empty() {
        return false;
    }

    // Check for null bytes (strong indicator of binary)
    if sample.contains(&0) {
        return true;
    }

    let text_count = sample.iter().filter(|&&b| is_text_byte(b)).count();
    (text_count as f64 / sample.len() as f64) < MIN_TEXT_RATIO
}

fn is_text_byte(b: u8) -> bool {
    matches!(b, 7 | 8 | 9 | 10 | 12 | 13 | 27) || (b >= 0x20 && b != 0x7f)
}

/// Decode raw file bytes into normalized text.
///
/// Strategy:
/// 1. Honour a BOM when present (UTF-8 BOM is stripped, UTF-16 is decoded)
/// 2. Otherwise decode as UTF-8, replacing invalid sequences with U+FFFD
/// 3. When `truncated`, drop a trailing sequence the read limit cut in half
/// 4. Normalize CRLF and lone CR to LF
pub fn decode(bytes: &[u8], truncated: bool) -> String {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    let body = &bytes[bom_len..];

    let decoded = if encoding == UTF_8 {
        let body = if truncated { trim_partial_utf8(body) } else { body };
        String::from_utf8_lossy(body).into_owned()
    } else {
        let (cow, _had_errors) = encoding.decode_without_bom_handling(body);
        cow.into_owned()
    };

    normalize_line_endings(decoded)
}

/// Strip an incomplete multi-byte UTF-8 sequence at the end of `bytes`.
fn trim_partial_utf8(bytes: &[u8]) -> &[u8] {
    let len = bytes.len();
    let lookback = len.min(3);
    for back in 1..=lookback {
        let idx = len - back;
        let byte = bytes[idx];
        if byte & 0xc0 == 0x80 {
            // Continuation byte, keep looking for the lead.
            continue;
        }
        let width = match byte {
            0x00..=0x7f => 1,
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf7 => 4,
            _ => return bytes,
        };
        return if back < width { &bytes[..idx] } else { bytes };
    }
    bytes
}

fn normalize_line_endings(text: String) -> String {
    if !text.contains('\r') {
        return text;
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
