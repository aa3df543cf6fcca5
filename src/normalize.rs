//! Keyword normalization applied before any lookup.
//!
//! Search terms arrive with arbitrary spacing ("맥 캘 란") and mixed-case
//! Latin ("Macallan"). Hangul and Japanese are case-free, so canonical form
//! is: no whitespace, ASCII letters uppercased, everything else untouched.

/// Normalize a raw keyword. Total over all strings and idempotent.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
