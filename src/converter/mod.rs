//! Dictionary-based term mapping.
//!
//! Turns a normalized keyword into Japanese text: whole-keyword exact match
//! first, otherwise a single left-to-right scan that substitutes the longest
//! dictionary key at each position. Input that is already Japanese passes
//! through; Hangul or Latin runs with no dictionary entry are collected as
//! unmapped fragments for the policy gate to judge.

pub mod rewriter;

use tracing::debug_span;

use crate::dict::Dictionary;
use crate::unicode::is_hangul;

/// Outcome of the term-mapping step.
///
/// `unmapped` is empty iff the keyword is fully translated. Fragments keep
/// input order so the failure alert reads naturally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingResult {
    pub text: String,
    pub unmapped: Vec<String>,
}

impl MappingResult {
    pub fn is_fully_mapped(&self) -> bool {
        self.unmapped.is_empty()
    }
}

/// Map a normalized keyword to Japanese text.
pub fn convert(dict: &Dictionary, normalized: &str) -> MappingResult {
    let _span = debug_span!("convert", keyword = normalized).entered();

    if normalized.is_empty() {
        return MappingResult {
            text: String::new(),
            unmapped: Vec::new(),
        };
    }

    if let Some(target) = dict.lookup_exact(normalized) {
        return MappingResult {
            text: target.to_string(),
            unmapped: Vec::new(),
        };
    }

    let mut text = String::new();
    let mut unmapped = Vec::new();
    let mut fragment = String::new();
    let mut rest = normalized;

    while !rest.is_empty() {
        if let Some((source, target)) = dict.longest_match(rest) {
            flush_fragment(&mut fragment, &mut unmapped);
            text.push_str(target);
            rest = &rest[source.len()..];
            continue;
        }

        // No key starts here. Hangul and Latin letters need a translation,
        // so they accumulate into the current unmapped fragment. Digits,
        // symbols and already-Japanese characters are fine as-is.
        let c = rest.chars().next().expect("rest is non-empty");
        if is_hangul(c) || c.is_ascii_alphabetic() {
            fragment.push(c);
        } else {
            flush_fragment(&mut fragment, &mut unmapped);
        }
        text.push(c);
        rest = &rest[c.len_utf8()..];
    }
    flush_fragment(&mut fragment, &mut unmapped);

    MappingResult { text, unmapped }
}

fn flush_fragment(fragment: &mut String, unmapped: &mut Vec<String>) {
    if !fragment.is_empty() {
        unmapped.push(std::mem::take(fragment));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dict() -> Dictionary {
        Dictionary::from_entries([
            ("맥캘란".to_string(), "マッカラン".to_string()),
            ("야마자키".to_string(), "山崎".to_string()),
            ("위스키".to_string(), "ウイスキー".to_string()),
            ("글렌".to_string(), "グレン".to_string()),
            ("글렌피딕".to_string(), "グレンフィディック".to_string()),
            ("MACALLAN".to_string(), "マッカラン".to_string()),
        ])
        .unwrap()
    }

    #[test]
    fn test_exact_match_fully_maps() {
        let result = convert(&test_dict(), "맥캘란");
        assert_eq!(result.text, "マッカラン");
        assert!(result.is_fully_mapped());
    }

    #[test]
    fn test_multiple_entries_all_applied() {
        let result = convert(&test_dict(), "맥캘란위스키");
        assert_eq!(result.text, "マッカランウイスキー");
        assert!(result.is_fully_mapped());
    }

    #[test]
    fn test_longest_match_wins_on_overlap() {
        // "글렌" and "글렌피딕" overlap; the longer key must be taken.
        let result = convert(&test_dict(), "글렌피딕12");
        assert_eq!(result.text, "グレンフィディック12");
        assert!(result.is_fully_mapped());
    }

    #[test]
    fn test_unmatched_hangul_becomes_fragment() {
        let result = convert(&test_dict(), "맥캘란한정판");
        assert_eq!(result.text, "マッカラン한정판");
        assert_eq!(result.unmapped, vec!["한정판"]);
    }

    #[test]
    fn test_no_match_yields_whole_input_fragment() {
        let result = convert(&test_dict(), "아무것도없음");
        assert_eq!(result.text, "아무것도없음");
        assert_eq!(result.unmapped, vec!["아무것도없음"]);
    }

    #[test]
    fn test_fragments_keep_input_order() {
        let result = convert(&test_dict(), "한정맥캘란특가");
        assert_eq!(result.unmapped, vec!["한정", "특가"]);
    }

    #[test]
    fn test_latin_without_entry_is_unmapped() {
        let result = convert(&test_dict(), "ABC123");
        assert_eq!(result.text, "ABC123");
        assert_eq!(result.unmapped, vec!["ABC"]);
    }

    #[test]
    fn test_english_entry_maps() {
        let result = convert(&test_dict(), "MACALLAN18");
        assert_eq!(result.text, "マッカラン18");
        assert!(result.is_fully_mapped());
    }

    #[test]
    fn test_japanese_passes_through() {
        let result = convert(&test_dict(), "山崎12");
        assert_eq!(result.text, "山崎12");
        assert!(result.is_fully_mapped());
    }

    #[test]
    fn test_empty_input() {
        let result = convert(&test_dict(), "");
        assert_eq!(result.text, "");
        assert!(result.is_fully_mapped());
    }
}
