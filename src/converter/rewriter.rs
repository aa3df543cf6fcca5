//! Fixed pattern rewrites applied after dictionary mapping.
//!
//! Whisky age statements are the one structured thing users type that no
//! dictionary entry can cover: "야마자키 12년", "山崎12", bare "18". The
//! rewriters annotate those with the kanji unit the Japanese sites index by,
//! and insert a space at the script boundary so the query reads the way the
//! shops write their listings.

use super::MappingResult;
use crate::unicode::is_cjk_script;

/// The closed set of age statements that get annotated.
pub const AGE_NUMERALS: [&str; 4] = ["12", "15", "18", "21"];

const KOREAN_YEAR: char = '년';
const KANJI_YEAR: char = '年';

/// A single post-mapping rewrite rule.
pub(crate) trait Rewriter {
    fn rewrite(&self, text: &str) -> String;
}

/// Run all rewriters in sequence over the mapped text.
pub(crate) fn run_rewriters(rewriters: &[&dyn Rewriter], text: &str) -> String {
    rewriters
        .iter()
        .fold(text.to_string(), |t, rw| rw.rewrite(&t))
}

/// Rewrites `12년` → `12年` and suffixes bare age numerals with `年`.
///
/// Only maximal digit runs equal to one of [`AGE_NUMERALS`] are touched;
/// `120` or `1218` stay as they are.
pub(crate) struct AgeStatementRewriter;

impl Rewriter for AgeStatementRewriter {
    fn rewrite(&self, text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len() + 4);
        let mut i = 0;

        while i < chars.len() {
            if !chars[i].is_ascii_digit() {
                out.push(chars[i]);
                i += 1;
                continue;
            }

            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            let run: String = chars[start..i].iter().collect();
            out.push_str(&run);

            if AGE_NUMERALS.contains(&run.as_str()) {
                match chars.get(i) {
                    Some(&KOREAN_YEAR) | Some(&KANJI_YEAR) => {
                        out.push(KANJI_YEAR);
                        i += 1;
                    }
                    _ => out.push(KANJI_YEAR),
                }
            }
        }

        out
    }
}

/// Inserts a space between a Hangul/Kana/Kanji character and an immediately
/// following `<digits>年` token: `山崎12年` → `山崎 12年`.
pub(crate) struct SpacingRewriter;

impl Rewriter for SpacingRewriter {
    fn rewrite(&self, text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len() + 2);

        for (i, &c) in chars.iter().enumerate() {
            out.push(c);
            if is_cjk_script(c) && starts_with_year_token(&chars[i + 1..]) {
                out.push(' ');
            }
        }

        out
    }
}

fn starts_with_year_token(chars: &[char]) -> bool {
    let digits = chars.iter().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && chars.get(digits) == Some(&KANJI_YEAR)
}

/// Apply all pattern rewrites to a mapping result, then reconcile the
/// unmapped fragments with the rewritten text.
///
/// The age rule consumes a `년` unit, which the mapper had recorded at the
/// head of an unmapped fragment. Only that unit is forgiven: the rest of
/// the fragment is still untranslated and must stay unmapped. A text that
/// is nothing but age tokens counts as mapped even when no dictionary
/// entry fired.
pub fn rewrite(result: &mut MappingResult) {
    let age = AgeStatementRewriter;
    let spacing = SpacingRewriter;
    let rewriters: [&dyn Rewriter; 2] = [&age, &spacing];
    let rewritten = run_rewriters(&rewriters, &result.text);

    if rewritten != result.text {
        result.unmapped = result
            .unmapped
            .drain(..)
            .filter_map(|fragment| {
                if rewritten.contains(fragment.as_str()) {
                    return Some(fragment);
                }
                // A consumed 년 is always fragment-leading: the digits
                // before it never join a fragment. Strip it and keep
                // whatever Hangul remains.
                let stripped = fragment.trim_start_matches(KOREAN_YEAR);
                if stripped.is_empty() {
                    None
                } else {
                    Some(stripped.to_string())
                }
            })
            .collect();
    }
    if !result.unmapped.is_empty() && is_pure_age_expression(&rewritten) {
        result.unmapped.clear();
    }
    result.text = rewritten;
}

fn is_pure_age_expression(text: &str) -> bool {
    let mut tokens = text.split(' ').filter(|t| !t.is_empty()).peekable();
    tokens.peek().is_some()
        && tokens.all(|t| {
            t.strip_suffix(KANJI_YEAR)
                .is_some_and(|d| !d.is_empty() && d.chars().all(|c| c.is_ascii_digit()))
        })
}
