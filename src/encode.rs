//! Keyword encoding for destination search URLs.
//!
//! Mukawa's search endpoint is a legacy CGI that expects the query as
//! percent-encoded EUC-JP bytes. Text without any kana/kanji cannot be
//! usefully EUC-JP-encoded, so it goes out as HTML numeric character
//! references under standard percent encoding instead, the same trick the
//! site's own forms rely on. The marketplace sites take ordinary
//! `encodeURIComponent` output.

use std::fmt::Write;

use encoding_rs::EUC_JP;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::EncodingScheme;
use crate::unicode::is_japanese;

/// Everything `encodeURIComponent` leaves unescaped.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Encode the final query text for a destination's scheme.
pub fn encode_keyword(text: &str, scheme: EncodingScheme) -> String {
    match scheme {
        EncodingScheme::LegacyBytePercent => encode_legacy(text),
        EncodingScheme::StandardPercent => percent(text),
    }
}

fn encode_legacy(text: &str) -> String {
    if text.chars().any(is_japanese) {
        let (bytes, _, _) = EUC_JP.encode(text);
        let mut out = String::with_capacity(bytes.len() * 3);
        for byte in bytes.iter() {
            // Uppercase hex; the endpoint is picky about case.
            let _ = write!(out, "%{byte:02X}");
        }
        out
    } else {
        let mut ncr = String::with_capacity(text.len());
        for c in text.chars() {
            if (c as u32) > 127 {
                let _ = write!(ncr, "&#{};", c as u32);
            } else {
                ncr.push(c);
            }
        }
        percent(&ncr)
    }
}

fn percent(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens_to_bytes(encoded: &str) -> Vec<u8> {
        encoded
            .split('%')
            .filter(|t| !t.is_empty())
            .map(|t| u8::from_str_radix(t, 16).unwrap())
            .collect()
    }

    #[test]
    fn test_legacy_kanji_is_euc_jp_bytes() {
        assert_eq!(encode_keyword("山", EncodingScheme::LegacyBytePercent), "%BB%B3");
    }

    #[test]
    fn test_legacy_token_shape_and_round_trip() {
        let encoded = encode_keyword("マッカラン 12年", EncodingScheme::LegacyBytePercent);
        // Pure %XX token stream, uppercase hex, two digits per byte.
        for token in encoded.split('%').filter(|t| !t.is_empty()) {
            assert_eq!(token.len(), 2);
            assert!(token.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        }
        let bytes = tokens_to_bytes(&encoded);
        let (decoded, _, had_errors) = EUC_JP.decode(&bytes);
        assert!(!had_errors);
        assert_eq!(decoded, "マッカラン 12年");
    }

    #[test]
    fn test_legacy_hangul_falls_back_to_ncr() {
        // 맥 is U+B9E5 = 47589; & # ; percent-encode, digits pass through.
        assert_eq!(
            encode_keyword("맥123", EncodingScheme::LegacyBytePercent),
            "%26%2347589%3B123"
        );
    }

    #[test]
    fn test_legacy_ascii_passes_through() {
        assert_eq!(
            encode_keyword("ABC123", EncodingScheme::LegacyBytePercent),
            "ABC123"
        );
    }

    #[test]
    fn test_standard_percent_matches_encode_uri_component() {
        assert_eq!(
            encode_keyword("山崎 12年", EncodingScheme::StandardPercent),
            "%E5%B1%B1%E5%B4%8E%2012%E5%B9%B4"
        );
        assert_eq!(
            encode_keyword("A-b_c.!~*'()", EncodingScheme::StandardPercent),
            "A-b_c.!~*'()"
        );
        assert_eq!(
            encode_keyword("a&b=c", EncodingScheme::StandardPercent),
            "a%26b%3Dc"
        );
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(encode_keyword("", EncodingScheme::LegacyBytePercent), "");
        assert_eq!(encode_keyword("", EncodingScheme::StandardPercent), "");
    }
}
