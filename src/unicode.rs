//! Character-level script classification for Korean and Japanese text.

pub fn is_hangul(c: char) -> bool {
    // Precomposed syllables plus the Jamo blocks that survive normalization.
    ('\u{AC00}'..='\u{D7AF}').contains(&c)
        || ('\u{1100}'..='\u{11FF}').contains(&c)
        || ('\u{3130}'..='\u{318F}').contains(&c)
}

pub fn is_kana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c) || ('\u{30A0}'..='\u{30FF}').contains(&c)
}

pub fn is_kanji(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c) || ('\u{3400}'..='\u{4DBF}').contains(&c)
}

/// Kana or kanji: text the destination sites already understand as Japanese.
pub fn is_japanese(c: char) -> bool {
    is_kana(c) || is_kanji(c)
}

/// Hangul, kana or kanji: any script boundary the spacing rewriter cares about.
pub fn is_cjk_script(c: char) -> bool {
    is_hangul(c) || is_japanese(c)
}

/// A keyword the lenient destinations accept verbatim: non-empty, all ASCII
/// letters and digits.
pub fn is_english_only(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
}
