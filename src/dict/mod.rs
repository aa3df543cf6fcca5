//! The Korean/English → Japanese term dictionary.
//!
//! A small, immutable mapping loaded once at startup. The on-disk shape is
//! the flat JSON object the site has always shipped (`"맥캘란": "マッカラン"`);
//! a copy is embedded so the crate works with no files on disk.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::normalize::normalize;

pub const DEFAULT_WORD_MAPPING_JSON: &str = include_str!("word_mapping.json");

#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("dictionary entry has an empty source term")]
    EmptyKey,
}

/// Immutable source-term → Japanese-term mapping.
///
/// Keys are stored in normalized form (no whitespace, ASCII uppercased) so
/// lookups agree with what the normalizer produces. Substring matching runs
/// longest key first, which makes overlapping entries deterministic
/// regardless of the order they appear in the JSON file.
#[derive(Debug)]
pub struct Dictionary {
    exact: HashMap<String, String>,
    /// (source, target) pairs sorted by source length descending, then
    /// bytewise, for the longest-match-first scan.
    ordered: Vec<(String, String)>,
}

impl Dictionary {
    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, DictError> {
        let mut exact = HashMap::new();
        for (source, target) in entries {
            let key = normalize(&source);
            if key.is_empty() {
                return Err(DictError::EmptyKey);
            }
            exact.insert(key, target);
        }

        let mut ordered: Vec<(String, String)> =
            exact.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        ordered.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        Ok(Self { exact, ordered })
    }

    pub fn from_json_str(json: &str) -> Result<Self, DictError> {
        let raw: HashMap<String, String> = serde_json::from_str(json)?;
        Self::from_entries(raw)
    }

    pub fn open(path: &Path) -> Result<Self, DictError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// The mapping shipped with the crate.
    pub fn embedded() -> Self {
        Self::from_json_str(DEFAULT_WORD_MAPPING_JSON)
            .expect("embedded word mapping must be valid")
    }

    /// Whole-keyword lookup. `key` must already be normalized.
    pub fn lookup_exact(&self, key: &str) -> Option<&str> {
        self.exact.get(key).map(String::as_str)
    }

    /// Longest dictionary key that is a prefix of `text`, with its target.
    pub fn longest_match<'a>(&'a self, text: &str) -> Option<(&'a str, &'a str)> {
        self.ordered
            .iter()
            .find(|(source, _)| text.starts_with(source.as_str()))
            .map(|(source, target)| (source.as_str(), target.as_str()))
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}
