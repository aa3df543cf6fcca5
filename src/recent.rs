//! Session-scoped recent-search list.
//!
//! Presentation state, deliberately outside the pipeline: capped,
//! de-duplicated, most recent first.

pub const DEFAULT_CAP: usize = 5;

#[derive(Debug, Clone)]
pub struct RecentSearches {
    items: Vec<String>,
    cap: usize,
}

impl RecentSearches {
    pub fn new() -> Self {
        Self::with_cap(DEFAULT_CAP)
    }

    pub fn with_cap(cap: usize) -> Self {
        Self {
            items: Vec::with_capacity(cap),
            cap,
        }
    }

    /// Record a search. Re-searching an existing term moves it to the front
    /// without growing the list; empty terms are ignored.
    pub fn push(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            return;
        }
        self.items.retain(|existing| existing != term);
        self.items.insert(0, term.to_string());
        self.items.truncate(self.cap);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for RecentSearches {
    fn default() -> Self {
        Self::new()
    }
}
