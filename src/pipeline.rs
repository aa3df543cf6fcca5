//! The search pipeline: normalize → map → rewrite → gate → encode → URL.
//!
//! [`prepare_search`] is the pure part; [`SearchService`] wraps it with the
//! fire-and-forget collaborators (attempt log, statistics increment, IP
//! lookup). Side effects never change the pipeline's result and store
//! failures never reach the user.

use std::sync::Arc;
use std::thread;

use tracing::{debug_span, warn};

use crate::config::{Destination, SearchConfig};
use crate::converter::{self, rewriter};
use crate::dict::Dictionary;
use crate::dispatch::build_url;
use crate::encode::encode_keyword;
use crate::ip::fetch_ip;
use crate::normalize::normalize;
use crate::policy::{self, GateOutcome};
use crate::store::{EventStore, NullStore, RestStore, SearchEvent, StoreError};

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Forbidden keyword. The UI shows its fixed "no results" text.
    #[error("no results for this keyword")]
    BlockedTerm,

    /// The destination will not take the keyword; the user must rephrase.
    #[error("no Japanese mapping for: {}", unmapped.join(", "))]
    TranslationFailure { unmapped: Vec<String> },
}

/// Everything needed to dispatch an accepted search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSearch {
    pub destination: Destination,
    /// Canonical form of what the user typed; this is what gets logged.
    pub normalized: String,
    /// Query text after translation (or the verbatim English-only bypass).
    pub query: String,
    pub encoded: String,
    pub url: String,
}

/// Run the full keyword pipeline for one destination. Pure: no I/O.
pub fn prepare_search(
    dict: &Dictionary,
    config: &SearchConfig,
    destination: Destination,
    raw_keyword: &str,
) -> Result<PreparedSearch, SearchError> {
    prepare_normalized(dict, config, destination, normalize(raw_keyword))
}

fn prepare_normalized(
    dict: &Dictionary,
    config: &SearchConfig,
    destination: Destination,
    normalized: String,
) -> Result<PreparedSearch, SearchError> {
    let _span = debug_span!("prepare_search", destination = destination.as_str()).entered();

    // Forbidden keywords stop here, before any dictionary work.
    if config.is_forbidden(&normalized) {
        return Err(SearchError::BlockedTerm);
    }

    let mut mapping = converter::convert(dict, &normalized);
    rewriter::rewrite(&mut mapping);

    match policy::evaluate(config, destination, &normalized, &mapping) {
        GateOutcome::Blocked => Err(SearchError::BlockedTerm),
        GateOutcome::Rejected { unmapped } => Err(SearchError::TranslationFailure { unmapped }),
        GateOutcome::Accepted { query } => {
            let dc = config.destination(destination);
            let encoded = encode_keyword(&query, dc.encoding);
            let url = build_url(&dc.url_template, &encoded);
            Ok(PreparedSearch {
                destination,
                normalized,
                query,
                encoded,
                url,
            })
        }
    }
}

/// Pipeline plus collaborators, owning the dictionary and configuration for
/// the lifetime of the session.
pub struct SearchService {
    dict: Dictionary,
    config: SearchConfig,
    store: Arc<dyn EventStore>,
    agent: ureq::Agent,
}

impl SearchService {
    /// Build a service from config; uses the REST store when one is
    /// configured and records nothing otherwise.
    pub fn new(dict: Dictionary, config: SearchConfig) -> Self {
        let store: Arc<dyn EventStore> = match RestStore::from_config(&config.store) {
            Ok(store) => Arc::new(store),
            Err(StoreError::NotConfigured) => Arc::new(NullStore),
            Err(e) => {
                warn!(error = %e, "store unavailable, recording disabled");
                Arc::new(NullStore)
            }
        };
        Self::with_store(dict, config, store)
    }

    pub fn with_store(dict: Dictionary, config: SearchConfig, store: Arc<dyn EventStore>) -> Self {
        Self {
            dict,
            config,
            store,
            agent: ureq::Agent::new_with_defaults(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn dict(&self) -> &Dictionary {
        &self.dict
    }

    /// Resolve the client IP for logging; degrades to `"unknown"`.
    pub fn lookup_ip(&self) -> String {
        fetch_ip(&self.agent, &self.config.ip_lookup_url)
    }

    /// Run one search attempt: prepare the URL and record the attempt.
    ///
    /// Accepted searches also bump the (keyword, destination) statistics
    /// counter. Blocked keywords are not recorded at all. All store writes
    /// run detached; this returns as soon as the pipeline itself is done.
    pub fn search(
        &self,
        destination: Destination,
        raw_keyword: &str,
        ip_address: &str,
    ) -> Result<PreparedSearch, SearchError> {
        // Normalize once; the logged keyword is the same string the
        // pipeline gated on.
        let normalized = normalize(raw_keyword);
        let result = prepare_normalized(&self.dict, &self.config, destination, normalized.clone());

        match &result {
            Err(SearchError::BlockedTerm) => {}
            Err(SearchError::TranslationFailure { .. }) => {
                self.record_detached(
                    SearchEvent {
                        keyword: normalized,
                        ip_address: ip_address.to_string(),
                        is_fail: Some(true),
                        destination: Some(destination.as_str()),
                    },
                    None,
                );
            }
            Ok(prepared) => {
                self.record_detached(
                    SearchEvent {
                        keyword: prepared.normalized.clone(),
                        ip_address: ip_address.to_string(),
                        is_fail: None,
                        destination: Some(destination.as_str()),
                    },
                    Some((prepared.normalized.clone(), destination)),
                );
            }
        }

        result
    }

    fn record_detached(&self, event: SearchEvent, increment: Option<(String, Destination)>) {
        let store = Arc::clone(&self.store);
        let spawned = thread::Builder::new()
            .name("malt-store".into())
            .spawn(move || {
                if let Err(e) = store.record_search(&event) {
                    warn!(error = %e, keyword = event.keyword, "search log write failed");
                }
                if let Some((keyword, destination)) = increment {
                    if let Err(e) = store.increment_count(&keyword, destination) {
                        warn!(error = %e, keyword, "statistics increment failed");
                    }
                }
            });
        if let Err(e) = spawned {
            warn!(error = %e, "could not spawn store writer");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::config::EncodingScheme;
    use crate::store::ContactMessage;

    fn dict() -> Dictionary {
        Dictionary::embedded()
    }

    fn config() -> SearchConfig {
        SearchConfig::embedded()
    }

    #[test]
    fn test_end_to_end_strict_exact_match() {
        let prepared =
            prepare_search(&dict(), &config(), Destination::Mukawa, " 맥 캘 란 ").unwrap();
        assert_eq!(prepared.normalized, "맥캘란");
        assert_eq!(prepared.query, "マッカラン");
        assert_eq!(
            prepared.encoded,
            encode_keyword("マッカラン", EncodingScheme::LegacyBytePercent)
        );
        assert_eq!(
            prepared.url,
            format!(
                "https://mukawa-spirit.com/?mode=srh&cid=&keyword={}",
                prepared.encoded
            )
        );
    }

    #[test]
    fn test_age_statement_flows_through() {
        let prepared =
            prepare_search(&dict(), &config(), Destination::Mukawa, "야마자키 12년").unwrap();
        assert_eq!(prepared.query, "山崎 12年");
    }

    #[test]
    fn test_forbidden_term_blocked_before_encoding() {
        for raw in ["뉴카", " 뉴 카 ", "뉴카위스키"] {
            let err = prepare_search(&dict(), &config(), Destination::Mukawa, raw).unwrap_err();
            assert_eq!(err, SearchError::BlockedTerm);
        }
    }

    #[test]
    fn test_partial_age_fragment_still_rejected_on_strict() {
        // 맥캘란 maps and 12년 becomes 12年, but 한정 has no entry; the
        // strict destination must not accept the leftover Hangul.
        let err =
            prepare_search(&dict(), &config(), Destination::Mukawa, "맥캘란12년한정").unwrap_err();
        assert_eq!(
            err,
            SearchError::TranslationFailure {
                unmapped: vec!["한정".to_string()]
            }
        );
    }

    #[test]
    fn test_english_only_bypass_lenient_vs_strict() {
        let strict = prepare_search(&dict(), &config(), Destination::Mukawa, "ABC123");
        assert!(matches!(
            strict,
            Err(SearchError::TranslationFailure { .. })
        ));

        let lenient =
            prepare_search(&dict(), &config(), Destination::YahooAuction, "abc 123").unwrap();
        assert_eq!(lenient.query, "ABC123");
        assert_eq!(
            lenient.url,
            "https://auctions.yahoo.co.jp/search/search?p=ABC123"
        );
    }

    #[test]
    fn test_lenient_standard_percent_url() {
        let prepared =
            prepare_search(&dict(), &config(), Destination::Rakuten, "야마자키12").unwrap();
        assert_eq!(prepared.query, "山崎 12年");
        assert_eq!(
            prepared.url,
            "https://search.rakuten.co.jp/search/mall/%E5%B1%B1%E5%B4%8E%2012%E5%B9%B4/"
        );
    }

    #[test]
    fn test_translation_failure_lists_fragments() {
        let err =
            prepare_search(&dict(), &config(), Destination::Mukawa, "맥캘란 한정판").unwrap_err();
        assert_eq!(
            err,
            SearchError::TranslationFailure {
                unmapped: vec!["한정판".to_string()]
            }
        );
        assert!(err.to_string().contains("한정판"));
    }

    // --- SearchService side-effect tests ---

    enum StoreCall {
        Search(SearchEvent),
        Increment(String, Destination),
    }

    struct ChannelStore {
        tx: Mutex<mpsc::Sender<StoreCall>>,
    }

    impl EventStore for ChannelStore {
        fn record_search(&self, event: &SearchEvent) -> Result<(), StoreError> {
            let _ = self
                .tx
                .lock()
                .unwrap()
                .send(StoreCall::Search(event.clone()));
            Ok(())
        }

        fn increment_count(
            &self,
            keyword: &str,
            destination: Destination,
        ) -> Result<(), StoreError> {
            let _ = self
                .tx
                .lock()
                .unwrap()
                .send(StoreCall::Increment(keyword.to_string(), destination));
            Ok(())
        }

        fn record_contact(&self, _message: &ContactMessage) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn channel_service() -> (SearchService, mpsc::Receiver<StoreCall>) {
        let (tx, rx) = mpsc::channel();
        let store = Arc::new(ChannelStore { tx: Mutex::new(tx) });
        (SearchService::with_store(dict(), config(), store), rx)
    }

    #[test]
    fn test_accepted_search_logs_and_increments() {
        let (service, rx) = channel_service();
        service
            .search(Destination::Mukawa, "맥캘란", "203.0.113.9")
            .unwrap();

        let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        match first {
            StoreCall::Search(event) => {
                assert_eq!(event.keyword, "맥캘란");
                assert_eq!(event.ip_address, "203.0.113.9");
                assert_eq!(event.is_fail, None);
                assert_eq!(event.destination, Some("mukawa"));
            }
            StoreCall::Increment(..) => panic!("attempt log must come first"),
        }
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            StoreCall::Increment(keyword, destination) => {
                assert_eq!(keyword, "맥캘란");
                assert_eq!(destination, Destination::Mukawa);
            }
            StoreCall::Search(_) => panic!("expected the statistics increment"),
        }
    }

    #[test]
    fn test_rejected_search_logs_failure_only() {
        let (service, rx) = channel_service();
        let err = service
            .search(Destination::Mukawa, " 없는 말 ", "unknown")
            .unwrap_err();
        assert!(matches!(err, SearchError::TranslationFailure { .. }));

        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            StoreCall::Search(event) => {
                assert_eq!(event.is_fail, Some(true));
                // Logged in normalized form, exactly as gated.
                assert_eq!(event.keyword, "없는말");
            }
            StoreCall::Increment(..) => panic!("rejected searches never increment statistics"),
        }
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[test]
    fn test_blocked_search_writes_nothing() {
        let (service, rx) = channel_service();
        let err = service
            .search(Destination::Mukawa, "뉴카", "unknown")
            .unwrap_err();
        assert_eq!(err, SearchError::BlockedTerm);
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[test]
    fn test_store_failure_never_surfaces() {
        struct FailingStore;
        impl EventStore for FailingStore {
            fn record_search(&self, _: &SearchEvent) -> Result<(), StoreError> {
                Err(StoreError::NotConfigured)
            }
            fn increment_count(&self, _: &str, _: Destination) -> Result<(), StoreError> {
                Err(StoreError::NotConfigured)
            }
            fn record_contact(&self, _: &ContactMessage) -> Result<(), StoreError> {
                Err(StoreError::NotConfigured)
            }
        }

        let service = SearchService::with_store(dict(), config(), Arc::new(FailingStore));
        let prepared = service
            .search(Destination::Mukawa, "맥캘란", "unknown")
            .unwrap();
        assert_eq!(prepared.query, "マッカラン");
    }
}
