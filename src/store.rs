//! External store collaborator: search-attempt log, per-destination search
//! statistics and contact messages.
//!
//! The store is a remote REST service (insert into a collection, plus one
//! RPC that increments a (keyword, destination) counter atomically on the
//! server). The pipeline treats every store failure as non-fatal; callers
//! log and move on.

use serde::Serialize;

use crate::config::{Destination, StoreConfig};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] Box<ureq::Error>),

    #[error("store endpoint is not configured")]
    NotConfigured,
}

/// One row in the search-attempt log. `created_at` is stamped by the store.
#[derive(Debug, Clone, Serialize)]
pub struct SearchEvent {
    pub keyword: String,
    pub ip_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_fail: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<&'static str>,
}

/// A contact-form message. The form itself is rendered elsewhere; this is
/// just the record shape the store accepts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactMessage {
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub korean: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub english: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub japanese: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

pub trait EventStore: Send + Sync {
    fn record_search(&self, event: &SearchEvent) -> Result<(), StoreError>;
    fn increment_count(&self, keyword: &str, destination: Destination) -> Result<(), StoreError>;
    fn record_contact(&self, message: &ContactMessage) -> Result<(), StoreError>;
}

/// REST client for the hosted store.
pub struct RestStore {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for RestStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The API key stays out of debug output.
        f.debug_struct("RestStore")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RestStore {
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        if config.base_url.is_empty() {
            return Err(StoreError::NotConfigured);
        }
        Ok(Self {
            agent: ureq::Agent::new_with_defaults(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn post(&self, path: &str, body: &impl Serialize) -> Result<(), StoreError> {
        self.agent
            .post(format!("{}{}", self.base_url, path))
            .header("apikey", self.api_key.as_str())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send_json(body)
            .map_err(Box::new)?;
        Ok(())
    }
}

impl EventStore for RestStore {
    fn record_search(&self, event: &SearchEvent) -> Result<(), StoreError> {
        self.post("/rest/v1/search", event)
    }

    fn increment_count(&self, keyword: &str, destination: Destination) -> Result<(), StoreError> {
        #[derive(Serialize)]
        struct IncrementArgs<'a> {
            search_keyword: &'a str,
            site_type: &'static str,
        }
        self.post(
            "/rest/v1/rpc/increment_search_count",
            &IncrementArgs {
                search_keyword: keyword,
                site_type: destination.as_str(),
            },
        )
    }

    fn record_contact(&self, message: &ContactMessage) -> Result<(), StoreError> {
        self.post("/rest/v1/contacts", message)
    }
}

/// Store that records nothing. Used when no endpoint is configured and in
/// tests.
pub struct NullStore;

impl EventStore for NullStore {
    fn record_search(&self, _event: &SearchEvent) -> Result<(), StoreError> {
        Ok(())
    }

    fn increment_count(&self, _keyword: &str, _destination: Destination) -> Result<(), StoreError> {
        Ok(())
    }

    fn record_contact(&self, _message: &ContactMessage) -> Result<(), StoreError> {
        Ok(())
    }
}
