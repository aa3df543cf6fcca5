//! Search configuration: destinations, policy data and collaborator
//! endpoints, loaded from TOML with an embedded default.
//!
//! The parsed [`SearchConfig`] is a plain immutable value threaded into the
//! pipeline entry points; nothing here is global state.

use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::normalize::normalize;

pub const DEFAULT_CONFIG_TOML: &str = include_str!("default_config.toml");

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    Parse(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// The fixed set of destination sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// mukawa-spirit.com, the primary shop. Strict: every fragment must map.
    Mukawa,
    /// Yahoo! Auctions.
    YahooAuction,
    Rakuten,
    Mercari,
}

impl Destination {
    pub const ALL: [Destination; 4] = [
        Destination::Mukawa,
        Destination::YahooAuction,
        Destination::Rakuten,
        Destination::Mercari,
    ];

    /// Identifier used in the statistics store and on the CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            Destination::Mukawa => "mukawa",
            Destination::YahooAuction => "yahoo",
            Destination::Rakuten => "rakuten",
            Destination::Mercari => "mercari",
        }
    }
}

impl FromStr for Destination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mukawa" => Ok(Destination::Mukawa),
            "yahoo" => Ok(Destination::YahooAuction),
            "rakuten" => Ok(Destination::Rakuten),
            "mercari" => Ok(Destination::Mercari),
            other => Err(format!(
                "unknown destination '{other}' (expected mukawa, yahoo, rakuten or mercari)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    Strict,
    Lenient,
}

/// How the encoded keyword is produced for a destination's search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncodingScheme {
    /// EUC-JP bytes, each emitted as an uppercase `%XX` token.
    LegacyBytePercent,
    /// `encodeURIComponent`-style percent encoding.
    StandardPercent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DestinationConfig {
    pub strictness: Strictness,
    pub url_template: String,
    pub encoding: EncodingScheme,
}

#[derive(Debug, Clone, Deserialize)]
struct Destinations {
    mukawa: DestinationConfig,
    yahoo: DestinationConfig,
    rakuten: DestinationConfig,
    mercari: DestinationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Forbidden terms, held in normalized form for substring checks.
    forbidden_terms: Vec<String>,
    pub ip_lookup_url: String,
    pub store: StoreConfig,
    destinations: Destinations,
}

impl SearchConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let mut config: SearchConfig =
            toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        for term in &mut config.forbidden_terms {
            *term = normalize(term);
        }
        validate(&config)?;
        Ok(config)
    }

    pub fn open(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    /// The configuration shipped with the crate.
    pub fn embedded() -> Self {
        Self::from_toml_str(DEFAULT_CONFIG_TOML).expect("embedded config TOML must be valid")
    }

    pub fn destination(&self, destination: Destination) -> &DestinationConfig {
        match destination {
            Destination::Mukawa => &self.destinations.mukawa,
            Destination::YahooAuction => &self.destinations.yahoo,
            Destination::Rakuten => &self.destinations.rakuten,
            Destination::Mercari => &self.destinations.mercari,
        }
    }

    /// Case-insensitive substring check against the forbidden-term list.
    /// `keyword` must already be normalized.
    pub fn is_forbidden(&self, keyword: &str) -> bool {
        self.forbidden_terms
            .iter()
            .any(|term| keyword.contains(term.as_str()))
    }
}

fn validate(config: &SearchConfig) -> Result<(), ConfigError> {
    for term in &config.forbidden_terms {
        if term.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "forbidden_terms".to_string(),
                reason: "terms must be non-empty after normalization".to_string(),
            });
        }
    }

    if !config.ip_lookup_url.starts_with("https://") {
        return Err(ConfigError::InvalidValue {
            field: "ip_lookup_url".to_string(),
            reason: "must be an https URL".to_string(),
        });
    }

    for destination in Destination::ALL {
        let dc = config.destination(destination);
        let field = format!("destinations.{}.url_template", destination.as_str());
        if !dc.url_template.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field,
                reason: "must be an https URL".to_string(),
            });
        }
        if !dc.url_template.contains("{keyword}") {
            return Err(ConfigError::InvalidValue {
                field,
                reason: "must contain the {keyword} placeholder".to_string(),
            });
        }
    }

    Ok(())
}
