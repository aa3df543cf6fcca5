//! Korean/English → Japanese whisky search redirection.
//!
//! Takes a Korean or English search term, translates it to a Japanese query
//! via a fixed dictionary and a handful of pattern rules, and builds the
//! destination-specific search URL (the Mukawa shop, Yahoo! Auctions,
//! Rakuten or Mercari), including the legacy EUC-JP percent encoding the
//! primary shop requires.

pub mod config;
pub mod converter;
pub mod dict;
pub mod dispatch;
pub mod encode;
pub mod ip;
pub mod normalize;
pub mod pipeline;
pub mod policy;
pub mod recent;
pub mod store;
pub mod trace_init;
pub mod unicode;

pub use config::{Destination, SearchConfig};
pub use dict::Dictionary;
pub use pipeline::{prepare_search, PreparedSearch, SearchError, SearchService};
