//! The policy gate: the last word on whether a keyword gets dispatched.
//!
//! Terminal outcomes are Blocked (forbidden term, nothing recorded),
//! Rejected (untranslatable under the destination's strictness) and
//! Accepted (dispatch with the chosen query text).

use crate::config::{Destination, SearchConfig, Strictness};
use crate::converter::MappingResult;
use crate::unicode::is_english_only;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Forbidden keyword. No dispatch, no store write.
    Blocked,
    /// Unmapped fragments the destination will not accept.
    Rejected { unmapped: Vec<String> },
    /// Dispatch with this query text.
    Accepted { query: String },
}

/// Evaluate a normalized keyword and its mapping against a destination's
/// policy. The forbidden-term check comes first so a blocked keyword never
/// depends on dictionary contents.
pub fn evaluate(
    config: &SearchConfig,
    destination: Destination,
    normalized: &str,
    mapping: &MappingResult,
) -> GateOutcome {
    if config.is_forbidden(normalized) {
        return GateOutcome::Blocked;
    }

    if mapping.is_fully_mapped() {
        return GateOutcome::Accepted {
            query: mapping.text.clone(),
        };
    }

    match config.destination(destination).strictness {
        Strictness::Strict => GateOutcome::Rejected {
            unmapped: mapping.unmapped.clone(),
        },
        Strictness::Lenient => {
            if is_english_only(normalized) {
                // English/numeric queries work on the marketplace sites
                // as-is; skip the Japanese translation entirely.
                GateOutcome::Accepted {
                    query: normalized.to_string(),
                }
            } else {
                GateOutcome::Rejected {
                    unmapped: mapping.unmapped.clone(),
                }
            }
        }
    }
}
