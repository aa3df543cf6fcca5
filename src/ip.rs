//! Client IP lookup via the configured external service.
//!
//! The result only feeds the search-attempt log; the pipeline never waits on
//! or fails because of it.

use serde::Deserialize;
use tracing::warn;

/// Sentinel recorded when the lookup fails in any way.
pub const UNKNOWN_IP: &str = "unknown";

#[derive(Debug, Deserialize)]
struct IpResponse {
    ip: String,
}

/// GET `url`, expecting `{ "ip": "..." }`. Every failure degrades to
/// [`UNKNOWN_IP`].
pub fn fetch_ip(agent: &ureq::Agent, url: &str) -> String {
    let mut response = match agent.get(url).call() {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "IP lookup request failed");
            return UNKNOWN_IP.to_string();
        }
    };
    match response.body_mut().read_json::<IpResponse>() {
        Ok(body) => body.ip,
        Err(e) => {
            warn!(error = %e, "IP lookup returned an unparsable body");
            UNKNOWN_IP.to_string()
        }
    }
}
