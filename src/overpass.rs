//! Overpass API client
//!
//! Blocking reqwest client (no async runtime required). The client never
//! sleeps or retries on its own: it records the upstream rate-limit signal
//! and lets the caller decide what to tell the user.

use crate::error::{MapdiffError, Result};
use crate::tabular::Table;
use std::time::Duration;

/// Public Overpass endpoint, overridable per installation.
pub const DEFAULT_API_URL: &str = "https://overpass-api.de/api/interpreter";

/// Advised wait when the upstream rate-limits without naming a duration.
const DEFAULT_COOLDOWN_SECONDS: u64 = 60;

/// Client-side cap on one query; surfaced as a network error when hit.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(480);

/// Rate-limit-aware query client.
pub struct OverpassClient {
    http: reqwest::blocking::Client,
    api_url: String,
    need_sleep: u64,
}

impl OverpassClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("mapdiff/{}", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_url: api_url.into(),
            need_sleep: 0,
        }
    }

    /// Run one opaque query and parse the tab-separated response.
    ///
    /// Non-success responses and rate-limit bodies come back as
    /// `RemoteQuery` with the upstream status and body verbatim; transport
    /// failures (including the request timeout) as `Network`.
    pub fn query(&mut self, query_text: &str) -> Result<Table> {
        log::debug!("overpass: sending {} byte query", query_text.len());
        let response = self
            .http
            .post(self.api_url.as_str())
            .body(query_text.to_string())
            .send()
            .map_err(|e| MapdiffError::network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| MapdiffError::network(e.to_string()))?;
        self.note_response(status, &body);

        if !(200..300).contains(&status) || is_rate_limited(&body) {
            return Err(MapdiffError::remote_query(status, body));
        }

        log::debug!("overpass: received {} bytes", body.len());
        Ok(Table::parse(&body))
    }

    /// Seconds the caller should advise the user to wait before retrying;
    /// zero unless the last response carried a rate-limit signal.
    pub fn need_sleep_seconds(&self) -> u64 {
        self.need_sleep
    }

    /// Record the rate-limit signal of one upstream response.
    fn note_response(&mut self, status: u16, body: &str) {
        if status == 429 || is_rate_limited(body) {
            self.need_sleep = parse_retry_seconds(body).unwrap_or(DEFAULT_COOLDOWN_SECONDS);
        } else {
            self.need_sleep = 0;
        }
    }
}

/// Overpass reports throttling in the body, sometimes with a 200 status.
fn is_rate_limited(body: &str) -> bool {
    body.contains("rate_limited") || body.contains("Too Many Requests")
}

/// Extract the advised wait from bodies like
/// "Slot available after: 2026-08-04T12:00:00Z, in 37 seconds.".
fn parse_retry_seconds(body: &str) -> Option<u64> {
    let head = &body[..body.find(" seconds")?];
    let digits: String = head
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse().ok()
}
