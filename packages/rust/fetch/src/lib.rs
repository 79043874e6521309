//! HTTP fetcher for the published CSV source.
//!
//! Produces decoded CSV text from a fully-formed source URL. Single
//! attempt, no retry: the operation is one bounded request-and-transform,
//! and the caller re-runs the whole pipeline on every view.

pub mod decode;

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use docboard_shared::{DocboardError, Result};

pub use decode::{decode_payload, detect_encoding};

/// User-Agent string for fetch requests.
const USER_AGENT: &str = concat!("docboard/", env!("CARGO_PKG_VERSION"));

/// Fetches raw bytes from the published CSV endpoint and decodes them.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Create a fetcher with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(timeout)
            .build()
            .map_err(|e| DocboardError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Fetch the CSV payload at `url` and return it as decoded text.
    ///
    /// Any transport failure or non-success status is a fatal
    /// [`DocboardError::Fetch`] carrying the attempted URL; a payload that
    /// arrives but cannot be decoded is a [`DocboardError::Decode`].
    pub async fn fetch_csv(&self, url: &Url) -> Result<String> {
        debug!(%url, "fetching source CSV");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| DocboardError::fetch(url.as_str(), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocboardError::fetch(url.as_str(), format!("HTTP {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DocboardError::fetch(url.as_str(), format!("body read failed: {e}")))?;

        info!(%url, bytes = bytes.len(), "fetched source CSV");
        decode_payload(url.as_str(), &bytes)
    }
}
