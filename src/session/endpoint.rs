//! Endpoint URL validation and route construction.
//!
//! The endpoint names the remote browser host. Acquisition talks plain
//! HTTP to it; the devtools connection upgrades to a WebSocket on a
//! session-scoped route of the same host.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};
use crate::identifiers::SessionId;

// ============================================================================
// Endpoint
// ============================================================================

/// Validated base URL of a remote browser host.
///
/// Accepts `http` or `https` URLs only; the devtools route is rewritten
/// to the matching `ws`/`wss` scheme when connecting.
///
/// # Example
///
/// ```
/// use devtools_transport::Endpoint;
///
/// let endpoint = Endpoint::parse("https://browser.example.dev").expect("valid endpoint");
/// assert_eq!(endpoint.url().scheme(), "https");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    /// Parses and validates an endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the input is not a URL or
    /// its scheme is neither `http` nor `https`.
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input).map_err(|e| Error::invalid_endpoint(e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_endpoint(format!(
                "unsupported scheme `{}`: expected http or https",
                url.scheme()
            )));
        }

        Ok(Self { url })
    }

    /// Returns the underlying URL.
    #[inline]
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Builds the acquisition route.
    ///
    /// Format: `{endpoint}/v1/acquire[?keep_alive=<milliseconds>]`.
    #[must_use]
    pub fn acquire_url(&self, keep_alive: Option<Duration>) -> Url {
        let mut url = self.route(["v1", "acquire"]);
        if let Some(keep_alive) = keep_alive {
            url.query_pairs_mut()
                .append_pair("keep_alive", &keep_alive.as_millis().to_string());
        }
        url
    }

    /// Builds the session-scoped devtools connection route.
    ///
    /// Format: `{endpoint}/v1/connectDevtools?browser_session=<sessionId>`
    /// with the scheme rewritten to `ws` or `wss`.
    #[must_use]
    pub fn devtools_url(&self, session_id: &SessionId) -> Url {
        let mut url = self.route(["v1", "connectDevtools"]);
        url.query_pairs_mut()
            .append_pair("browser_session", session_id.as_str());

        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        // http(s) and ws(s) are both special schemes, so the rewrite
        // cannot fail.
        let _ = url.set_scheme(scheme);
        url
    }

    /// Appends route segments to the endpoint path.
    fn route(&self, segments: [&str; 2]) -> Url {
        let mut url = self.url.clone();
        // http(s) URLs are always base URLs, so path_segments_mut succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.url, f)
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        Self::parse(input)
    }
}

// ============================================================================
// Tests
// ============================================================================
