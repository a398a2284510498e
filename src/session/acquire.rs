//! HTTP acquisition handshake.
//!
//! Reserves a remote browser instance by calling the endpoint's
//! acquisition route and extracting the session identifier from the JSON
//! response. No retry is attempted here; acquisition failures propagate
//! directly out of [`Transport::create`](crate::Transport::create).

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::SessionId;

use super::endpoint::Endpoint;
use super::options::ConnectOptions;

// ============================================================================
// AcquireResponse
// ============================================================================

/// Body of a successful acquisition response.
#[derive(Debug, Deserialize)]
struct AcquireResponse {
    /// Identifier of the reserved browser instance.
    #[serde(rename = "sessionId")]
    session_id: SessionId,
}

// ============================================================================
// SessionAcquirer
// ============================================================================

/// Reserves a remote browser instance, or validates a caller-supplied
/// session.
///
/// # Example
///
/// ```no_run
/// use devtools_transport::{ConnectOptions, Endpoint, SessionAcquirer};
///
/// # async fn example() -> devtools_transport::Result<()> {
/// let endpoint = Endpoint::parse("https://browser.example.dev")?;
/// let acquirer = SessionAcquirer::new(endpoint);
/// let session_id = acquirer.acquire(&ConnectOptions::new()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SessionAcquirer {
    /// HTTP client for the acquisition call.
    client: reqwest::Client,
    /// Remote browser host.
    endpoint: Endpoint,
}

impl SessionAcquirer {
    /// Creates an acquirer for the given endpoint.
    #[inline]
    #[must_use]
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Returns the endpoint this acquirer targets.
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Obtains a session identifier.
    ///
    /// A caller-supplied [`ConnectOptions::session_id`] is returned
    /// unchanged without any network call. Otherwise one `GET` is issued
    /// to the acquisition route, carrying the optional keep-alive
    /// duration.
    ///
    /// # Errors
    ///
    /// - [`Error::Acquisition`] on a non-success status (status code and
    ///   body carried verbatim), or on a success status with a body that
    ///   is not valid acquisition JSON
    /// - [`Error::Http`] if the endpoint cannot be reached
    pub async fn acquire(&self, options: &ConnectOptions) -> Result<SessionId> {
        if let Some(session_id) = &options.session_id {
            debug!(%session_id, "reusing caller-supplied session");
            return Ok(session_id.clone());
        }

        let url = self.endpoint.acquire_url(options.keep_alive);
        debug!(url = %url, "acquiring browser session");

        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        if status != 200 {
            return Err(Error::acquisition(status, body));
        }

        let Ok(acquired) = serde_json::from_str::<AcquireResponse>(&body) else {
            return Err(Error::acquisition(status, body));
        };

        debug!(session_id = %acquired.session_id, "browser session acquired");
        Ok(acquired.session_id)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::Ipv4Addr;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Spawns a one-shot HTTP host answering with a fixed response and
    /// reporting the raw request it received.
    async fn spawn_acquire_host(
        status: &'static str,
        body: &'static str,
    ) -> (Endpoint, oneshot::Receiver<String>) {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let (request_tx, request_rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accept");

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = stream.read(&mut buf).await.expect("read request");
                request.extend_from_slice(&buf[..n]);
                if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let _ = request_tx.send(String::from_utf8_lossy(&request).into_owned());

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream
                .write_all(response.as_bytes())
                .await
                .expect("write response");
            let _ = stream.shutdown().await;
        });

        let endpoint = Endpoint::parse(&format!("http://{addr}")).expect("valid endpoint");
        (endpoint, request_rx)
    }

    #[tokio::test]
    async fn test_acquire_success() {
        let (endpoint, request_rx) =
            spawn_acquire_host("200 OK", r#"{"sessionId": "478f0ba8"}"#).await;

        let acquirer = SessionAcquirer::new(endpoint);
        let session_id = acquirer
            .acquire(&ConnectOptions::new())
            .await
            .expect("acquire");

        assert_eq!(session_id, SessionId::new("478f0ba8"));

        let request = request_rx.await.expect("request seen");
        assert!(request.starts_with("GET /v1/acquire HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_acquire_sends_keep_alive() {
        let (endpoint, request_rx) =
            spawn_acquire_host("200 OK", r#"{"sessionId": "478f0ba8"}"#).await;

        let acquirer = SessionAcquirer::new(endpoint);
        let options = ConnectOptions::new().with_keep_alive(std::time::Duration::from_secs(30));
        acquirer.acquire(&options).await.expect("acquire");

        let request = request_rx.await.expect("request seen");
        assert!(request.starts_with("GET /v1/acquire?keep_alive=30000 HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_acquire_overloaded_host() {
        let (endpoint, _request_rx) =
            spawn_acquire_host("503 Service Unavailable", "overloaded").await;

        let acquirer = SessionAcquirer::new(endpoint);
        let err = acquirer.acquire(&ConnectOptions::new()).await.unwrap_err();

        match err {
            Error::Acquisition { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("expected acquisition error, got: {other}"),
        }
    }

    #[tokio::test]
    async fn test_acquire_malformed_body() {
        let (endpoint, _request_rx) = spawn_acquire_host("200 OK", "not json at all").await;

        let acquirer = SessionAcquirer::new(endpoint);
        let err = acquirer.acquire(&ConnectOptions::new()).await.unwrap_err();

        match err {
            Error::Acquisition { status, body } => {
                assert_eq!(status, 200);
                assert_eq!(body, "not json at all");
            }
            other => panic!("expected acquisition error, got: {other}"),
        }
    }

    #[tokio::test]
    async fn test_supplied_session_skips_acquisition() {
        // Nothing listens on this endpoint; acquisition would fail if a
        // call were made.
        let endpoint = Endpoint::parse("http://127.0.0.1:9").expect("valid endpoint");

        let acquirer = SessionAcquirer::new(endpoint);
        let options = ConnectOptions::new().with_session_id("abc123");
        let session_id = acquirer.acquire(&options).await.expect("no network call");

        assert_eq!(session_id, SessionId::new("abc123"));
    }

    #[tokio::test]
    async fn test_acquire_unreachable_endpoint() {
        let endpoint = Endpoint::parse("http://127.0.0.1:9").expect("valid endpoint");

        let acquirer = SessionAcquirer::new(endpoint);
        let err = acquirer.acquire(&ConnectOptions::new()).await.unwrap_err();

        assert!(err.is_acquisition());
    }
}
