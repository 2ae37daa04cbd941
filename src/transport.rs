//! HTTP transport abstraction.
//!
//! The conversion protocol only ever needs two request shapes: a
//! form-encoded POST (job submission) and a plain GET (status polling), both
//! returning a text body. Putting that pair behind the [`Transport`] trait
//! keeps the protocol modules free of HTTP plumbing and lets tests drive a
//! whole conversion session against a scripted in-memory double — no live
//! server, no network.
//!
//! [`HttpTransport`] is the production implementation, a thin wrapper over a
//! shared [`reqwest::Client`]. Requests are cancellable by dropping the
//! future; an in-flight request is not forcibly interrupted, the drop takes
//! effect at the await point.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by the HTTP layer.
///
/// These are terminal for a conversion session: the poller does not retry
/// transport failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status code.
    #[error("server returned HTTP {status}")]
    Status { status: u16 },

    /// The request could not be sent or no response arrived (DNS failure,
    /// refused connection, TLS error, …).
    #[error("request failed: {0}")]
    Request(String),

    /// The response arrived but its body could not be read as text.
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Minimal async HTTP surface consumed by the conversion protocol.
///
/// Implementations must be `Send + Sync`; a single transport is shared by
/// the submit call and every poll cycle of a session, and may be shared
/// across concurrent sessions.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `params` form-encoded to `url` and return the response body.
    async fn post_form(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<String, TransportError>;

    /// GET `url` and return the response body.
    async fn get(&self, url: &str) -> Result<String, TransportError>;
}

/// Production transport backed by [`reqwest`].
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with the given per-request timeout and user agent.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self { client })
    }

    async fn read_body(response: reqwest::Response) -> Result<String, TransportError> {
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_form(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<String, TransportError> {
        let response = self.client.post(url).form(params).send().await?;
        Self::read_body(response).await
    }

    async fn get(&self, url: &str) -> Result<String, TransportError> {
        let response = self.client.get(url).send().await?;
        Self::read_body(response).await
    }
}
