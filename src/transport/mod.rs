//! Network transport: the innermost link of the pipeline.
//!
//! The [`Transport`] trait is the seam between the middleware chain and the
//! network. [`HttpTransport`] performs real calls with a blocking `reqwest`
//! client; tests and callers may substitute any other implementation,
//! including a plain closure.

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::http::{Headers, Request, Response, StatusCode};

/// Errors produced while talking to the network.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid request method: {0}")]
    InvalidMethod(String),
}

/// Performs a single request/response exchange.
///
/// Implementations block the calling thread until the exchange completes or
/// fails. They must be `Send + Sync` because one pipeline is shared across
/// threads.
pub trait Transport: Send + Sync {
    fn send(&self, request: &Request) -> Result<Response, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&Request) -> Result<Response, TransportError> + Send + Sync,
{
    fn send(&self, request: &Request) -> Result<Response, TransportError> {
        (self)(request)
    }
}

/// Settings for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Sent as `User-Agent` on every request.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("reqchain/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

/// Blocking HTTP transport backed by `reqwest`.
///
/// Redirects are not followed: a `302` is returned to the chain as-is so the
/// status stage and the caller can see it.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Builds a transport with the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Http`] if the TLS backend cannot be
    /// initialized.
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &Request) -> Result<Response, TransportError> {
        let method = reqwest::Method::from_bytes(request.method().as_str().as_bytes())
            .map_err(|_| TransportError::InvalidMethod(request.method().to_string()))?;

        let mut builder = self.client.request(method, request.url().clone());
        for (name, value) in request.headers().iter() {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body_bytes() {
            builder = builder.body(body.to_vec());
        }

        debug!(method = %request.method(), url = %request.url(), "sending request");
        let upstream = builder.send()?;

        let status = StatusCode::from_u16(upstream.status().as_u16());
        // Repeated lines are joined into one value. Non-UTF-8 values are dropped;
        // nothing downstream can interpret them.
        let mut headers = Headers::new();
        for (name, value) in upstream.headers() {
            if let Ok(value) = value.to_str() {
                headers.append(name.as_str(), value);
            }
        }
        let body = upstream.bytes()?;

        let mut response = Response::new(status)
            .method(request.method().clone())
            .body(body);
        *response.headers_mut() = headers;
        Ok(response)
    }
}
