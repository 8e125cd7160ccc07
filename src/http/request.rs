//! Outbound HTTP request.

use bytes::Bytes;
use url::Url;

use super::{Headers, Method};
use crate::{Error, Result};

/// An outbound HTTP request.
///
/// The URL is parsed and normalized on construction; its serialized form is
/// the request's cache identity (see [`Request::cache_key`]).
///
/// # Examples
///
/// ```
/// use reqchain::http::{Method, Request};
///
/// let request = Request::get("HTTPS://api.github.com/users/octocat")
///     .unwrap()
///     .header("Accept", "application/vnd.github+json");
///
/// assert_eq!(request.method(), &Method::Get);
/// assert_eq!(request.cache_key(), "https://api.github.com/users/octocat");
/// assert_eq!(request.headers().get("accept"), Some("application/vnd.github+json"));
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Url,
    headers: Headers,
    body: Option<Bytes>,
}

impl Request {
    /// Creates a request for an absolute URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`](crate::Error::InvalidUrl) if `url` is not
    /// a valid absolute URL.
    pub fn new(method: Method, url: &str) -> Result<Self> {
        Ok(Self {
            method,
            url: Url::parse(url)?,
            headers: Headers::new(),
            body: None,
        })
    }

    /// Shorthand for [`Request::new`] with [`Method::Get`].
    pub fn get(url: &str) -> Result<Self> {
        Self::new(Method::Get, url)
    }

    /// Shorthand for [`Request::new`] with [`Method::Post`].
    pub fn post(url: &str) -> Result<Self> {
        Self::new(Method::Post, url)
    }

    /// Sets a request header, replacing any existing value.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `value` as the JSON body and sets `Content-Type` accordingly.
    pub fn json<T: serde::Serialize>(self, value: &T) -> Result<Self> {
        let body = serde_json::to_vec(value).map_err(Error::Encode)?;
        Ok(self.header("Content-Type", "application/json").body(body))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Mutable header access for middleware that decorates the request in flight.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Returns the request body, if any.
    pub fn body_bytes(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Returns the canonical URL string under which responses are cached.
    pub fn cache_key(&self) -> &str {
        self.url.as_str()
    }

    /// Returns `true` if the request carries an `If-None-Match` validator.
    pub fn is_conditional(&self) -> bool {
        self.headers.contains("if-none-match")
    }
}
