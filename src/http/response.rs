//! HTTP response as seen by the pipeline.
//!
//! A [`Response`] leaves the transport with a raw [`Body`], may have its body
//! replaced by decoded JSON on the way out, and is the unit the cache stores.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::{Headers, Method, StatusCode};

/// Response payload: the raw bytes from the wire, or their decoded JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Body {
    Raw(Bytes),
    Json(serde_json::Value),
}

impl Body {
    /// An empty raw body.
    pub fn empty() -> Self {
        Body::Raw(Bytes::new())
    }

    /// Returns the raw bytes, or `None` once the body has been decoded.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Body::Raw(bytes) => Some(bytes),
            Body::Json(_) => None,
        }
    }

    /// Returns the decoded JSON value, or `None` if the body is still raw.
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Body::Json(value) => Some(value),
            Body::Raw(_) => None,
        }
    }

    /// Returns the raw body as UTF-8 text, if it is raw and valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Body::Raw(bytes) => bytes.is_empty(),
            Body::Json(_) => false,
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Body::Raw(Bytes::from_static(text.as_bytes()))
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Raw(Bytes::from(text))
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Raw(Bytes::from(bytes))
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body::Raw(bytes)
    }
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self {
        Body::Json(value)
    }
}

/// How the cache stage handled the request that produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheStatus {
    /// The cache did not consider the request (non-GET, or no cache stage).
    #[default]
    Bypass,
    /// No usable entry; the response came from the network.
    Miss,
    /// Served from storage without contacting the origin.
    Hit,
    /// The origin answered `304` and the stored body was reused.
    Revalidated,
}

impl CacheStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Bypass => "BYPASS",
            CacheStatus::Miss => "MISS",
            CacheStatus::Hit => "HIT",
            CacheStatus::Revalidated => "REVALIDATED",
        }
    }

    /// Returns `true` when the body was served from storage.
    pub fn is_cached(self) -> bool {
        matches!(self, CacheStatus::Hit | CacheStatus::Revalidated)
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP response flowing back through the pipeline.
///
/// # Examples
///
/// ```
/// use reqchain::http::{Method, Response, StatusCode};
///
/// let response = Response::new(StatusCode::OK)
///     .header("Cache-Control", "max-age=60")
///     .header("ETag", "\"v1\"")
///     .method(Method::Get)
///     .body("hello");
///
/// assert_eq!(response.etag(), Some("\"v1\""));
/// assert_eq!(response.content().as_text(), Some("hello"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    status: StatusCode,
    headers: Headers,
    body: Body,
    method: Method,
    #[serde(skip)]
    cache_status: CacheStatus,
}

impl Response {
    /// Creates a new response with the given status and an empty body.
    ///
    /// The originating method defaults to `GET`; the transport overwrites it
    /// with the method of the request it actually sent.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Body::empty(),
            method: Method::Get,
            cache_status: CacheStatus::Bypass,
        }
    }

    /// Sets a response header, replacing any existing value.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    /// Records the method of the request this response answers.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn content(&self) -> &Body {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<Body>) {
        self.body = body.into();
    }

    /// The method of the request that produced this response.
    pub fn originating_method(&self) -> &Method {
        &self.method
    }

    pub fn cache_status(&self) -> CacheStatus {
        self.cache_status
    }

    pub fn set_cache_status(&mut self, status: CacheStatus) {
        self.cache_status = status;
    }

    pub fn cache_control(&self) -> Option<&str> {
        self.headers.get("cache-control")
    }

    pub fn date(&self) -> Option<&str> {
        self.headers.get("date")
    }

    pub fn etag(&self) -> Option<&str> {
        self.headers.get("etag")
    }

    /// Returns `true` if `Content-Type` declares `application/json`.
    pub fn is_json(&self) -> bool {
        self.headers
            .get("content-type")
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(StatusCode::OK)
    }
}
