//! JSON body decoding.

use crate::Result;
use crate::http::{Body, Request, Response};
use crate::middleware::{Middleware, Next};

/// Replaces a raw body with its parsed JSON value when the response declares
/// `application/json`.
///
/// Empty bodies are left raw. Malformed JSON fails the dispatch with
/// [`Error::Decode`](crate::Error::Decode).
pub struct JsonMiddleware;

impl Middleware for JsonMiddleware {
    fn handle(&self, request: Request, next: Next<'_>) -> Result<Response> {
        let mut response = next.run(request)?;

        if !response.is_json() {
            return Ok(response);
        }

        let decoded = match response.content() {
            Body::Raw(bytes) if !bytes.is_empty() => {
                Some(serde_json::from_slice::<serde_json::Value>(bytes)?)
            }
            _ => None,
        };
        if let Some(value) = decoded {
            response.set_body(Body::Json(value));
        }

        Ok(response)
    }
}
