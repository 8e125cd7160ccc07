//! Status allow-list validation.

use crate::http::{Body, Request, Response, StatusCode};
use crate::middleware::{Middleware, Next};
use crate::{Error, Result};

/// Statuses the API layer knows how to interpret.
pub const DEFAULT_ALLOWED_STATUSES: [u16; 6] = [200, 302, 401, 403, 404, 422];

/// Rejects responses whose status is not in the allow-list.
///
/// A rejected response becomes [`Error::RequestFailure`] carrying the
/// `message` field of the JSON error body the server sent.
///
/// A `304 Not Modified` is let through when the request was conditional
/// (carried `If-None-Match`), because the cache stage above us issued that
/// request and has to see the reply to merge it.
///
/// # Examples
///
/// ```rust
/// use reqchain::middleware::StatusCheckMiddleware;
///
/// let strict = StatusCheckMiddleware::new();
/// let with_created = StatusCheckMiddleware::with_allowed([200, 201, 204]);
/// # let _ = (strict, with_created);
/// ```
#[derive(Debug, Clone)]
pub struct StatusCheckMiddleware {
    allowed: Vec<u16>,
}

impl Default for StatusCheckMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusCheckMiddleware {
    /// Creates a check using [`DEFAULT_ALLOWED_STATUSES`].
    pub fn new() -> Self {
        Self::with_allowed(DEFAULT_ALLOWED_STATUSES)
    }

    /// Creates a check with a custom allow-list.
    pub fn with_allowed(allowed: impl IntoIterator<Item = u16>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    fn accepts(&self, status: StatusCode, conditional: bool) -> bool {
        self.allowed.contains(&status.as_u16())
            || (conditional && status == StatusCode::NOT_MODIFIED)
    }
}

impl Middleware for StatusCheckMiddleware {
    fn handle(&self, request: Request, next: Next<'_>) -> Result<Response> {
        let conditional = request.is_conditional();
        let response = next.run(request)?;

        if self.accepts(response.status(), conditional) {
            return Ok(response);
        }

        Err(Error::RequestFailure {
            status: response.status().as_u16(),
            message: error_message(&response),
        })
    }
}

// The body may still be raw if the server lied about (or omitted) its content type.
fn error_message(response: &Response) -> String {
    let from_json = |value: &serde_json::Value| {
        value
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
    };

    let message = match response.content() {
        Body::Json(value) => from_json(value),
        Body::Raw(bytes) => serde_json::from_slice::<serde_json::Value>(bytes)
            .ok()
            .as_ref()
            .and_then(from_json),
    };

    message.unwrap_or_else(|| {
        response
            .status()
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_owned()
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::StubTransport;

    fn dispatch(check: StatusCheckMiddleware, request: Request, response: Response) -> Result<Response> {
        let chain: Vec<Arc<dyn Middleware>> = vec![Arc::new(check)];
        let transport = StubTransport::new();
        transport.push(response);
        Next::new(&chain, &transport).run(request)
    }

    fn get() -> Request {
        Request::get("https://api.github.com/users/octocat").unwrap()
    }

    #[test]
    fn allowed_statuses_pass() {
        for code in DEFAULT_ALLOWED_STATUSES {
            let response = Response::new(StatusCode::from_u16(code));
            let result = dispatch(StatusCheckMiddleware::new(), get(), response);
            assert!(result.is_ok(), "{code} should pass");
        }
    }

    #[test]
    fn server_error_carries_json_message() {
        let response = Response::new(StatusCode::INTERNAL_SERVER_ERROR)
            .header("Content-Type", "application/json")
            .body(r#"{"message":"Server Error"}"#);

        let err = dispatch(StatusCheckMiddleware::new(), get(), response).unwrap_err();
        match err {
            Error::RequestFailure { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Server Error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn decoded_body_message_is_used() {
        let response = Response::new(StatusCode::from_u16(409))
            .body(serde_json::json!({ "message": "Conflict on ref" }));

        let err = dispatch(StatusCheckMiddleware::new(), get(), response).unwrap_err();
        assert!(matches!(
            err,
            Error::RequestFailure { status: 409, ref message } if message == "Conflict on ref"
        ));
    }

    #[test]
    fn missing_message_falls_back_to_reason() {
        let response = Response::new(StatusCode::from_u16(502)).body("<html>bad gateway</html>");
        let err = dispatch(StatusCheckMiddleware::new(), get(), response).unwrap_err();
        assert!(matches!(
            err,
            Error::RequestFailure { ref message, .. } if message == "Bad Gateway"
        ));
    }

    #[test]
    fn not_modified_passes_only_for_conditional_requests() {
        let conditional = get().header("If-None-Match", "\"v1\"");
        let ok = dispatch(
            StatusCheckMiddleware::new(),
            conditional,
            Response::new(StatusCode::NOT_MODIFIED),
        );
        assert!(ok.is_ok());

        let err = dispatch(
            StatusCheckMiddleware::new(),
            get(),
            Response::new(StatusCode::NOT_MODIFIED),
        );
        assert!(matches!(err, Err(Error::RequestFailure { status: 304, .. })));
    }

    #[test]
    fn custom_allow_list() {
        let request = Request::post("https://api.github.com/gists").unwrap();
        let result = dispatch(
            StatusCheckMiddleware::with_allowed([201]),
            request,
            Response::new(StatusCode::CREATED),
        );
        assert!(result.is_ok());
    }
}
