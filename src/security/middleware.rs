//! Authentication middleware.

use crate::http::{Request, Response, StatusCode};
use crate::middleware::{Middleware, Next};
use crate::security::Credential;
use crate::{Error, Result};

const AUTH_FAILURE_MESSAGE: &str = "Authentication Failed. Please set the 'GITHUB_TOKEN' \
     environment variable to a valid GitHub access token.";

/// Attaches the credential to every request and fails on `401 Unauthorized`.
///
/// # Behavior
///
/// - The `Authorization` header is set on every outgoing request, replacing
///   any value the caller provided. Without a credential the header is left
///   alone.
/// - A `401` from downstream becomes [`Error::AuthenticationFailure`]. It is
///   never retried.
///
/// # Examples
///
/// ```rust
/// use reqchain::security::{AuthMiddleware, Credential};
///
/// let auth = AuthMiddleware::new(Some(Credential::token("ghp_example")));
/// # let _ = auth;
/// ```
#[derive(Debug, Clone)]
pub struct AuthMiddleware {
    credential: Option<Credential>,
}

impl AuthMiddleware {
    pub fn new(credential: Option<Credential>) -> Self {
        Self { credential }
    }
}

impl Middleware for AuthMiddleware {
    fn handle(&self, mut request: Request, next: Next<'_>) -> Result<Response> {
        if let Some(credential) = &self.credential {
            request
                .headers_mut()
                .insert("Authorization", credential.header_value());
        }

        let response = next.run(request)?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(Error::AuthenticationFailure(AUTH_FAILURE_MESSAGE.to_owned()));
        }

        Ok(response)
    }
}
