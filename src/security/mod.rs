//! Security: credentials and the authentication stage.
//!
//! - [`Credential`]: the process-wide API credential.
//! - [`AuthMiddleware`]: attaches the credential and turns `401` into
//!   [`Error::AuthenticationFailure`](crate::Error::AuthenticationFailure).

use std::fmt;

use serde::Deserialize;

mod middleware;

pub use middleware::AuthMiddleware;

/// An API credential rendered into the `Authorization` header.
///
/// The secret is never printed by `Debug`.
///
/// # Examples
///
/// ```
/// use reqchain::security::Credential;
///
/// assert_eq!(Credential::token("abc").header_value(), "token abc");
/// assert_eq!(Credential::bearer("abc").header_value(), "Bearer abc");
/// ```
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "scheme", content = "secret", rename_all = "lowercase")]
pub enum Credential {
    /// GitHub-style `token <secret>`.
    Token(String),
    /// OAuth-style `Bearer <secret>`.
    Bearer(String),
}

impl Credential {
    pub fn token(secret: impl Into<String>) -> Self {
        Credential::Token(secret.into())
    }

    pub fn bearer(secret: impl Into<String>) -> Self {
        Credential::Bearer(secret.into())
    }

    /// The full `Authorization` header value.
    pub fn header_value(&self) -> String {
        match self {
            Credential::Token(secret) => format!("token {secret}"),
            Credential::Bearer(secret) => format!("Bearer {secret}"),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Token(_) => f.write_str("Token(***)"),
            Credential::Bearer(_) => f.write_str("Bearer(***)"),
        }
    }
}
