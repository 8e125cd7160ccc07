//! Crate-wide error type.
//!
//! Every pipeline stage either returns a response or fails with one of these
//! variants. Stages never catch or convert each other's failures, and nothing
//! in the pipeline retries.

use thiserror::Error;

use crate::cache::StorageError;
use crate::transport::TransportError;

/// Errors surfaced by [`Pipeline::dispatch`](crate::Pipeline::dispatch) and
/// pipeline construction.
#[derive(Debug, Error)]
pub enum Error {
    /// The upstream answered `401 Unauthorized`.
    #[error("authentication failed: {0}")]
    AuthenticationFailure(String),

    /// The upstream answered with a status outside the allow-list.
    #[error("request failed with status {status}: {message}")]
    RequestFailure { status: u16, message: String },

    /// The storage backend could not be reached or initialized.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A body declared as JSON failed to parse.
    #[error("failed to decode JSON body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A request body could not be serialized to JSON.
    #[error("failed to encode JSON body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
