//! Stored responses.

use serde::{Deserialize, Serialize};

use super::StorageError;
use crate::http::Response;

/// A response held in storage, together with the key it was stored under.
///
/// Only responses to `GET` requests become entries; the cache stage enforces
/// this before writing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    key: String,
    response: Response,
}

impl CacheEntry {
    pub fn new(key: impl Into<String>, response: Response) -> Self {
        Self {
            key: key.into(),
            response,
        }
    }

    /// The canonical URL this entry answers.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn into_response(self) -> Response {
        self.response
    }

    /// Encodes the entry for byte-oriented backends.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StorageError> {
        serde_json::to_vec(self).map_err(StorageError::Codec)
    }

    /// Decodes an entry written by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StorageError> {
        serde_json::from_slice(bytes).map_err(StorageError::Codec)
    }
}
