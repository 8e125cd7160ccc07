//! The caching stage.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use super::policy::{self, Lookup};
use super::{CacheEntry, Storage};
use crate::Result;
use crate::http::{CacheStatus, Request, Response, StatusCode};
use crate::middleware::{Middleware, Next};

/// Serves `GET` requests from [`Storage`] when possible and keeps storage up
/// to date with what the origin returns.
///
/// # Behavior
///
/// Non-`GET` requests pass straight through: no lookup, no store. For `GET`:
///
/// 1. The canonical URL is looked up in storage.
/// 2. An entry marked `no-cache`/`must-validate` is always revalidated with
///    `If-None-Match`, however fresh it is.
/// 3. Otherwise an entry younger than its `max-age` is returned immediately
///    and the rest of the chain (and the network) is skipped.
/// 4. Otherwise the request goes downstream, conditional on the stored
///    `ETag` when there is one.
///
/// On the way back a `304` is merged into the stored entry (new `Date`, and
/// `ETag` if supplied) and the merged response is returned. Any other response
/// that is storable replaces the entry.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use reqchain::cache::{CacheMiddleware, MemoryStorage};
///
/// let cache = CacheMiddleware::new(Arc::new(MemoryStorage::new()));
/// # let _ = cache;
/// ```
pub struct CacheMiddleware {
    storage: Arc<dyn Storage>,
}

impl CacheMiddleware {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }
}

impl Middleware for CacheMiddleware {
    fn handle(&self, mut request: Request, next: Next<'_>) -> Result<Response> {
        if !request.method().is_cacheable() {
            let mut response = next.run(request)?;
            response.set_cache_status(CacheStatus::Bypass);
            return Ok(response);
        }

        let key = request.cache_key().to_owned();
        let lookup = Lookup::classify(self.storage.read(&key)?, Utc::now());

        let stored = match lookup {
            Lookup::Fresh(entry) => {
                debug!(key = %key, backend = self.storage.name(), "fresh cache hit");
                let mut response = entry.into_response();
                response.set_cache_status(CacheStatus::Hit);
                return Ok(response);
            }
            Lookup::MustRevalidate(entry) | Lookup::Stale(entry) => {
                if let Some(etag) = entry.response().etag() {
                    request.headers_mut().insert("If-None-Match", etag);
                }
                debug!(key = %key, etag = entry.response().etag(), "revalidating cached response");
                Some(entry)
            }
            Lookup::Miss => None,
        };

        let mut response = next.run(request)?;

        match stored {
            Some(entry) if response.status() == StatusCode::NOT_MODIFIED => {
                let mut merged = policy::merge_not_modified(entry.into_response(), &response);
                self.storage
                    .write(&key, CacheEntry::new(key.as_str(), merged.clone()))?;
                merged.set_cache_status(CacheStatus::Revalidated);
                Ok(merged)
            }
            _ => {
                if policy::is_storable(&response) {
                    debug!(key = %key, status = response.status().as_u16(), "storing response");
                    self.storage
                        .write(&key, CacheEntry::new(key.as_str(), response.clone()))?;
                }
                response.set_cache_status(CacheStatus::Miss);
                Ok(response)
            }
        }
    }
}
