//! Response caching: the decision engine and its storage backends.
//!
//! The cache implements the part of HTTP caching the upstream API actually
//! exercises: `max-age` freshness computed from `Date`, conditional
//! revalidation with `If-None-Match`, `304 Not Modified` merging, and the
//! `no-store` / `no-cache` / `must-validate` directives.
//!
//! ## Core types
//!
//! - [`CacheMiddleware`]: the pipeline stage.
//! - [`Storage`]: persistence contract, implemented by [`MemoryStorage`]
//!   (per process) and [`RedisStorage`] (shared over the network).
//! - [`CacheEntry`]: a stored response and its key.
//! - [`CacheControl`] and [`policy`]: directive parsing and the pure
//!   freshness/storability rules.

mod control;
mod entry;
mod middleware;
pub mod policy;
mod redis;
mod storage;

pub use control::CacheControl;
pub use entry::CacheEntry;
pub use middleware::CacheMiddleware;
pub use policy::Lookup;
pub use self::redis::{DEFAULT_NAMESPACE, RedisStorage};
pub use storage::{MemoryStorage, Storage, StorageError};
