//! Key/value storage behind the cache.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use thiserror::Error;

use super::CacheEntry;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("redis storage error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("failed to encode or decode cache entry: {0}")]
    Codec(#[source] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Persistence contract for cache entries.
///
/// # Contract
///
/// - A `write` to an existing key fully replaces the previous entry.
/// - Entries never expire on their own; freshness is computed by the reader.
/// - Implementations are shared across threads. Individual calls must be
///   safe under concurrent use, but a read followed by a write is not atomic:
///   concurrent writers to one key resolve as last-writer-wins.
pub trait Storage: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<CacheEntry>, StorageError>;

    fn write(&self, key: &str, entry: CacheEntry) -> Result<(), StorageError>;

    /// Removes every entry. Calling it on empty storage is a no-op.
    fn flush(&self) -> Result<(), StorageError>;

    /// Short backend name used in logs.
    fn name(&self) -> &'static str;
}

/// In-process storage that lives as long as the value itself.
///
/// # Examples
///
/// ```
/// use reqchain::cache::{CacheEntry, MemoryStorage, Storage};
/// use reqchain::http::{Response, StatusCode};
///
/// let storage = MemoryStorage::new();
/// let entry = CacheEntry::new("http://example.test/", Response::new(StatusCode::OK));
/// storage.write("http://example.test/", entry).unwrap();
/// assert!(storage.read("http://example.test/").unwrap().is_some());
///
/// storage.flush().unwrap();
/// assert!(storage.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries. Still counts after a writer panicked.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<CacheEntry>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, entry: CacheEntry) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_owned(), entry);
        Ok(())
    }

    fn flush(&self) -> Result<(), StorageError> {
        self.entries
            .write()
            .map_err(|_| StorageError::Poisoned)?
            .clear();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::http::{Response, StatusCode};

    fn entry(key: &str, body: &'static str) -> CacheEntry {
        CacheEntry::new(key, Response::new(StatusCode::OK).body(body))
    }

    #[test]
    fn write_replaces_existing_entry() {
        let storage = MemoryStorage::new();
        storage.write("k", entry("k", "first")).unwrap();
        storage.write("k", entry("k", "second")).unwrap();

        let stored = storage.read("k").unwrap().unwrap();
        assert_eq!(stored.response().content().as_text(), Some("second"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn flush_is_idempotent() {
        let storage = MemoryStorage::new();
        storage.write("a", entry("a", "x")).unwrap();
        storage.write("b", entry("b", "y")).unwrap();

        storage.flush().unwrap();
        storage.flush().unwrap();

        assert!(storage.is_empty());
        assert!(storage.read("a").unwrap().is_none());
        assert!(storage.read("b").unwrap().is_none());
    }

    #[test]
    fn len_survives_a_poisoned_lock() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write("k", entry("k", "v")).unwrap();

        let poisoner = Arc::clone(&storage);
        let _ = thread::spawn(move || {
            let _guard = poisoner.entries.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(matches!(storage.read("k"), Err(StorageError::Poisoned)));
        assert_eq!(storage.len(), 1);
        assert!(!storage.is_empty());
    }

    #[test]
    fn concurrent_writers_last_one_wins() {
        let storage = Arc::new(MemoryStorage::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let storage = Arc::clone(&storage);
                thread::spawn(move || {
                    for _ in 0..100 {
                        storage.write("k", entry("k", "v")).unwrap();
                        assert!(storage.read("k").unwrap().is_some());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(storage.len(), 1);
    }
}
