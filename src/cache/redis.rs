//! Redis-backed storage shared across processes.

use std::sync::Mutex;
use std::time::Duration;

use redis::{Client, Connection};
use tracing::{debug, trace};

use super::{CacheEntry, Storage, StorageError};
use crate::{Error, Result};

/// Default key prefix, keeping cache entries apart from other data in the database.
pub const DEFAULT_NAMESPACE: &str = "reqchain:";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const SCAN_BATCH: usize = 100;

/// Storage backend over a Redis server.
///
/// Entries are JSON-encoded [`CacheEntry`] values stored under
/// `<namespace><canonical url>`. Every process pointing at the same server and
/// namespace shares one cache.
///
/// A single connection is opened at construction and guarded by a mutex, so
/// concurrent callers serialize on it.
pub struct RedisStorage {
    connection: Mutex<Connection>,
    namespace: String,
}

impl RedisStorage {
    /// Connects to `url` using [`DEFAULT_NAMESPACE`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the URL is invalid or the server
    /// does not answer `PING`.
    pub fn connect(url: &str) -> Result<Self> {
        Self::connect_with_namespace(url, DEFAULT_NAMESPACE)
    }

    /// Connects to `url`, prefixing every key with `namespace`.
    pub fn connect_with_namespace(url: &str, namespace: impl Into<String>) -> Result<Self> {
        let configuration = |e: redis::RedisError| {
            Error::Configuration(format!("could not connect to redis at {url}: {e}"))
        };

        let client = Client::open(url).map_err(configuration)?;
        let mut connection = client
            .get_connection_with_timeout(CONNECT_TIMEOUT)
            .map_err(configuration)?;
        redis::cmd("PING")
            .query::<String>(&mut connection)
            .map_err(configuration)?;

        debug!(url, "connected to redis storage");
        Ok(Self {
            connection: Mutex::new(connection),
            namespace: namespace.into(),
        })
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }
}

impl Storage for RedisStorage {
    fn read(&self, key: &str) -> Result<Option<CacheEntry>, StorageError> {
        let mut con = self.connection.lock().map_err(|_| StorageError::Poisoned)?;
        trace!(key, "redis GET");
        let value: Option<Vec<u8>> = redis::cmd("GET").arg(self.namespaced(key)).query(&mut *con)?;
        value.as_deref().map(CacheEntry::from_bytes).transpose()
    }

    fn write(&self, key: &str, entry: CacheEntry) -> Result<(), StorageError> {
        let bytes = entry.to_bytes()?;
        let mut con = self.connection.lock().map_err(|_| StorageError::Poisoned)?;
        trace!(key, size = bytes.len(), "redis SET");
        redis::cmd("SET")
            .arg(self.namespaced(key))
            .arg(bytes)
            .query::<()>(&mut *con)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), StorageError> {
        let pattern = format!("{}*", self.namespace);
        let mut con = self.connection.lock().map_err(|_| StorageError::Poisoned)?;

        let mut cursor: u64 = 0;
        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query(&mut *con)?;
            if !keys.is_empty() {
                redis::cmd("DEL").arg(&keys).query::<()>(&mut *con)?;
            }
            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!(namespace = %self.namespace, "flushed redis storage");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_url_is_a_configuration_error() {
        let result = RedisStorage::connect("not a redis url");
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn unreachable_server_is_a_configuration_error() {
        // Nothing listens on port 1.
        let result = RedisStorage::connect("redis://127.0.0.1:1/");
        match result {
            Err(Error::Configuration(message)) => assert!(message.contains("127.0.0.1:1")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("connected to a closed port"),
        }
    }
}
