//! Pipeline configuration.
//!
//! A [`Config`] can be deserialized from any serde format or assembled from
//! the process environment with [`Config::from_env`]:
//!
//! | Variable                     | Meaning                          | Default              |
//! |------------------------------|----------------------------------|----------------------|
//! | `GITHUB_TOKEN`               | API token (`token <T>` scheme)   | *(none)*             |
//! | `REQCHAIN_CACHE`             | `memory` or `redis`              | `memory`             |
//! | `REDIS_URL`                  | Redis server for `redis` caching | `redis://127.0.0.1/` |
//! | `REQCHAIN_HTTP_TIMEOUT_SECS` | Whole-request timeout            | `30`                 |
//! | `REQCHAIN_USER_AGENT`        | `User-Agent` header              | `reqchain/<version>` |

use std::env;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::cache::{DEFAULT_NAMESPACE, MemoryStorage, RedisStorage, Storage};
use crate::security::Credential;
use crate::transport::TransportConfig;
use crate::{Error, Result};

const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1/";

/// Which storage backend the cache uses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// A fresh in-process map owned by one pipeline.
    #[default]
    Memory,
    /// A Redis server shared by every pipeline and process pointing at it.
    Redis {
        url: String,
        #[serde(default = "default_namespace")]
        namespace: String,
    },
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_owned()
}

impl StorageConfig {
    /// Opens the configured backend.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if a Redis server cannot be reached.
    pub fn connect(&self) -> Result<Arc<dyn Storage>> {
        let storage: Arc<dyn Storage> = match self {
            StorageConfig::Memory => Arc::new(MemoryStorage::new()),
            StorageConfig::Redis { url, namespace } => {
                Arc::new(RedisStorage::connect_with_namespace(url, namespace.as_str())?)
            }
        };
        Ok(storage)
    }
}

/// Everything needed to build a [`Pipeline`](crate::Pipeline).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub credential: Option<Credential>,
    pub storage: StorageConfig,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credential: None,
            storage: StorageConfig::Memory,
            timeout_secs: 30,
            user_agent: None,
        }
    }
}

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for an unknown cache backend or a
    /// non-numeric timeout.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Config {
            credential: lookup("GITHUB_TOKEN")
                .filter(|token| !token.is_empty())
                .map(Credential::Token),
            user_agent: lookup("REQCHAIN_USER_AGENT"),
            ..Config::default()
        };

        config.storage = match lookup("REQCHAIN_CACHE").as_deref() {
            None | Some("memory") => StorageConfig::Memory,
            Some("redis") => StorageConfig::Redis {
                url: lookup("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_owned()),
                namespace: default_namespace(),
            },
            Some(other) => {
                return Err(Error::Configuration(format!(
                    "unknown cache backend {other:?}, expected \"memory\" or \"redis\""
                )));
            }
        };

        if let Some(raw) = lookup("REQCHAIN_HTTP_TIMEOUT_SECS") {
            config.timeout_secs = raw.parse().map_err(|_| {
                Error::Configuration(format!("REQCHAIN_HTTP_TIMEOUT_SECS is not a number: {raw:?}"))
            })?;
        }

        Ok(config)
    }

    /// Transport settings derived from this configuration.
    pub fn transport(&self) -> TransportConfig {
        let mut transport = TransportConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            ..TransportConfig::default()
        };
        if let Some(agent) = &self.user_agent {
            transport.user_agent = agent.clone();
        }
        transport
    }
}
