//! The request pipeline: a fixed chain of stages in front of a transport.
//!
//! Stages run outermost first:
//!
//! ```text
//! Logger -> Cache -> Auth -> StatusCheck -> Json -> Transport
//! ```
//!
//! and responses unwind in reverse. The cache sits in front of authentication,
//! status validation and decoding so a fresh hit skips all of them, and the
//! network.

use std::sync::Arc;

use tracing::debug;

use crate::cache::{CacheMiddleware, MemoryStorage, Storage};
use crate::config::Config;
use crate::http::{Request, Response};
use crate::middleware::{JsonMiddleware, LoggerMiddleware, Middleware, Next, StatusCheckMiddleware};
use crate::security::{AuthMiddleware, Credential};
use crate::transport::{HttpTransport, Transport, TransportConfig};
use crate::Result;

/// A composed request pipeline.
///
/// `Pipeline` is `Send + Sync`; share it behind an [`Arc`] to dispatch from
/// several threads. All dispatches through one pipeline share its storage.
///
/// # Examples
///
/// ```rust,no_run
/// use reqchain::{Config, Pipeline, Request};
///
/// fn main() -> reqchain::Result<()> {
///     let pipeline = Pipeline::from_config(&Config::from_env()?)?;
///     let response = pipeline.dispatch(Request::get("https://api.github.com/users/octocat")?)?;
///     println!("{:?}", response.content().as_json());
///     Ok(())
/// }
/// ```
pub struct Pipeline {
    middlewares: Vec<Arc<dyn Middleware>>,
    transport: Arc<dyn Transport>,
    storage: Arc<dyn Storage>,
}

impl Pipeline {
    /// Creates a builder with default settings.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Builds a pipeline from configuration, connecting its storage and
    /// creating an HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`](crate::Error::Configuration) if the
    /// storage backend is unreachable. No request is dispatched in that case.
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage = config.storage.connect()?;
        let mut builder = Pipeline::builder()
            .storage(storage)
            .transport_config(config.transport());
        if let Some(credential) = &config.credential {
            builder = builder.credential(credential.clone());
        }
        builder.build()
    }

    /// Sends `request` through every stage and returns the final response.
    ///
    /// # Errors
    ///
    /// Whatever error the first failing stage raised. Nothing is retried.
    pub fn dispatch(&self, request: Request) -> Result<Response> {
        Next::new(&self.middlewares, self.transport.as_ref()).run(request)
    }

    /// The storage shared by every request through this pipeline.
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }
}

/// Builder for [`Pipeline`].
///
/// The stage order is fixed; the builder only chooses what each stage is
/// wired to.
#[derive(Default)]
pub struct PipelineBuilder {
    storage: Option<Arc<dyn Storage>>,
    credential: Option<Credential>,
    transport: Option<Arc<dyn Transport>>,
    transport_config: TransportConfig,
    allowed_statuses: Option<Vec<u16>>,
}

impl PipelineBuilder {
    /// Storage for the cache stage. Defaults to a fresh [`MemoryStorage`].
    #[must_use]
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Credential for the authentication stage.
    #[must_use]
    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Replaces the network transport. Defaults to [`HttpTransport`].
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Settings for the default [`HttpTransport`]; ignored when a transport is
    /// supplied.
    #[must_use]
    pub fn transport_config(mut self, config: TransportConfig) -> Self {
        self.transport_config = config;
        self
    }

    /// Overrides the status allow-list.
    #[must_use]
    pub fn allowed_statuses(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.allowed_statuses = Some(statuses.into_iter().collect());
        self
    }

    /// Assembles the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`](crate::Error::Transport) if the default
    /// HTTP client cannot be created.
    pub fn build(self) -> Result<Pipeline> {
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStorage::new()));
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(&self.transport_config)?),
        };
        let status_check = match self.allowed_statuses {
            Some(allowed) => StatusCheckMiddleware::with_allowed(allowed),
            None => StatusCheckMiddleware::new(),
        };

        let middlewares: Vec<Arc<dyn Middleware>> = vec![
            Arc::new(LoggerMiddleware),
            Arc::new(CacheMiddleware::new(Arc::clone(&storage))),
            Arc::new(AuthMiddleware::new(self.credential)),
            Arc::new(status_check),
            Arc::new(JsonMiddleware),
        ];

        debug!(storage = storage.name(), stages = middlewares.len(), "pipeline built");
        Ok(Pipeline {
            middlewares,
            transport,
            storage,
        })
    }
}
