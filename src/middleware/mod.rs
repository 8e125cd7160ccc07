//! Middleware pipeline: composable before/after logic around the transport.
//!
//! This module defines the core types for building an ordered middleware stack.
//! Each middleware wraps the next layer, enabling request decoration,
//! short-circuit responses (a cache hit), and response post-processing without
//! coupling stages to each other.
//!
//! ## Core types
//!
//! - [`Middleware`]: trait implemented by every stage.
//! - [`Next`]: cursor into the remaining chain; call [`Next::run`] to advance
//!   to the next layer, and eventually to the [`Transport`].
//! - [`LoggerMiddleware`]: request/response logger.
//! - [`StatusCheckMiddleware`]: status allow-list.
//! - [`JsonMiddleware`]: JSON body decoding.

use std::sync::Arc;
use std::time::Instant;

use crate::Result;
use crate::http::{Request, Response};
use crate::transport::Transport;

mod json;
mod status;

pub use json::JsonMiddleware;
pub use status::{DEFAULT_ALLOWED_STATUSES, StatusCheckMiddleware};

/// A cursor into the remaining middleware chain for a single request.
///
/// `Next` is passed to each middleware's [`Middleware::handle`]
/// implementation. Calling [`Next::run`] invokes the next middleware, or the
/// transport once the chain is exhausted.
///
/// `Next` is consumed by [`run`](Self::run), so a middleware can forward a
/// request at most once.
///
/// # Examples
///
/// ```rust
/// use reqchain::{Request, Response, Result};
/// use reqchain::middleware::{Middleware, Next};
///
/// struct PassThrough;
///
/// impl Middleware for PassThrough {
///     fn handle(&self, request: Request, next: Next<'_>) -> Result<Response> {
///         next.run(request)
///     }
/// }
/// ```
pub struct Next<'a> {
    middlewares: &'a [Arc<dyn Middleware>],
    transport: &'a dyn Transport,
}

impl<'a> Next<'a> {
    /// Creates a `Next` positioned at the start of `middlewares`, ending at
    /// `transport`.
    pub fn new(middlewares: &'a [Arc<dyn Middleware>], transport: &'a dyn Transport) -> Self {
        Self {
            middlewares,
            transport,
        }
    }

    /// Invokes the next middleware in the chain and returns its result.
    ///
    /// When no middleware remains the request is handed to the transport.
    pub fn run(self, request: Request) -> Result<Response> {
        match self.middlewares.split_first() {
            Some((head, rest)) => head.handle(
                request,
                Next {
                    middlewares: rest,
                    transport: self.transport,
                },
            ),
            None => Ok(self.transport.send(&request)?),
        }
    }
}

/// The core trait for all pipeline stages.
///
/// Implementors receive the outgoing [`Request`] and a [`Next`] cursor. They
/// may:
///
/// - **Pass through**: call `next.run(request)` without modification.
/// - **Short-circuit**: return a [`Response`] without calling `next`.
/// - **Decorate**: modify the request before forwarding, or inspect and
///   rewrite the response on the way back.
/// - **Fail**: return an error, which aborts the whole dispatch.
///
/// Implementations must be `Send + Sync`: one pipeline serves concurrent
/// callers from many threads.
pub trait Middleware: Send + Sync {
    /// Handle the request and optionally delegate to the next middleware.
    fn handle(&self, request: Request, next: Next<'_>) -> Result<Response>;
}

/// Logs each request's method, URL, status, duration, and cache status.
///
/// Emits a single `tracing::info!` record after the downstream chain
/// completes, or a `tracing::warn!` record if it failed. The outcome is
/// returned untouched.
pub struct LoggerMiddleware;

impl Middleware for LoggerMiddleware {
    fn handle(&self, request: Request, next: Next<'_>) -> Result<Response> {
        let start = Instant::now();
        let method = request.method().clone();
        let url = request.url().to_string();

        let result = next.run(request);
        let elapsed = start.elapsed();

        match &result {
            Ok(response) => tracing::info!(
                method = %method,
                url = %url,
                status = response.status().as_u16(),
                cache = %response.cache_status(),
                elapsed_ms = elapsed.as_millis() as u64,
                "-> {} {} {} ({:.3} s)",
                url,
                method,
                response.status().as_u16(),
                elapsed.as_secs_f64(),
            ),
            Err(error) => tracing::warn!(
                method = %method,
                url = %url,
                error = %error,
                elapsed_ms = elapsed.as_millis() as u64,
                "-> {} {} failed ({:.3} s)",
                url,
                method,
                elapsed.as_secs_f64(),
            ),
        }

        result
    }
}
