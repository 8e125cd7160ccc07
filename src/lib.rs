//! # reqchain
//!
//! A synchronous HTTP client pipeline for JSON APIs, with response caching.
//!
//! Every request passes through a fixed chain of stages before it reaches the
//! network: logging, caching, authentication, status validation and JSON
//! decoding. The cache honors `max-age`, revalidates with `If-None-Match`, and
//! can live in process memory or in Redis.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reqchain::{Config, Pipeline, Request};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = Pipeline::from_config(&Config::from_env()?)?;
//!
//!     let user = pipeline.dispatch(Request::get("https://api.github.com/users/octocat")?)?;
//!     println!("{} {:?}", user.status(), user.content().as_json());
//!
//!     // Served from the cache while the first response is fresh.
//!     let again = pipeline.dispatch(Request::get("https://api.github.com/users/octocat")?)?;
//!     println!("cache: {}", again.cache_status());
//!     Ok(())
//! }
//! ```

// ── Pipeline and its stages ──────────────────────────────────────────────────
pub mod cache;
pub mod middleware;
pub mod pipeline;
pub mod security;

// ── Wire types and the network edge ──────────────────────────────────────────
pub mod http;
pub mod transport;

// ── Configuration and errors ─────────────────────────────────────────────────
pub mod config;
pub mod error;

#[cfg(test)]
mod testing;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use config::Config;
pub use error::{Error, Result};
pub use http::{Body, CacheStatus, Headers, Method, Request, Response, StatusCode};
pub use pipeline::{Pipeline, PipelineBuilder};
