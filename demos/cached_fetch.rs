//! Fetches the same GitHub user twice and shows the second call served from the cache.
//!
//! ```text
//! RUST_LOG=reqchain=debug cargo run --example cached_fetch
//! GITHUB_TOKEN=ghp_... REQCHAIN_CACHE=redis cargo run --example cached_fetch
//! ```

use reqchain::{Config, Pipeline, Request};
use tracing_subscriber::EnvFilter;

const USER_URL: &str = "https://api.github.com/users/octocat";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let pipeline = Pipeline::from_config(&config)?;
    println!("cache backend: {}", pipeline.storage().name());

    for attempt in 1..=2 {
        let response = pipeline.dispatch(Request::get(USER_URL)?)?;
        let user = response.content().as_json();
        println!(
            "#{attempt}: {} [{}{}] login={} public_repos={}",
            response.status(),
            response.cache_status(),
            if response.cache_status().is_cached() { ", body from cache" } else { "" },
            user.and_then(|u| u["login"].as_str()).unwrap_or("?"),
            user.and_then(|u| u["public_repos"].as_u64()).unwrap_or_default(),
        );
    }

    Ok(())
}
