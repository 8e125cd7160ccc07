//! Tests against a live Redis server.
//!
//! Ignored by default. Run with a server available:
//!
//! ```text
//! REDIS_URL=redis://127.0.0.1/ cargo test --test redis_storage -- --ignored
//! ```

use std::sync::Arc;

use chrono::Utc;
use reqchain::cache::policy::format_http_date;
use reqchain::cache::{CacheEntry, RedisStorage, Storage};
use reqchain::transport::TransportError;
use reqchain::{CacheStatus, Pipeline, Request, Response, StatusCode};

fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".to_owned())
}

fn storage(namespace: &str) -> RedisStorage {
    let storage = RedisStorage::connect_with_namespace(&redis_url(), namespace).unwrap();
    storage.flush().unwrap();
    storage
}

fn cached_user() -> Response {
    Response::new(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Cache-Control", "max-age=60")
        .header("Date", format_http_date(Utc::now()))
        .header("ETag", "\"abc\"")
        .body(r#"{"login":"octocat"}"#)
}

#[test]
#[ignore = "requires a Redis server"]
fn write_then_read_returns_entry() {
    let storage = storage("reqchain-test-rw:");
    let key = "https://api.github.com/users/octocat";

    assert!(storage.read(key).unwrap().is_none());
    storage.write(key, CacheEntry::new(key, cached_user())).unwrap();

    let entry = storage.read(key).unwrap().unwrap();
    assert_eq!(entry.key(), key);
    assert_eq!(entry.response().etag(), Some("\"abc\""));
}

#[test]
#[ignore = "requires a Redis server"]
fn flush_only_clears_own_namespace() {
    let ours = storage("reqchain-test-ours:");
    let theirs = storage("reqchain-test-theirs:");
    let key = "https://api.github.com/users/octocat";

    ours.write(key, CacheEntry::new(key, cached_user())).unwrap();
    theirs.write(key, CacheEntry::new(key, cached_user())).unwrap();
    ours.flush().unwrap();

    assert!(ours.read(key).unwrap().is_none());
    assert!(theirs.read(key).unwrap().is_some());
    theirs.flush().unwrap();
}

#[test]
#[ignore = "requires a Redis server"]
fn pipelines_share_entries_through_redis() {
    let namespace = "reqchain-test-shared:";
    let url = "https://api.github.com/users/octocat";
    storage(namespace);

    let warm = Pipeline::builder()
        .storage(Arc::new(RedisStorage::connect_with_namespace(&redis_url(), namespace).unwrap()))
        .transport(Arc::new(|_: &Request| -> Result<Response, TransportError> { Ok(cached_user()) }))
        .build()
        .unwrap();
    warm.dispatch(Request::get(url).unwrap()).unwrap();

    let cold = Pipeline::builder()
        .storage(Arc::new(RedisStorage::connect_with_namespace(&redis_url(), namespace).unwrap()))
        .transport(Arc::new(|_: &Request| -> Result<Response, TransportError> {
            panic!("second pipeline must not reach the network")
        }))
        .build()
        .unwrap();
    let response = cold.dispatch(Request::get(url).unwrap()).unwrap();

    assert_eq!(response.cache_status(), CacheStatus::Hit);
    cold.storage().flush().unwrap();
}
