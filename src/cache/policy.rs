//! Freshness, storability and `304` merge rules.
//!
//! Everything here is a pure function of a stored response and the current
//! time, so staleness is re-derived on every read and never persisted.

use chrono::{DateTime, NaiveDateTime, Utc};

use super::{CacheControl, CacheEntry};
use crate::http::Response;

/// What a lookup found for a request key.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Nothing stored.
    Miss,
    /// Stored and within `max-age`: serve without contacting the origin.
    Fresh(CacheEntry),
    /// Stored with `no-cache`/`must-validate`: always ask the origin.
    MustRevalidate(CacheEntry),
    /// Stored but expired, or freshness cannot be computed.
    Stale(CacheEntry),
}

impl Lookup {
    /// Classifies a storage read at instant `now`.
    ///
    /// Mandatory revalidation wins over freshness.
    pub fn classify(entry: Option<CacheEntry>, now: DateTime<Utc>) -> Self {
        let Some(entry) = entry else {
            return Lookup::Miss;
        };

        let control = entry
            .response()
            .cache_control()
            .map(CacheControl::parse)
            .unwrap_or_default();

        if control.must_revalidate {
            Lookup::MustRevalidate(entry)
        } else if is_fresh(entry.response(), now) {
            Lookup::Fresh(entry)
        } else {
            Lookup::Stale(entry)
        }
    }
}

/// Obsolete HTTP-date layouts recipients still have to accept: RFC 850 and
/// asctime.
const OBSOLETE_DATE_FORMATS: [&str; 2] = ["%A, %d-%b-%y %H:%M:%S GMT", "%a %b %e %H:%M:%S %Y"];

/// Parses an HTTP-date.
///
/// Accepts the preferred `Sun, 06 Nov 1994 08:49:37 GMT` form as well as
/// `Sunday, 06-Nov-94 08:49:37 GMT` and `Sun Nov  6 08:49:37 1994`.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Some(date.with_timezone(&Utc));
    }

    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    OBSOLETE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&collapsed, format).ok())
        .map(|naive| naive.and_utc())
}

/// Formats an instant as an HTTP-date.
pub fn format_http_date(date: DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Whole seconds elapsed since the response's `Date`, rounded down.
///
/// `None` when the response has no parsable `Date`.
pub fn age(response: &Response, now: DateTime<Utc>) -> Option<i64> {
    let date = parse_http_date(response.date()?)?;
    Some((now - date).num_milliseconds().div_euclid(1000))
}

/// `true` when both `Date` and `max-age` are known and `age < max-age`.
pub fn is_fresh(response: &Response, now: DateTime<Utc>) -> bool {
    let max_age = response
        .cache_control()
        .and_then(|value| CacheControl::parse(value).max_age);

    match (age(response, now), max_age) {
        (Some(age), Some(max_age)) => i128::from(age) < i128::from(max_age),
        _ => false,
    }
}

/// `true` for a `GET` response carrying `Cache-Control` without `no-store`.
pub fn is_storable(response: &Response) -> bool {
    response.originating_method().is_cacheable()
        && response
            .cache_control()
            .is_some_and(|value| !CacheControl::parse(value).no_store)
}

/// Folds a `304 Not Modified` into the stored response.
///
/// The stored status, body and headers are kept. `Date` is taken from the
/// revalidation reply, and `ETag` too when the reply carries one.
pub fn merge_not_modified(stored: Response, not_modified: &Response) -> Response {
    let mut merged = stored;
    if let Some(date) = not_modified.date() {
        merged.headers_mut().insert("Date", date);
    }
    if let Some(etag) = not_modified.etag() {
        merged.headers_mut().insert("ETag", etag);
    }
    merged
}
