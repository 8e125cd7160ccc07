//! HTTP header map with case-insensitive, unique names.

use serde::{Deserialize, Serialize};

/// A case-insensitive HTTP header map holding at most one value per name.
///
/// Insertion order is preserved. Inserting a name that is already present
/// (in any letter case) replaces the existing value in place, which is the
/// behavior the cache relies on when refreshing `Date` and `ETag`.
///
/// # Examples
///
/// ```
/// use reqchain::http::Headers;
///
/// let mut headers = Headers::new();
/// headers.insert("Cache-Control", "max-age=60");
/// headers.insert("cache-control", "no-store");
///
/// assert_eq!(headers.get("CACHE-CONTROL"), Some("no-store"));
/// assert_eq!(headers.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers {
    inner: Vec<(String, String)>,
}

impl Headers {
    /// Creates an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header, replacing any existing value with the same name.
    ///
    /// The original spelling of the name is kept when replacing.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .inner
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some((_, existing)) => *existing = value,
            None => self.inner.push((name, value)),
        }
    }

    /// Adds a value for `name`, joining it onto an existing value with `", "`.
    ///
    /// Repeated header lines received from the network collapse this way, so
    /// `Cache-Control: no-store` and `Cache-Control: max-age=60` become one
    /// `no-store, max-age=60` value.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .inner
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some((_, existing)) => {
                existing.push_str(", ");
                existing.push_str(&value);
            }
            None => self.inner.push((name, value)),
        }
    }

    /// Returns the value for the given header name (case-insensitive), or `None`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Removes the header with the given name, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self
            .inner
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))?;
        Some(self.inner.remove(pos).1)
    }

    /// Returns `true` if the map contains an entry with the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns an iterator over all `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_get() {
        let mut h = Headers::new();
        h.insert("ETag", "\"abc\"");
        assert_eq!(h.get("etag"), Some("\"abc\""));
        assert_eq!(h.get("ETAG"), Some("\"abc\""));
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut h = Headers::new();
        h.insert("Date", "old");
        h.insert("ETag", "tag");
        h.insert("date", "new");
        let pairs: Vec<_> = h.iter().collect();
        assert_eq!(pairs, vec![("Date", "new"), ("ETag", "tag")]);
    }

    #[test]
    fn append_joins_repeated_lines() {
        let mut h = Headers::new();
        h.append("Cache-Control", "no-store");
        h.append("cache-control", "max-age=60");
        h.append("ETag", "\"abc\"");
        assert_eq!(h.get("Cache-Control"), Some("no-store, max-age=60"));
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn remove() {
        let mut h = Headers::new();
        h.insert("If-None-Match", "x");
        assert_eq!(h.remove("if-none-match").as_deref(), Some("x"));
        assert!(h.is_empty());
        assert!(h.remove("if-none-match").is_none()); // already gone
    }

    #[test]
    fn collect_from_pairs() {
        let h: Headers = [("Authorization", "token abc"), ("Accept", "*/*")]
            .into_iter()
            .collect();
        assert!(h.contains("authorization"));
        assert!(!h.contains("x-missing"));
    }
}
