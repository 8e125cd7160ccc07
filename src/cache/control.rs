//! `Cache-Control` directive parsing.

use std::sync::LazyLock;

use regex::Regex;

static MAX_AGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)max-age=(\d+)").expect("max-age pattern is valid")
});

/// Tokens that force a conditional request even for a fresh entry.
///
/// `non-cache` is a misspelling some producers emit for `no-cache`; it is
/// honored so those entries are never served unchecked.
const REVALIDATE_TOKENS: [&str; 3] = ["no-cache", "must-validate", "non-cache"];

/// The subset of `Cache-Control` the cache acts on.
///
/// # Examples
///
/// ```
/// use reqchain::cache::CacheControl;
///
/// let cc = CacheControl::parse("public max-age=60");
/// assert_eq!(cc.max_age, Some(60));
/// assert!(!cc.no_store);
///
/// let cc = CacheControl::parse("private, no-cache");
/// assert!(cc.must_revalidate);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheControl {
    /// Seconds the response stays fresh after its `Date`.
    pub max_age: Option<u64>,
    /// The response must never be written to storage.
    pub no_store: bool,
    /// A stored copy must be revalidated before every use.
    pub must_revalidate: bool,
}

impl CacheControl {
    /// Parses a `Cache-Control` header value.
    ///
    /// Directives may be separated by commas, whitespace, or both, and are
    /// matched case-insensitively. Unknown directives are ignored.
    pub fn parse(value: &str) -> Self {
        let mut control = CacheControl {
            max_age: MAX_AGE
                .captures(value)
                .and_then(|caps| caps[1].parse().ok()),
            ..CacheControl::default()
        };

        for token in value
            .split(|c: char| c == ',' || c.is_ascii_whitespace())
            .filter(|t| !t.is_empty())
        {
            let token = token.to_ascii_lowercase();
            if token == "no-store" {
                control.no_store = true;
            } else if REVALIDATE_TOKENS.contains(&token.as_str()) {
                control.must_revalidate = true;
            }
        }

        control
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_age_anywhere_in_header() {
        assert_eq!(CacheControl::parse("max-age=300").max_age, Some(300));
        assert_eq!(CacheControl::parse("public, max-age=60, s-maxage=60").max_age, Some(60));
        assert_eq!(CacheControl::parse("Max-Age=5").max_age, Some(5));
        assert_eq!(CacheControl::parse("public").max_age, None);
    }

    #[test]
    fn oversized_max_age_is_ignored() {
        assert_eq!(
            CacheControl::parse("max-age=99999999999999999999999").max_age,
            None
        );
    }

    #[test]
    fn revalidation_tokens() {
        for value in ["no-cache", "must-validate", "non-cache", "private, NO-CACHE"] {
            assert!(CacheControl::parse(value).must_revalidate, "{value}");
        }
        assert!(!CacheControl::parse("must-revalidate-later").must_revalidate);
        assert!(!CacheControl::parse("max-age=60").must_revalidate);
    }

    #[test]
    fn no_store_is_a_whole_token() {
        assert!(CacheControl::parse("no-store").no_store);
        assert!(CacheControl::parse("private,no-store").no_store);
        assert!(!CacheControl::parse("no-storage").no_store);
    }
}
