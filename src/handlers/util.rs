//! Shared utilities for handlers.

use std::collections::BTreeMap;

use axum::http::HeaderMap;
use axum::http::header::{CACHE_CONTROL, HeaderName, HeaderValue};
use chrono::{SecondsFormat, Utc};
use rand::Rng;
use tracing::warn;

/// Length of generated check identifiers.
const SHORT_ID_LEN: usize = 6;

/// Current time as an RFC 3339 string with millisecond precision.
pub fn iso_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Short lowercase base-36 identifier.
///
/// Used for `requestId` / `randomData` so a cached response can be told
/// apart from a freshly rendered one.
pub fn short_id() -> String {
    let mut rng = rand::rng();
    (0..SHORT_ID_LEN)
        .filter_map(|_| char::from_digit(rng.random_range(0..36), 36))
        .collect()
}

/// Collect headers into a name → value map.
///
/// Repeated headers are joined with `", "`; values that are not visible
/// ASCII are skipped.
pub fn header_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let Ok(value) = value.to_str() else {
            continue;
        };
        map.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    map
}

/// Keep only entries whose name starts with one of `prefixes`.
pub fn filter_prefixed(
    headers: &BTreeMap<String, String>,
    prefixes: &[&str],
) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter(|(name, _)| prefixes.iter().any(|p| name.starts_with(p)))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Build a `Cache-Control` header pair.
pub fn cache_control(value: &str) -> Option<(HeaderName, HeaderValue)> {
    match HeaderValue::from_str(value) {
        Ok(value) => Some((CACHE_CONTROL, value)),
        Err(e) => {
            warn!(value, error = %e, "Invalid Cache-Control value, omitting header");
            None
        }
    }
}
