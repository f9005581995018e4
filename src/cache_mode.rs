//! Cache strategies selectable from query parameters.
//!
//! Each mode pairs the hint sent with the upstream fetch ([`FetchPolicy`])
//! with the literal `Cache-Control` value the route advertises to the edge
//! cache in front of the service.
//!
//! | `type`          | fetch          | `Cache-Control`                        |
//! |-----------------|----------------|----------------------------------------|
//! | `no-cache`      | no-store       | `no-store, no-cache, must-revalidate`  |
//! | `force-cache`   | force-cache    | *(none)*                               |
//! | `revalidate-10` | revalidate 10s | `s-maxage=10, stale-while-revalidate`  |
//! | `revalidate-60` | revalidate 60s | `s-maxage=60, stale-while-revalidate`  |
//! | anything else   | revalidate 30s | *(none)*                               |

use std::time::Duration;

use crate::upstream::FetchPolicy;

/// `Cache-Control` value for `no-cache` mode.
pub const NO_STORE_HEADER: &str = "no-store, no-cache, must-revalidate";

/// Revalidation window used when no mode is selected.
pub const DEFAULT_REVALIDATE_SECS: u64 = 30;

/// Build the ISR header for a revalidation window.
pub fn revalidate_header(seconds: u64) -> String {
    format!("s-maxage={seconds}, stale-while-revalidate")
}

/// Cache strategy requested by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    NoCache,
    ForceCache,
    Revalidate(u64),
    Default,
}

impl CacheMode {
    /// Parse the `type` query parameter. Unknown values select `Default`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("no-cache") => Self::NoCache,
            Some("force-cache") => Self::ForceCache,
            Some(other) => other
                .strip_prefix("revalidate-")
                .and_then(|secs| secs.parse().ok())
                .map_or(Self::Default, Self::Revalidate),
            None => Self::Default,
        }
    }

    /// Hint for the upstream fetch.
    pub fn fetch_policy(self) -> FetchPolicy {
        match self {
            Self::NoCache => FetchPolicy::NoStore,
            Self::ForceCache => FetchPolicy::ForceCache,
            Self::Revalidate(secs) => FetchPolicy::Revalidate(Duration::from_secs(secs)),
            Self::Default => FetchPolicy::Revalidate(Duration::from_secs(DEFAULT_REVALIDATE_SECS)),
        }
    }

    /// Human readable summary echoed in the response body.
    pub fn description(self) -> String {
        match self {
            Self::NoCache => "No caching - always fresh data".to_string(),
            Self::ForceCache => "Force cache - use cached data if available".to_string(),
            Self::Revalidate(secs) => format!("ISR - revalidate every {secs} seconds"),
            Self::Default => format!(
                "Default ISR - revalidate every {DEFAULT_REVALIDATE_SECS} seconds"
            ),
        }
    }

    /// `Cache-Control` header advertised by the route, if any.
    pub fn cache_control(self) -> Option<String> {
        match self {
            Self::NoCache => Some(NO_STORE_HEADER.to_string()),
            Self::Revalidate(secs) => Some(revalidate_header(secs)),
            Self::ForceCache | Self::Default => None,
        }
    }
}
