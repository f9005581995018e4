//! Client for the external JSON placeholder API.
//!
//! Every fetch carries a [`FetchPolicy`], forwarded as a request
//! `Cache-Control` hint so an intermediate HTTP cache can honour it. No
//! response is cached here.
//!
//! # Failure Policy
//!
//! Fetch failures never propagate to page rendering:
//!
//! - list fetches ([`UpstreamClient::fetch_posts`], [`UpstreamClient::fetch_users`])
//!   degrade to an empty list
//! - record fetches ([`UpstreamClient::fetch_record`]) degrade to
//!   `{ "error": "<message>" }`
//!
//! There are no retries.

mod models;

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{CACHE_CONTROL, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

use crate::error::{AppError, AppResult};
use crate::metrics;

pub use models::{HomeData, Post, User};

/// Number of posts shown on the home page.
pub const HOME_POST_LIMIT: usize = 5;

/// Number of users shown on the home page.
pub const HOME_USER_LIMIT: usize = 3;

/// Cache hint attached to an upstream fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPolicy {
    /// Always go to the origin.
    NoStore,
    /// Accept any cached copy.
    ForceCache,
    /// Accept a cached copy younger than the window.
    Revalidate(Duration),
}

impl FetchPolicy {
    /// Request `Cache-Control` value for this policy.
    pub fn request_hint(self) -> String {
        match self {
            Self::NoStore => "no-store".to_string(),
            Self::ForceCache => "max-stale".to_string(),
            Self::Revalidate(window) => format!("max-age={}", window.as_secs()),
        }
    }
}

/// A record fetched for an API route, with how long the fetch took.
#[derive(Debug, Clone)]
pub struct TimedRecord {
    pub data: Value,
    pub elapsed: Duration,
    pub ok: bool,
}

/// Shared upstream client. Cheap to clone.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Arc<str>,
}

impl UpstreamClient {
    /// Create a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Upstream` if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch and decode `path` (relative to the base URL).
    ///
    /// # Errors
    ///
    /// - `AppError::Upstream` on transport or decode failure
    /// - `AppError::UpstreamStatus` on a non-2xx status
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        policy: FetchPolicy,
    ) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let started = Instant::now();
        let result = self.get_json(&url, policy).await;

        let outcome = if result.is_ok() { "success" } else { "error" };
        metrics::record_upstream_fetch(resource_label(path), outcome, started.elapsed());
        debug!(url = %url, outcome, elapsed_ms = started.elapsed().as_millis() as u64, "Upstream fetch");

        result
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, policy: FetchPolicy) -> AppResult<T> {
        let mut request = self.http.get(url);
        if let Ok(value) = HeaderValue::from_str(&policy.request_hint()) {
            request = request.header(CACHE_CONTROL, value);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.json::<T>().await?)
    }

    /// Fetch up to `limit` posts; empty on failure.
    pub async fn fetch_posts(&self, limit: usize, policy: FetchPolicy) -> Vec<Post> {
        self.fetch_list("/posts", limit, policy).await
    }

    /// Fetch up to `limit` users; empty on failure.
    pub async fn fetch_users(&self, limit: usize, policy: FetchPolicy) -> Vec<User> {
        self.fetch_list("/users", limit, policy).await
    }

    /// Fetch posts and users concurrently.
    ///
    /// The two fetches are independent; either side falling back to an
    /// empty list does not affect the other.
    pub async fn fetch_home_data(&self, policy: FetchPolicy) -> HomeData {
        let (posts, users) = tokio::join!(
            self.fetch_posts(HOME_POST_LIMIT, policy),
            self.fetch_users(HOME_USER_LIMIT, policy),
        );
        HomeData { posts, users }
    }

    /// Fetch a single record as raw JSON, timing the call.
    ///
    /// Failure yields `{ "error": <message> }` with `ok == false`.
    pub async fn fetch_record(
        &self,
        path: &str,
        policy: FetchPolicy,
        error_message: &str,
    ) -> TimedRecord {
        let started = Instant::now();
        match self.fetch_json::<Value>(path, policy).await {
            Ok(data) => TimedRecord {
                data,
                elapsed: started.elapsed(),
                ok: true,
            },
            Err(e) => {
                warn!(path, error = %e, "Upstream record fetch failed, using placeholder");
                metrics::record_fallback(resource_label(path));
                TimedRecord {
                    data: json!({ "error": error_message }),
                    elapsed: started.elapsed(),
                    ok: false,
                }
            }
        }
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        resource: &str,
        limit: usize,
        policy: FetchPolicy,
    ) -> Vec<T> {
        let path = format!("{resource}?_limit={limit}");
        match self.fetch_json::<Vec<T>>(&path, policy).await {
            Ok(mut items) => {
                items.truncate(limit);
                items
            }
            Err(e) => {
                warn!(resource, error = %e, "Upstream list fetch failed, rendering empty list");
                metrics::record_fallback(resource_label(resource));
                Vec::new()
            }
        }
    }
}

/// Collapse a request path to its first segment for metric labels.
fn resource_label(path: &str) -> String {
    path.trim_start_matches('/')
        .split(['/', '?'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("root")
        .to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_hints() {
        assert_eq!(FetchPolicy::NoStore.request_hint(), "no-store");
        assert_eq!(FetchPolicy::ForceCache.request_hint(), "max-stale");
        assert_eq!(
            FetchPolicy::Revalidate(Duration::from_secs(60)).request_hint(),
            "max-age=60"
        );
    }

    #[test]
    fn test_resource_label() {
        assert_eq!(resource_label("/posts?_limit=5"), "posts");
        assert_eq!(resource_label("/users/1"), "users");
        assert_eq!(resource_label("/"), "root");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = UpstreamClient::new("http://127.0.0.1:9/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9");
    }

    #[tokio::test]
    async fn test_unreachable_upstream_degrades() {
        // Port 9 (discard) is assumed closed on test hosts
        let client =
            UpstreamClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();

        let home = client.fetch_home_data(FetchPolicy::Revalidate(Duration::from_secs(30))).await;
        assert!(home.posts.is_empty());
        assert!(home.users.is_empty());

        let record = client
            .fetch_record("/posts/1", FetchPolicy::NoStore, "Failed to fetch")
            .await;
        assert!(!record.ok);
        assert_eq!(record.data, json!({ "error": "Failed to fetch" }));
    }
}
