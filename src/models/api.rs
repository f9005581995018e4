use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query for `GET /api/test-cache`.
#[derive(Debug, Deserialize)]
pub struct TestCacheQuery {
    /// Revalidation window in seconds (default: 60)
    pub revalidate: Option<String>,
}

/// Query for `GET /api/cache-demo`.
#[derive(Debug, Deserialize)]
pub struct CacheDemoQuery {
    /// Cache mode (`no-cache`, `force-cache`, `revalidate-<n>`)
    #[serde(rename = "type")]
    pub cache_type: Option<String>,
}

/// Response for `GET /api/ping`.
#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub message: &'static str,
}

/// Response for `GET /api/test-cache`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCacheResponse {
    pub message: &'static str,
    pub timestamp: String,
    /// Random per-render value; unchanged while the response is cached
    pub random_data: String,
    pub revalidate_time: String,
    pub external_data: Value,
    pub cache_info: CacheInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheInfo {
    pub description: &'static str,
    pub test_instructions: [&'static str; 4],
}

/// Response for `GET /api/cache-demo`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheDemoResponse {
    pub endpoint: &'static str,
    pub cache_type: String,
    pub cache_config: String,
    pub timestamp: String,
    pub request_id: String,
    pub external_data: Value,
    pub test_instructions: CacheDemoInstructions,
}

/// Expected behavior per cache mode, in display order.
#[derive(Debug, Serialize)]
pub struct CacheDemoInstructions {
    #[serde(rename = "no-cache")]
    pub no_cache: &'static str,
    #[serde(rename = "force-cache")]
    pub force_cache: &'static str,
    #[serde(rename = "revalidate-10")]
    pub revalidate_10: &'static str,
    #[serde(rename = "revalidate-60")]
    pub revalidate_60: &'static str,
    pub default: &'static str,
}

impl Default for CacheDemoInstructions {
    fn default() -> Self {
        Self {
            no_cache: "Should always return fresh data",
            force_cache: "Should return cached data if available",
            revalidate_10: "Should cache for 10 seconds, then revalidate",
            revalidate_60: "Should cache for 60 seconds, then revalidate",
            default: "Should cache for 30 seconds, then revalidate",
        }
    }
}

/// Upstream latency interpretation for `GET /api/cache-status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheStatus {
    LikelyCached,
    LikelyFresh,
    Error,
}

/// Which middleware headers reached the handler.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiddlewareSeen {
    pub processed: bool,
    pub intl_processed: bool,
    pub api_request: bool,
}

/// Response for `GET /api/cache-status`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatusResponse {
    pub message: &'static str,
    pub timestamp: String,
    pub request_id: String,
    pub cache_status: CacheStatus,
    pub external_data: Value,
    pub middleware: MiddlewareSeen,
    pub instructions: [&'static str; 4],
}

/// Response for `GET /api/middleware-test`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiddlewareTestResponse {
    pub message: &'static str,
    pub timestamp: String,
    pub path: String,
    pub method: String,
    pub middleware_headers: BTreeMap<String, String>,
    pub all_request_headers: BTreeMap<String, String>,
    pub test_info: MiddlewareTestInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiddlewareTestInfo {
    pub description: &'static str,
    pub middleware_features: [&'static str; 4],
}

/// Response for `POST /api/middleware-test`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiddlewareEchoResponse {
    pub message: &'static str,
    pub timestamp: String,
    pub received_body: Value,
    pub middleware_headers: BTreeMap<String, String>,
}
