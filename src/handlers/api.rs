//! JSON API routes for cache and middleware checks.
//!
//! # Endpoints
//!
//! - `GET /api/ping` - Static pong, cached 30s at the edge
//! - `GET /api/test-cache` - Upstream post with a caller-chosen revalidate window
//! - `GET /api/cache-demo` - Upstream user under a named cache mode
//! - `GET /api/cache-status` - Guesses whether the upstream fetch was cached
//! - `GET /api/middleware-test` - Echoes headers injected by the edge middleware
//! - `POST /api/middleware-test` - Echoes the body and `x-*` headers
//!
//! Responses carry a fresh timestamp and random id, so repeated calls show
//! whether the edge cache served a stored copy.

use std::time::Duration;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::util::{cache_control, filter_prefixed, header_map, iso_now, short_id};
use crate::cache_mode::{CacheMode, DEFAULT_REVALIDATE_SECS, revalidate_header};
use crate::error::{AppError, AppResult};
use crate::middleware::annotate::{API_REQUEST, INTL_PROCESSED, MIDDLEWARE_TIMESTAMP};
use crate::models::{
    CacheDemoInstructions, CacheDemoQuery, CacheDemoResponse, CacheInfo, CacheStatus,
    CacheStatusResponse, MiddlewareEchoResponse, MiddlewareSeen, MiddlewareTestInfo,
    MiddlewareTestResponse, PingResponse, TestCacheQuery, TestCacheResponse,
};
use crate::state::AppState;
use crate::upstream::FetchPolicy;

/// Revalidate window for `/api/test-cache` when none is given.
const TEST_CACHE_DEFAULT_REVALIDATE: &str = "60";

/// Upstream fetches faster than this are reported as cache hits.
const LIKELY_CACHED_THRESHOLD: Duration = Duration::from_millis(50);

/// Header prefixes reported as middleware headers by `GET /api/middleware-test`.
const MIDDLEWARE_HEADER_PREFIXES: [&str; 4] = ["x-middleware", "x-request", "x-cache", "x-api"];

const X_CACHE_TEST_RESPONSE: HeaderName = HeaderName::from_static("x-cache-test-response");
const X_API_RESPONSE_TIME: HeaderName = HeaderName::from_static("x-api-response-time");
const X_API_PROCESSED: HeaderName = HeaderName::from_static("x-api-processed");

fn with_cache_control(value: Option<String>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some((name, value)) = value.as_deref().and_then(cache_control) {
        headers.insert(name, value);
    }
    headers
}

/// Liveness check that the edge cache may hold for 30 seconds.
#[instrument]
pub async fn ping() -> (HeaderMap, Json<PingResponse>) {
    (
        with_cache_control(Some(revalidate_header(DEFAULT_REVALIDATE_SECS))),
        Json(PingResponse { message: "pong" }),
    )
}

/// Cache test endpoint.
///
/// `?revalidate=<n>` sets both the upstream revalidate hint and the
/// advertised `s-maxage`.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if `revalidate` is not a whole number of
/// seconds.
#[instrument(skip(state))]
pub async fn test_cache(
    State(state): State<AppState>,
    Query(query): Query<TestCacheQuery>,
) -> AppResult<(HeaderMap, Json<TestCacheResponse>)> {
    let raw = query
        .revalidate
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(TEST_CACHE_DEFAULT_REVALIDATE);
    let seconds: u64 = raw.parse().map_err(|_| {
        AppError::BadRequest(format!("revalidate must be a number of seconds, got '{raw}'"))
    })?;

    let timestamp = iso_now();
    let record = state
        .upstream
        .fetch_record(
            "/posts/1",
            FetchPolicy::Revalidate(Duration::from_secs(seconds)),
            "Failed to fetch external data",
        )
        .await;

    let body = TestCacheResponse {
        message: "Cache test endpoint",
        timestamp,
        random_data: short_id(),
        revalidate_time: format!("{seconds} seconds"),
        external_data: record.data,
        cache_info: CacheInfo {
            description: "This response should be cached and revalidated based on the revalidate parameter",
            test_instructions: [
                "1. Call this endpoint multiple times quickly",
                "2. The timestamp and randomData should remain the same (cached)",
                "3. Wait for the revalidate time to pass",
                "4. Call again - you should see updated timestamp and randomData",
            ],
        },
    };

    Ok((with_cache_control(Some(revalidate_header(seconds))), Json(body)))
}

/// Cache strategy demo.
///
/// `?type=` selects a [`CacheMode`]; the echoed `cacheType` is the raw
/// parameter, or `default` when absent.
#[instrument(skip(state))]
pub async fn cache_demo(
    State(state): State<AppState>,
    Query(query): Query<CacheDemoQuery>,
) -> (HeaderMap, Json<CacheDemoResponse>) {
    let cache_type = query
        .cache_type
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "default".to_string());
    let mode = CacheMode::parse(Some(&cache_type));
    debug!(cache_type, ?mode, "Cache demo mode selected");

    let timestamp = iso_now();
    let record = state
        .upstream
        .fetch_record("/users/1", mode.fetch_policy(), "Failed to fetch")
        .await;

    let body = CacheDemoResponse {
        endpoint: "/api/cache-demo",
        cache_type,
        cache_config: mode.description(),
        timestamp,
        request_id: short_id(),
        external_data: record.data,
        test_instructions: CacheDemoInstructions::default(),
    };

    (with_cache_control(mode.cache_control()), Json(body))
}

/// Report whether the upstream fetch looked cached, and which middleware
/// headers reached the handler.
#[instrument(skip(state, headers))]
pub async fn cache_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (HeaderMap, Json<CacheStatusResponse>) {
    let timestamp = iso_now();
    let record = state
        .upstream
        .fetch_record(
            "/posts/1",
            FetchPolicy::Revalidate(Duration::from_secs(DEFAULT_REVALIDATE_SECS)),
            "Failed to fetch",
        )
        .await;

    let cache_status = if !record.ok {
        CacheStatus::Error
    } else if record.elapsed < LIKELY_CACHED_THRESHOLD {
        CacheStatus::LikelyCached
    } else {
        CacheStatus::LikelyFresh
    };
    debug!(?cache_status, elapsed_ms = record.elapsed.as_millis() as u64, "Cache status check");

    let body = CacheStatusResponse {
        message: "Cache status check",
        timestamp,
        request_id: short_id(),
        cache_status,
        external_data: record.data,
        middleware: MiddlewareSeen {
            processed: headers.contains_key(MIDDLEWARE_TIMESTAMP),
            intl_processed: headers.contains_key(INTL_PROCESSED),
            api_request: headers.contains_key(API_REQUEST),
        },
        instructions: [
            "1. Call this endpoint multiple times quickly",
            "2. Check if requestId and timestamp change (should stay same if cached)",
            "3. Wait 30+ seconds and call again to see cache refresh",
            "4. Check middleware headers to ensure they are not interfering",
        ],
    };

    let mut response_headers =
        with_cache_control(Some(revalidate_header(DEFAULT_REVALIDATE_SECS)));
    response_headers.insert(X_CACHE_TEST_RESPONSE, HeaderValue::from_static("true"));

    (response_headers, Json(body))
}

/// Echo what the edge middleware added to the request.
#[instrument(skip(headers))]
pub async fn middleware_test(
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> (HeaderMap, Json<MiddlewareTestResponse>) {
    let timestamp = iso_now();
    let all_request_headers = header_map(&headers);
    let middleware_headers = filter_prefixed(&all_request_headers, &MIDDLEWARE_HEADER_PREFIXES);

    let mut response_headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&timestamp) {
        response_headers.insert(X_API_RESPONSE_TIME, value);
    }
    response_headers.insert(X_API_PROCESSED, HeaderValue::from_static("true"));

    let body = MiddlewareTestResponse {
        message: "Middleware test endpoint",
        timestamp,
        path: uri.path().to_string(),
        method: method.to_string(),
        middleware_headers,
        all_request_headers,
        test_info: MiddlewareTestInfo {
            description: "This endpoint shows how middleware affects API routes",
            middleware_features: [
                "Request logging",
                "Custom header injection",
                "Timing information",
                "Path-specific processing",
            ],
        },
    };

    (response_headers, Json(body))
}

/// Echo a posted JSON body. An empty or malformed body echoes as `{}`.
#[instrument(skip(headers, body), fields(body_len = body.len()))]
pub async fn middleware_echo(headers: HeaderMap, body: Bytes) -> Json<MiddlewareEchoResponse> {
    let received_body = serde_json::from_slice::<Value>(&body).unwrap_or_else(|e| {
        debug!(error = %e, "Body is not JSON, echoing empty object");
        json!({})
    });

    Json(MiddlewareEchoResponse {
        message: "POST request processed through middleware",
        timestamp: iso_now(),
        received_body,
        middleware_headers: filter_prefixed(&header_map(&headers), &["x-"]),
    })
}
