//! End-to-end tests for the edge cache lab.
//!
//! Each fixture starts a mock JSON placeholder API and the application on
//! ephemeral ports. Redirects are not followed, so 307 responses can be
//! inspected directly.
//!
//! Run with: `cargo test --test integration_tests`
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::header::CACHE_CONTROL;
use axum::http::{HeaderMap, StatusCode as UpstreamStatus};
use axum::routing::get;
use axum::{Json, Router};
use reqwest::{Client, StatusCode, redirect};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use edge_cache_lab::{AppState, Config, build_router};

/// `Cache-Control` hints seen by the mock upstream, in arrival order.
type SeenHints = Arc<Mutex<Vec<(String, Option<String>)>>>;

fn post(id: u32) -> Value {
    json!({
        "id": id,
        "userId": 1,
        "title": format!("Mock post {id}"),
        "body": "mock body",
    })
}

fn user(id: u32) -> Value {
    json!({
        "id": id,
        "name": format!("Mock User {id}"),
        "email": format!("user{id}@example.com"),
        "website": format!("user{id}.example.com"),
        "phone": "ignored",
    })
}

fn record_hint(seen: &SeenHints, path: &str, headers: &HeaderMap) {
    let hint = headers
        .get(CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    seen.lock().unwrap().push((path.to_string(), hint));
}

/// Mock of the JSON placeholder API.
fn mock_upstream(seen: SeenHints) -> Router {
    Router::new()
        .route(
            "/posts",
            get(|State(seen): State<SeenHints>, headers: HeaderMap| async move {
                record_hint(&seen, "/posts", &headers);
                // More than the home page limit; the client truncates
                Json(Value::Array((1..=10).map(post).collect()))
            }),
        )
        .route(
            "/users",
            get(|State(seen): State<SeenHints>, headers: HeaderMap| async move {
                record_hint(&seen, "/users", &headers);
                Json(Value::Array((1..=10).map(user).collect()))
            }),
        )
        .route(
            "/posts/{id}",
            get(
                |State(seen): State<SeenHints>, Path(id): Path<u32>, headers: HeaderMap| async move {
                    record_hint(&seen, "/posts/{id}", &headers);
                    Json(post(id))
                },
            ),
        )
        .route(
            "/users/{id}",
            get(
                |State(seen): State<SeenHints>, Path(id): Path<u32>, headers: HeaderMap| async move {
                    record_hint(&seen, "/users/{id}", &headers);
                    Json(user(id))
                },
            ),
        )
        .with_state(seen)
}

/// Upstream that answers, but never usefully: error statuses and a
/// body that is not JSON.
fn failing_upstream() -> Router {
    Router::new()
        .route(
            "/posts",
            get(|| async { (UpstreamStatus::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route(
            "/posts/{id}",
            get(|| async { (UpstreamStatus::NOT_FOUND, Json(json!({}))) }),
        )
        .route("/users", get(|| async { "<html>not json</html>" }))
        .route(
            "/users/{id}",
            get(|| async { (UpstreamStatus::SERVICE_UNAVAILABLE, "down") }),
        )
}

async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to ephemeral port");
    let addr = listener.local_addr().expect("Failed to get local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });
    format!("http://{addr}")
}

/// Test fixture running the app against a mock or unreachable upstream.
struct TestFixture {
    base_url: String,
    client: Client,
    seen: SeenHints,
}

impl TestFixture {
    async fn new() -> Self {
        let seen = SeenHints::default();
        let upstream_url = spawn(mock_upstream(seen.clone())).await;
        Self::with_upstream(upstream_url, seen).await
    }

    /// App whose upstream refuses connections.
    async fn unreachable() -> Self {
        // Port 9 (discard) is assumed closed on test hosts
        Self::with_upstream("http://127.0.0.1:9".to_string(), SeenHints::default()).await
    }

    /// App whose upstream answers with error statuses or malformed bodies.
    async fn failing() -> Self {
        let upstream_url = spawn(failing_upstream()).await;
        Self::with_upstream(upstream_url, SeenHints::default()).await
    }

    async fn with_upstream(upstream_base_url: String, seen: SeenHints) -> Self {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            upstream_base_url,
            upstream_timeout: Duration::from_secs(2),
            log_level: "warn".to_string(),
            ..Config::default()
        };
        let state = AppState::new(config).expect("Failed to build state");
        let base_url = spawn(build_router(state)).await;

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            client,
            seen,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    fn hints_for(&self, path: &str) -> Vec<Option<String>> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, hint)| hint.clone())
            .collect()
    }
}

fn header<'a>(response: &'a reqwest::Response, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

// =============================================================================
// Middleware: redirects and rewrites
// =============================================================================

#[tokio::test]
async fn test_api_routes_never_locale_redirect() {
    let fixture = TestFixture::new().await;

    for path in [
        "/api/ping",
        "/api/test-cache",
        "/api/cache-demo",
        "/api/cache-status",
        "/api/middleware-test",
    ] {
        let response = fixture.get(path).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        assert_eq!(header(&response, "x-api-request"), Some("true"), "{path}");
        assert_eq!(header(&response, "x-cache-test"), Some("true"), "{path}");
        assert_eq!(header(&response, "x-intl-processed"), None, "{path}");
    }
}

#[tokio::test]
async fn test_fixed_redirect_for_every_method() {
    let fixture = TestFixture::new().await;

    for method in [reqwest::Method::GET, reqwest::Method::POST, reqwest::Method::PUT] {
        let response = fixture
            .client
            .request(method.clone(), fixture.url("/test-redirect"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{method}");
        assert_eq!(header(&response, "location"), Some("/test-cache"), "{method}");
    }
}

#[tokio::test]
async fn test_rewrite_keeps_url_and_serves_dashboard() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/test-rewrite").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.url().path(), "/test-rewrite");
    assert_eq!(header(&response, "x-middleware-rewrite"), Some("/test-cache"));

    let body = response.text().await.unwrap();
    assert!(body.contains("Cache Testing Dashboard"));
}

#[tokio::test]
async fn test_unprefixed_paths_redirect_to_default_locale() {
    let fixture = TestFixture::new().await;

    for (path, expected) in [
        ("/", "/en"),
        ("/test-cache", "/en/test-cache"),
        ("/test-middleware?tab=headers", "/en/test-middleware?tab=headers"),
    ] {
        let response = fixture.get(path).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{path}");
        assert_eq!(header(&response, "location"), Some(expected), "{path}");
        assert_eq!(header(&response, "x-intl-processed"), Some("true"), "{path}");
    }
}

#[tokio::test]
async fn test_prefixed_paths_pass_through() {
    let fixture = TestFixture::new().await;

    for path in ["/en/test-cache", "/zh/test-middleware"] {
        let response = fixture.get(path).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        assert_eq!(header(&response, "x-cache-testing-route"), Some("true"));
        assert!(
            header(&response, "x-middleware-processing-time")
                .is_some_and(|v| v.ends_with("ms"))
        );
    }
}

#[tokio::test]
async fn test_request_id_on_every_response() {
    let fixture = TestFixture::new().await;

    for path in ["/api/ping", "/test-redirect", "/en"] {
        let response = fixture.get(path).await;
        assert!(response.headers().contains_key("x-request-id"), "{path}");
    }
}

// =============================================================================
// Cache headers
// =============================================================================

#[tokio::test]
async fn test_cache_demo_headers_per_mode() {
    let fixture = TestFixture::new().await;

    let cases = [
        ("no-cache", Some("no-store, no-cache, must-revalidate")),
        ("revalidate-10", Some("s-maxage=10, stale-while-revalidate")),
        ("revalidate-60", Some("s-maxage=60, stale-while-revalidate")),
        ("force-cache", None),
        ("whatever", None),
    ];

    for (mode, expected) in cases {
        let response = fixture.get(&format!("/api/cache-demo?type={mode}")).await;
        assert_eq!(response.status(), StatusCode::OK, "{mode}");
        assert_eq!(header(&response, "cache-control"), expected, "{mode}");

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["cacheType"], mode);
        assert_eq!(body["endpoint"], "/api/cache-demo");
        assert_eq!(body["externalData"]["name"], "Mock User 1");
    }
}

#[tokio::test]
async fn test_cache_demo_forwards_fetch_hint() {
    let fixture = TestFixture::new().await;

    fixture.get("/api/cache-demo?type=no-cache").await;
    fixture.get("/api/cache-demo?type=revalidate-10").await;
    fixture.get("/api/cache-demo").await;

    assert_eq!(
        fixture.hints_for("/users/{id}"),
        vec![
            Some("no-store".to_string()),
            Some("max-age=10".to_string()),
            Some("max-age=30".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_cache_demo_default_type() {
    let fixture = TestFixture::new().await;

    let body: Value = fixture.get("/api/cache-demo").await.json().await.unwrap();
    assert_eq!(body["cacheType"], "default");
    assert_eq!(body["cacheConfig"], "Default ISR - revalidate every 30 seconds");
    assert_eq!(
        body["testInstructions"]["revalidate-10"],
        "Should cache for 10 seconds, then revalidate"
    );
}

#[tokio::test]
async fn test_test_cache_uses_revalidate_param() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/test-cache?revalidate=15").await;
    assert_eq!(
        header(&response, "cache-control"),
        Some("s-maxage=15, stale-while-revalidate")
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["revalidateTime"], "15 seconds");
    assert_eq!(body["externalData"]["id"], 1);

    let response = fixture.get("/api/test-cache").await;
    assert_eq!(
        header(&response, "cache-control"),
        Some("s-maxage=60, stale-while-revalidate")
    );
}

#[tokio::test]
async fn test_test_cache_rejects_non_numeric_revalidate() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/test-cache?revalidate=later").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_cache_status_reports_middleware() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/cache-status").await;
    assert_eq!(header(&response, "x-cache-test-response"), Some("true"));
    assert_eq!(
        header(&response, "cache-control"),
        Some("s-maxage=30, stale-while-revalidate")
    );

    let body: Value = response.json().await.unwrap();
    assert!(matches!(
        body["cacheStatus"].as_str(),
        Some("likely-cached" | "likely-fresh")
    ));
    assert_eq!(body["middleware"]["processed"], true);
    assert_eq!(body["middleware"]["apiRequest"], true);
    assert_eq!(body["middleware"]["intlProcessed"], false);
}

#[tokio::test]
async fn test_ping() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/ping").await;
    assert_eq!(
        header(&response, "cache-control"),
        Some("s-maxage=30, stale-while-revalidate")
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "message": "pong" }));
}

// =============================================================================
// Middleware echo
// =============================================================================

#[tokio::test]
async fn test_middleware_test_echoes_injected_headers() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .client
        .get(fixture.url("/api/middleware-test"))
        .header("user-agent", "edge-lab-test")
        .send()
        .await
        .unwrap();
    assert_eq!(header(&response, "x-api-processed"), Some("true"));
    assert!(response.headers().contains_key("x-api-response-time"));

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["path"], "/api/middleware-test");
    assert_eq!(body["method"], "GET");
    let seen = &body["middlewareHeaders"];
    assert_eq!(seen["x-api-request"], "true");
    assert_eq!(seen["x-middleware-path"], "/api/middleware-test");
    assert_eq!(seen["x-middleware-user-agent"], "edge-lab-test");
    assert!(seen["x-request-id"].is_string());
    assert_eq!(body["allRequestHeaders"]["user-agent"], "edge-lab-test");
}

#[tokio::test]
async fn test_middleware_post_echo() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .client
        .post(fixture.url("/api/middleware-test"))
        .header("x-custom", "42")
        .json(&json!({ "hello": "edge" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "POST request processed through middleware");
    assert_eq!(body["receivedBody"], json!({ "hello": "edge" }));
    assert_eq!(body["middlewareHeaders"]["x-custom"], "42");
    assert_eq!(body["middlewareHeaders"]["x-api-request"], "true");

    let response = fixture
        .client
        .post(fixture.url("/api/middleware-test"))
        .body("not json")
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["receivedBody"], json!({}));
}

// =============================================================================
// Pages
// =============================================================================

#[tokio::test]
async fn test_localized_home_renders_upstream_data() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/en").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "cache-control"),
        Some("s-maxage=60, stale-while-revalidate")
    );

    let body = response.text().await.unwrap();
    assert!(body.contains("Mock post 5"));
    assert!(!body.contains("Mock post 6"));
    assert!(body.contains("Mock User 3"));
    assert!(!body.contains("Mock User 4"));
    assert!(body.contains("href=\"/zh\""));

    assert_eq!(
        fixture.hints_for("/posts"),
        vec![Some("max-age=60".to_string())]
    );
}

#[tokio::test]
async fn test_chinese_home_page() {
    let fixture = TestFixture::new().await;

    let body = fixture.get("/zh").await.text().await.unwrap();
    assert!(body.contains("lang=\"zh\""));
    assert!(body.contains("最新文章"));
}

#[tokio::test]
async fn test_unreachable_upstream_still_renders() {
    let fixture = TestFixture::unreachable().await;

    let response = fixture.get("/en").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Latest Posts"));
    assert!(!body.contains("Post ID:"));

    let body: Value = fixture
        .get("/api/test-cache")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(
        body["externalData"],
        json!({ "error": "Failed to fetch external data" })
    );

    let body: Value = fixture
        .get("/api/cache-status")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["cacheStatus"], "error");
    assert_eq!(body["externalData"], json!({ "error": "Failed to fetch" }));
}

#[tokio::test]
async fn test_error_status_and_bad_body_degrade() {
    let fixture = TestFixture::failing().await;

    let response = fixture.get("/en").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Latest Posts"));
    assert!(!body.contains("Post ID:"));
    assert!(!body.contains("not json"));

    let response = fixture.get("/api/test-cache").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["externalData"],
        json!({ "error": "Failed to fetch external data" })
    );

    let body: Value = fixture
        .get("/api/cache-status")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["cacheStatus"], "error");
    assert_eq!(body["externalData"], json!({ "error": "Failed to fetch" }));

    let body: Value = fixture
        .get("/api/cache-demo?type=no-cache")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["externalData"], json!({ "error": "Failed to fetch" }));
}

#[tokio::test]
async fn test_trailing_slash_redirects_then_renders() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/en/?ref=nav").await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(header(&response, "location"), Some("/en?ref=nav"));

    let response = fixture.get("/en?ref=nav").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = fixture.get("/zh/test-middleware/").await;
    assert_eq!(header(&response, "location"), Some("/zh/test-middleware"));
}

#[tokio::test]
async fn test_static_assets_bypass_middleware() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/favicon.ico").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(!response.headers().contains_key("x-middleware-timestamp"));
}
