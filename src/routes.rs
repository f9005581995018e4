//! Application routing configuration with middleware stack.
//!
//! # Middleware Stack (applied in order)
//!
//! ```text
//! Request
//!    │
//!    ▼
//! ┌──────────────────┐
//! │   Request ID     │ ← Sets / propagates X-Request-Id
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │     Tracing      │ ← HTTP request/response logging
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │      CORS        │ ← Cross-origin headers
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │  Edge middleware │ ← 307 redirects, rewrites, diagnostic headers
//! └────────┬─────────┘
//!          │
//!          ▼
//!    Router → Handler
//! ```
//!
//! # Route Groups
//!
//! - `/api/*` - JSON cache and middleware checks
//! - `/`, `/{locale}` - Home pages
//! - `/test-cache`, `/{locale}/test-cache`, `/{locale}/test-middleware` - Dashboards

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderName;
use axum::routing::get;
use tower::Layer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers;
use crate::middleware::EdgeLayer;
use crate::state::AppState;

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Build the application router with all routes and middleware configured.
///
/// The edge middleware wraps the fully routed application, so a rewritten
/// URI is routed again. All other layers sit outside it.
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();
    let edge = EdgeLayer::new(state.routing.clone());

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    let cors = build_cors_layer(&config.cors_allowed_origins);

    // =========================================================================
    // Build Router with Routes
    // =========================================================================
    let routes = Router::new()
        // API checks
        .route("/api/ping", get(handlers::ping))
        .route("/api/test-cache", get(handlers::test_cache))
        .route("/api/cache-demo", get(handlers::cache_demo))
        .route("/api/cache-status", get(handlers::cache_status))
        .route(
            "/api/middleware-test",
            get(handlers::middleware_test).post(handlers::middleware_echo),
        )
        // Pages
        .route("/", get(handlers::root_home))
        .route("/test-cache", get(handlers::cache_dashboard))
        .route("/{locale}", get(handlers::locale_home))
        .route("/{locale}/test-cache", get(handlers::locale_cache_dashboard))
        .route(
            "/{locale}/test-middleware",
            get(handlers::middleware_dashboard),
        )
        .with_state(state);

    // =========================================================================
    // Apply Middleware Stack (order matters - applied bottom to top)
    // =========================================================================

    // 1. Edge middleware around the routed app
    let mut router = Router::new().fallback_service(edge.layer(routes));

    // 2. Request body size limit
    info!(
        max_size_kb = config.max_request_body_size / 1024,
        "Request body size limit configured"
    );
    router = router.layer(DefaultBodyLimit::max(config.max_request_body_size));

    // 3. CORS
    router = router.layer(cors);

    // 4. Tracing
    router = router.layer(TraceLayer::new_for_http());

    // 5. Request ID (outermost, so the trace span and response both see it)
    router
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
}

/// Build CORS layer from configuration.
///
/// # Arguments
///
/// * `allowed_origins` - List of allowed origins, or `["*"]` for any origin
///
/// # Security Note
///
/// Using `*` (any origin) is convenient for development but should be
/// avoided in production. Specify explicit origins instead.
fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_any = allowed_origins.iter().any(|o| o == "*");

    if allow_any {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
