//! # Edge Cache Lab
//!
//! A demonstration service for checking that an edge cache in front of an
//! Axum app honours page-level and API-level caching, featuring:
//!
//! - **ISR headers**: `s-maxage` / `stale-while-revalidate` per route and per query
//! - **Edge middleware**: Locale redirects, a fixed redirect, a fixed rewrite
//! - **Diagnostics**: `x-middleware-*` headers on both request and response
//! - **Dashboards**: Browser pages that fire checks and print the headers
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Axum HTTP Server                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Layers (Request ID → Trace → CORS → Edge middleware)       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Handlers (api, pages) + askama views                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  UpstreamClient (reqwest, best-effort fallbacks)            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  JSON placeholder API (posts, users)                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edge_cache_lab::{AppState, Config, build_router};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let state = AppState::new(config)?;
//!     let app = build_router(state);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Probing
//!
//! ```bash
//! curl -i "http://localhost:3000/api/cache-demo?type=revalidate-10"
//! curl -i http://localhost:3000/test-redirect
//! ```

pub mod cache_mode;
pub mod config;
pub mod error;
pub mod handlers;
pub mod i18n;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod upstream;
pub mod utils;
pub mod views;

// Re-exports for convenience
pub use cache_mode::CacheMode;
pub use config::{Config, LogFormat};
pub use error::{AppError, AppResult};
pub use i18n::LocaleRouting;
pub use routes::build_router;
pub use state::AppState;
pub use upstream::{FetchPolicy, UpstreamClient};
