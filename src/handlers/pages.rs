//! Server-rendered HTML pages.
//!
//! # Endpoints
//!
//! - `GET /` - English home page without locale chrome
//! - `GET /{locale}` - Localized home page with render stamp and switcher
//! - `GET /test-cache`, `GET /{locale}/test-cache` - Cache testing dashboard
//! - `GET /{locale}/test-middleware` - Middleware testing dashboard
//!
//! Home pages fetch posts and users concurrently and advertise an
//! `s-maxage` window so the edge cache regenerates them periodically:
//! `PAGE_REVALIDATE_SECS` for localized pages, 300 seconds for the root page.

use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Html;
use tracing::{debug, instrument};

use super::util::cache_control;
use crate::cache_mode::revalidate_header;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::upstream::FetchPolicy;
use crate::views::{
    CacheDashboardTemplate, HomeTemplate, MiddlewareDashboardTemplate, RenderStamp,
    locale_links, render_template,
};

/// Locale of the non-localized root page.
const ROOT_LOCALE: &str = "en";

/// Revalidate window of the non-localized root page.
pub const ROOT_PAGE_REVALIDATE: Duration = Duration::from_secs(300);

fn page_headers(window: Duration) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some((name, value)) = cache_control(&revalidate_header(window.as_secs())) {
        headers.insert(name, value);
    }
    headers
}

fn ensure_locale(state: &AppState, locale: &str) -> AppResult<()> {
    if state.routing.is_supported(locale) {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("Unsupported locale: {locale}")))
    }
}

/// Root home page.
#[instrument(skip(state))]
pub async fn root_home(State(state): State<AppState>) -> AppResult<(HeaderMap, Html<String>)> {
    let data = state
        .upstream
        .fetch_home_data(FetchPolicy::Revalidate(ROOT_PAGE_REVALIDATE))
        .await;
    debug!(posts = data.posts.len(), users = data.users.len(), "Rendering root home page");

    let html = render_template(HomeTemplate::new(ROOT_LOCALE, data))?;
    Ok((page_headers(ROOT_PAGE_REVALIDATE), html))
}

/// Localized home page.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unsupported locale.
#[instrument(skip(state))]
pub async fn locale_home(
    State(state): State<AppState>,
    Path(locale): Path<String>,
) -> AppResult<(HeaderMap, Html<String>)> {
    ensure_locale(&state, &locale)?;

    let window = state.config.page_revalidate;
    let data = state
        .upstream
        .fetch_home_data(FetchPolicy::Revalidate(window))
        .await;
    debug!(locale, posts = data.posts.len(), users = data.users.len(), "Rendering home page");

    let path = format!("/{locale}");
    let template = HomeTemplate::new(&locale, data)
        .with_stamp(RenderStamp::now())
        .with_switcher(locale_links(&state.routing, &path, &locale));

    Ok((page_headers(window), render_template(template)?))
}

/// Cache dashboard at `/test-cache`, reached through the rewrite rule.
#[instrument(skip(state))]
pub async fn cache_dashboard(State(state): State<AppState>) -> AppResult<Html<String>> {
    render_template(CacheDashboardTemplate::new(state.routing.default_locale()))
}

/// Cache dashboard under a locale prefix.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unsupported locale.
#[instrument(skip(state))]
pub async fn locale_cache_dashboard(
    State(state): State<AppState>,
    Path(locale): Path<String>,
) -> AppResult<Html<String>> {
    ensure_locale(&state, &locale)?;
    render_template(CacheDashboardTemplate::new(&locale))
}

/// Middleware dashboard.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unsupported locale.
#[instrument(skip(state))]
pub async fn middleware_dashboard(
    State(state): State<AppState>,
    Path(locale): Path<String>,
) -> AppResult<Html<String>> {
    ensure_locale(&state, &locale)?;

    let path = format!("/{locale}/test-middleware");
    let switcher = locale_links(&state.routing, &path, &locale);
    render_template(MiddlewareDashboardTemplate::new(&locale, switcher))
}
