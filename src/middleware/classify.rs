//! Request path classification.
//!
//! Decides, from the method and path alone, whether a request passes
//! through, is redirected, or is rewritten internally, and which diagnostic
//! flags apply. Rules are evaluated in order:
//!
//! 1. Static assets are excluded entirely.
//! 2. `/api/*` skips locale handling and is flagged as an API request.
//! 3. A trailing slash is stripped with a redirect (`/en/` → `/en`).
//! 4. `/test-redirect` redirects to `/test-cache`.
//! 5. `/test-rewrite` is rewritten to `/test-cache`.
//! 6. Any other path without a supported locale prefix is redirected to the
//!    same path under the default locale.
//! 7. Everything else passes through.
//!
//! Classification is total: every path yields a decision.

use axum::http::Method;

use crate::i18n::LocaleRouting;

/// Path that triggers the fixed redirect.
pub const REDIRECT_TRIGGER_PATH: &str = "/test-redirect";

/// Path that triggers the fixed rewrite.
pub const REWRITE_TRIGGER_PATH: &str = "/test-rewrite";

/// Target of both the redirect and the rewrite.
pub const CACHE_TEST_PATH: &str = "/test-cache";

/// Prefix of API routes.
pub const API_PREFIX: &str = "/api/";

/// Substrings marking the test routes that get timing headers.
const TEST_ROUTE_MARKERS: [&str; 2] = ["/test-cache", "/test-middleware"];

const ASSET_PREFIXES: [&str; 2] = ["/static/", "/assets/"];
const ASSET_EXTENSIONS: [&str; 6] = [".svg", ".png", ".jpg", ".jpeg", ".gif", ".webp"];

/// What the middleware does with the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    /// Forward to the router unchanged.
    PassThrough,
    /// Answer with a redirect to the target path.
    Redirect(String),
    /// Serve the target path while keeping the external URL.
    Rewrite(String),
}

impl RouteAction {
    /// Short label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PassThrough => "pass_through",
            Self::Redirect(_) => "redirect",
            Self::Rewrite(_) => "rewrite",
        }
    }
}

/// Diagnostic flags attached to a decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteFlags {
    /// Excluded from the middleware; no headers at all.
    pub excluded: bool,
    /// Path is under `/api/`.
    pub api_request: bool,
    /// Response is the locale redirect.
    pub intl_processed: bool,
    /// Path is one of the cache / middleware test routes.
    pub cache_testing_route: bool,
}

/// Result of classifying a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub action: RouteAction,
    pub flags: RouteFlags,
}

impl Classification {
    fn pass_through(flags: RouteFlags) -> Self {
        Self {
            action: RouteAction::PassThrough,
            flags,
        }
    }
}

/// Classify a request by method and path.
///
/// The method never changes the outcome; it is accepted so the contract
/// stays explicit that redirects apply to every method.
pub fn classify(_method: &Method, path: &str, routing: &LocaleRouting) -> Classification {
    if is_asset_path(path) {
        return Classification::pass_through(RouteFlags {
            excluded: true,
            ..RouteFlags::default()
        });
    }

    let mut flags = RouteFlags {
        cache_testing_route: is_test_route(path),
        ..RouteFlags::default()
    };

    if path.starts_with(API_PREFIX) {
        flags.api_request = true;
        return Classification::pass_through(flags);
    }

    if let Some(target) = strip_trailing_slash(path) {
        return Classification {
            action: RouteAction::Redirect(target),
            flags,
        };
    }

    if path == REDIRECT_TRIGGER_PATH {
        return Classification {
            action: RouteAction::Redirect(CACHE_TEST_PATH.to_string()),
            flags,
        };
    }

    if path == REWRITE_TRIGGER_PATH {
        return Classification {
            action: RouteAction::Rewrite(CACHE_TEST_PATH.to_string()),
            flags,
        };
    }

    if let Some(target) = routing.redirect_target(path) {
        flags.intl_processed = true;
        return Classification {
            action: RouteAction::Redirect(target),
            flags,
        };
    }

    Classification::pass_through(flags)
}

/// Whether the path is a static asset the middleware never touches.
pub fn is_asset_path(path: &str) -> bool {
    if path == "/favicon.ico" || ASSET_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return true;
    }

    let lower = path.to_ascii_lowercase();
    ASSET_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Canonical form of a path ending in `/`, other than the root itself.
fn strip_trailing_slash(path: &str) -> Option<String> {
    if path.len() <= 1 || !path.ends_with('/') {
        return None;
    }
    match path.trim_end_matches('/') {
        "" => Some("/".to_string()),
        trimmed => Some(trimmed.to_string()),
    }
}

fn is_test_route(path: &str) -> bool {
    TEST_ROUTE_MARKERS.iter().any(|m| path.contains(m))
}
