//! HTML views rendered with askama.

use askama::Template;
use axum::response::Html;

use crate::error::AppResult;
use crate::i18n::{LocaleRouting, Messages};
use crate::upstream::{HomeData, Post, User};

/// Render a template into an HTML response body.
pub fn render_template<T: Template>(template: T) -> AppResult<Html<String>> {
    Ok(Html(template.render()?))
}

/// One entry of the language switcher.
#[derive(Debug, Clone)]
pub struct LocaleLink {
    pub code: String,
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// Links to the same page in every supported locale.
pub fn locale_links(routing: &LocaleRouting, path: &str, current: &str) -> Vec<LocaleLink> {
    routing
        .locales()
        .iter()
        .map(|code| LocaleLink {
            code: code.clone(),
            label: code.to_uppercase(),
            href: routing.switch_locale_path(path, code),
            active: code == current,
        })
        .collect()
}

/// Render-time stamp shown on localized pages to make cache hits visible.
#[derive(Debug, Clone)]
pub struct RenderStamp {
    pub iso: String,
    pub millis: i64,
}

impl RenderStamp {
    pub fn now() -> Self {
        let now = chrono::Utc::now();
        Self {
            iso: now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            millis: now.timestamp_millis(),
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub lang: String,
    pub messages: &'static Messages,
    pub posts: Vec<Post>,
    pub users: Vec<User>,
    pub stamp: Option<RenderStamp>,
    pub switcher: Vec<LocaleLink>,
}

impl HomeTemplate {
    pub fn new(lang: &str, data: HomeData) -> Self {
        Self {
            lang: lang.to_string(),
            messages: Messages::for_locale(lang),
            posts: data.posts,
            users: data.users,
            stamp: None,
            switcher: Vec::new(),
        }
    }

    pub fn with_stamp(mut self, stamp: RenderStamp) -> Self {
        self.stamp = Some(stamp);
        self
    }

    pub fn with_switcher(mut self, switcher: Vec<LocaleLink>) -> Self {
        self.switcher = switcher;
        self
    }
}

/// A button on one of the dashboards.
#[derive(Debug, Clone)]
pub struct Check {
    pub label: &'static str,
    pub button: &'static str,
    pub url: &'static str,
    /// Open in a new tab instead of fetching (redirect / rewrite checks).
    pub open: bool,
}

impl Check {
    const fn fetch(label: &'static str, button: &'static str, url: &'static str) -> Self {
        Self {
            label,
            button,
            url,
            open: false,
        }
    }

    const fn open(label: &'static str, button: &'static str, url: &'static str) -> Self {
        Self {
            label,
            button,
            url,
            open: true,
        }
    }
}

pub const CACHE_CHECKS: [Check; 6] = [
    Check::fetch("Basic Cache Test", "Test Basic Cache", "/api/test-cache"),
    Check::fetch(
        "Cache (10s revalidate)",
        "Test 10s Revalidate",
        "/api/test-cache?revalidate=10",
    ),
    Check::fetch("No Cache", "Test No Cache", "/api/cache-demo?type=no-cache"),
    Check::fetch("ISR 10s", "Test ISR 10s", "/api/cache-demo?type=revalidate-10"),
    Check::fetch("ISR 60s", "Test ISR 60s", "/api/cache-demo?type=revalidate-60"),
    Check::fetch(
        "Force Cache",
        "Test Force Cache",
        "/api/cache-demo?type=force-cache",
    ),
];

pub const MIDDLEWARE_CHECKS: [Check; 6] = [
    Check::fetch("API Cache Test", "Test API Middleware", "/api/test-cache"),
    Check::fetch("API Cache Demo", "Test Cache Demo API", "/api/cache-demo"),
    Check::fetch("Cache Test Page", "Test Page Middleware", "/test-cache"),
    Check::open("Redirect", "Test Redirect", "/test-redirect"),
    Check::open("Rewrite", "Test Rewrite", "/test-rewrite"),
    Check::fetch("Home Page", "Test Home Page", "/"),
];

#[derive(Template)]
#[template(path = "cache_dashboard.html")]
pub struct CacheDashboardTemplate {
    pub lang: String,
    pub checks: &'static [Check],
}

impl CacheDashboardTemplate {
    pub fn new(lang: &str) -> Self {
        Self {
            lang: lang.to_string(),
            checks: &CACHE_CHECKS,
        }
    }
}

#[derive(Template)]
#[template(path = "middleware_dashboard.html")]
pub struct MiddlewareDashboardTemplate {
    pub lang: String,
    pub checks: &'static [Check],
    pub switcher: Vec<LocaleLink>,
}

impl MiddlewareDashboardTemplate {
    pub fn new(lang: &str, switcher: Vec<LocaleLink>) -> Self {
        Self {
            lang: lang.to_string(),
            checks: &MIDDLEWARE_CHECKS,
            switcher,
        }
    }
}
