//! Diagnostic header construction.
//!
//! Turns a [`Classification`] plus the facts captured at request entry into
//! the header map merged into the forwarded request and the response.

use std::time::Duration;

use axum::http::header::{HeaderMap, HeaderName, HeaderValue};
use chrono::{DateTime, SecondsFormat, Utc};

use super::classify::{Classification, RouteAction};

pub const MIDDLEWARE_TIMESTAMP: HeaderName = HeaderName::from_static("x-middleware-timestamp");
pub const MIDDLEWARE_PATH: HeaderName = HeaderName::from_static("x-middleware-path");
pub const MIDDLEWARE_USER_AGENT: HeaderName = HeaderName::from_static("x-middleware-user-agent");
pub const MIDDLEWARE_PROCESSING_TIME: HeaderName =
    HeaderName::from_static("x-middleware-processing-time");
pub const MIDDLEWARE_REWRITE: HeaderName = HeaderName::from_static("x-middleware-rewrite");
pub const API_REQUEST: HeaderName = HeaderName::from_static("x-api-request");
pub const CACHE_TEST: HeaderName = HeaderName::from_static("x-cache-test");
pub const INTL_PROCESSED: HeaderName = HeaderName::from_static("x-intl-processed");
pub const CACHE_TESTING_ROUTE: HeaderName = HeaderName::from_static("x-cache-testing-route");

static TRUE: HeaderValue = HeaderValue::from_static("true");
static UNKNOWN: HeaderValue = HeaderValue::from_static("unknown");

/// Request facts captured once at middleware entry.
#[derive(Debug, Clone)]
pub struct RequestFacts<'a> {
    pub path: &'a str,
    pub user_agent: Option<&'a HeaderValue>,
    pub received_at: DateTime<Utc>,
}

/// Build the diagnostic headers for a classified request.
///
/// Excluded requests get an empty map. `elapsed` is the time spent in the
/// middleware up to the decision and is only reported on test routes.
pub fn diagnostic_headers(
    classification: &Classification,
    facts: &RequestFacts<'_>,
    elapsed: Duration,
) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let flags = classification.flags;

    if flags.excluded {
        return headers;
    }

    insert_text(
        &mut headers,
        MIDDLEWARE_TIMESTAMP,
        &facts
            .received_at
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    );
    insert_text(&mut headers, MIDDLEWARE_PATH, facts.path);
    headers.insert(
        MIDDLEWARE_USER_AGENT,
        facts.user_agent.cloned().unwrap_or_else(|| UNKNOWN.clone()),
    );

    if flags.api_request {
        headers.insert(API_REQUEST, TRUE.clone());
        headers.insert(CACHE_TEST, TRUE.clone());
    }

    if flags.intl_processed {
        headers.insert(INTL_PROCESSED, TRUE.clone());
    }

    if flags.cache_testing_route {
        headers.insert(CACHE_TESTING_ROUTE, TRUE.clone());
        insert_text(
            &mut headers,
            MIDDLEWARE_PROCESSING_TIME,
            &format_processing_time(elapsed),
        );
    }

    if let RouteAction::Rewrite(target) = &classification.action {
        insert_text(&mut headers, MIDDLEWARE_REWRITE, target);
    }

    headers
}

/// Copy every entry of `annotations` into `target`, replacing existing values.
pub fn merge_headers(target: &mut HeaderMap, annotations: &HeaderMap) {
    for (name, value) in annotations {
        target.insert(name.clone(), value.clone());
    }
}

/// Render a duration as whole milliseconds with an `ms` suffix.
pub fn format_processing_time(elapsed: Duration) -> String {
    format!("{}ms", elapsed.as_millis())
}

fn insert_text(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => {
            tracing::debug!(header = %name, "Skipping diagnostic header with invalid value");
        }
    }
}
