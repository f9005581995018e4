//! Edge middleware layer.
//!
//! Runs in front of every route:
//!
//! 1. Captures the entry instant and wall-clock timestamp
//! 2. Classifies the request (see [`classify`](super::classify))
//! 3. Redirects short-circuit with `307 Temporary Redirect`
//! 4. Rewrites swap the URI path, keep the query, and continue
//! 5. Diagnostic headers are merged into the forwarded request and the response
//!
//! The layer must wrap the whole router rather than be added with
//! `Router::layer`, which runs after routing and would ignore the rewritten
//! URI. `routes::build_router` mounts it as the outer router's fallback.
//!
//! # Client Usage
//!
//! ```bash
//! curl -i http://localhost:3000/test-redirect     # 307, Location: /test-cache
//! curl -i http://localhost:3000/test-rewrite      # 200, cache dashboard
//! curl -i http://localhost:3000/api/ping          # x-api-request: true
//! ```

use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::body::Body;
use axum::http::header::{HeaderValue, LOCATION, USER_AGENT};
use axum::http::{Request, Response, StatusCode, Uri};
use chrono::Utc;
use tower::{Layer, Service};
use tracing::{debug, warn};

use super::annotate::{RequestFacts, diagnostic_headers, merge_headers};
use super::classify::{Classification, RouteAction, classify};
use crate::i18n::LocaleRouting;
use crate::metrics;

/// Edge middleware layer for the Tower stack.
#[derive(Clone)]
pub struct EdgeLayer {
    routing: Arc<LocaleRouting>,
}

impl EdgeLayer {
    pub fn new(routing: Arc<LocaleRouting>) -> Self {
        Self { routing }
    }
}

impl<S> Layer<S> for EdgeLayer {
    type Service = EdgeService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        EdgeService {
            inner,
            routing: self.routing.clone(),
        }
    }
}

/// Edge middleware service wrapper.
#[derive(Clone)]
pub struct EdgeService<S> {
    inner: S,
    routing: Arc<LocaleRouting>,
}

impl<S> Service<Request<Body>> for EdgeService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let started = Instant::now();
        let received_at = Utc::now();

        let path = req.uri().path().to_string();
        let classification = classify(req.method(), &path, &self.routing);

        let annotations = {
            let facts = RequestFacts {
                path: &path,
                user_agent: req.headers().get(USER_AGENT),
                received_at,
            };
            diagnostic_headers(&classification, &facts, started.elapsed())
        };

        if !classification.flags.excluded {
            debug!(
                method = %req.method(),
                path = %path,
                action = classification.action.label(),
                "Edge middleware decision"
            );
            metrics::record_middleware_decision(classification.action.label());
        }

        // Clone-and-swap so the service that was polled ready is the one called
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let Classification { action, .. } = classification;

        Box::pin(async move {
            match action {
                RouteAction::Redirect(target) => {
                    let location = with_query(&target, req.uri());
                    let mut response = redirect_response(&location);
                    merge_headers(response.headers_mut(), &annotations);
                    Ok(response)
                }
                RouteAction::Rewrite(target) => {
                    match rewrite_uri(req.uri(), &target) {
                        Some(uri) => *req.uri_mut() = uri,
                        None => warn!(target = %target, "Rewrite target is not a valid URI"),
                    }
                    merge_headers(req.headers_mut(), &annotations);
                    let mut response = inner.call(req).await?;
                    merge_headers(response.headers_mut(), &annotations);
                    Ok(response)
                }
                RouteAction::PassThrough => {
                    merge_headers(req.headers_mut(), &annotations);
                    let mut response = inner.call(req).await?;
                    merge_headers(response.headers_mut(), &annotations);
                    Ok(response)
                }
            }
        })
    }
}

/// Append the original query string, if any, to a redirect target.
fn with_query(target: &str, original: &Uri) -> String {
    match original.query() {
        Some(query) if !query.is_empty() => format!("{target}?{query}"),
        _ => target.to_string(),
    }
}

/// Replace the path of `original` with `target`, keeping its query.
fn rewrite_uri(original: &Uri, target: &str) -> Option<Uri> {
    let mut parts = original.clone().into_parts();
    parts.path_and_query = Some(with_query(target, original).parse().ok()?);
    Uri::from_parts(parts).ok()
}

fn redirect_response(location: &str) -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::TEMPORARY_REDIRECT;
    match HeaderValue::from_str(location) {
        Ok(value) => {
            response.headers_mut().insert(LOCATION, value);
        }
        Err(_) => {
            warn!(location, "Redirect target is not a valid header value");
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        }
    }
    response
}
