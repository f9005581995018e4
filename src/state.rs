//! Shared application state for Axum handlers.
//!
//! State is built once at startup and never mutated afterwards; every field
//! is either `Arc`-shared or internally reference counted, so cloning per
//! request is cheap.

use std::sync::Arc;

use crate::config::Config;
use crate::error::AppResult;
use crate::i18n::LocaleRouting;
use crate::upstream::UpstreamClient;

/// Shared application state for Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Client for the JSON placeholder API
    pub upstream: UpstreamClient,
    /// Supported locales and default
    pub routing: Arc<LocaleRouting>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Build state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the locale table is inconsistent or the upstream
    /// HTTP client cannot be created.
    pub fn new(config: Config) -> AppResult<Self> {
        let routing = LocaleRouting::new(config.locales.clone(), config.default_locale.clone())?;
        let upstream = UpstreamClient::new(&config.upstream_base_url, config.upstream_timeout)?;

        Ok(Self {
            upstream,
            routing: Arc::new(routing),
            config: Arc::new(config),
        })
    }
}
