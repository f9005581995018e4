use std::net::SocketAddr;
use std::process::ExitCode;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use edge_cache_lab::{AppState, Config, LogFormat, build_router, metrics, utils};

#[tokio::main]
async fn main() -> ExitCode {
    // Configuration is loaded first so the log format can follow LOG_FORMAT
    let config = Config::from_env();
    let (log_level, log_format) = match &config {
        Ok(config) => (config.log_level.as_str(), config.log_format),
        Err(_) => ("info", LogFormat::Text),
    };
    init_tracing(log_level, log_format);

    info!("Starting Edge Cache Lab v{}", env!("CARGO_PKG_VERSION"));

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {e}");
            return ExitCode::from(exitcode::CONFIG as u8);
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::from(exitcode::OK as u8),
        Err(exit_code) => ExitCode::from(exit_code as u8),
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(default_level: &str, format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

/// Run the application, returning an exit code on error.
async fn run(config: Config) -> Result<(), exitcode::ExitCode> {
    info!(
        host = %config.host,
        port = %config.port,
        upstream = %config.upstream_base_url,
        locales = %config.locales.join(","),
        default_locale = %config.default_locale,
        page_revalidate_secs = config.page_revalidate.as_secs(),
        "Configuration loaded"
    );

    // Metrics exporter (optional)
    if let Some(metrics_addr) = config.metrics_addr() {
        metrics::try_init_metrics(metrics_addr);
    }

    // Build application state and router
    let state = AppState::new(config.clone()).map_err(|e| {
        error!("Failed to build application state: {e}");
        exitcode::CONFIG
    })?;
    let app = build_router(state);

    // Start server
    let addr: SocketAddr = config.server_addr().parse().map_err(|e| {
        error!("Invalid server address: {e}");
        exitcode::CONFIG
    })?;
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind to {addr}: {e}");
        exitcode::UNAVAILABLE
    })?;

    info!("Server listening on http://{addr}");
    info!("API endpoints:");
    info!("  GET  /api/ping                  - Cached pong (30s)");
    info!("  GET  /api/test-cache            - ISR check (?revalidate=<secs>)");
    info!("  GET  /api/cache-demo            - Cache modes (?type=<mode>)");
    info!("  GET  /api/cache-status          - Cached-fetch heuristic");
    info!("  GET  /api/middleware-test       - Middleware header echo");
    info!("  POST /api/middleware-test       - Body and x-* header echo");
    info!("Pages:");
    info!("  GET  /{{locale}}                  - Home page");
    info!("  GET  /{{locale}}/test-cache       - Cache dashboard");
    info!("  GET  /{{locale}}/test-middleware  - Middleware dashboard");
    info!("  GET  /test-redirect /test-rewrite - Middleware redirect / rewrite");

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(utils::shutdown_signal())
        .await
        .map_err(|e| {
            error!("Server error: {e}");
            exitcode::SOFTWARE
        })?;

    info!("Server shutdown complete");
    Ok(())
}
