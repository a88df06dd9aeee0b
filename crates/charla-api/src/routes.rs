//! Router setup with all API routes and middleware.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::rate_limit::{limit_requests, RequestLimiter};
use crate::state::AppState;

/// Request envelopes are small; session attributes dominate their size.
const MAX_BODY_BYTES: usize = 256 * 1024;

const MAX_REQUESTS_PER_SEC: u64 = 50;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    create_router_with_limit(state, MAX_REQUESTS_PER_SEC)
}

/// Same as [`create_router`] with an explicit per-second cap on `/skill`.
pub fn create_router_with_limit(state: AppState, max_per_sec: u64) -> Router {
    let limiter = RequestLimiter::per_second(max_per_sec);

    let skill_routes = Router::new()
        .route("/skill", post(handlers::skill))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn_with_state(limiter, limit_requests));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(skill_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server on the configured address and serve until Ctrl-C.
pub async fn start_server(
    config: &charla_core::config::CharlaConfig,
    state: AppState,
) -> Result<(), charla_core::CharlaError> {
    let addr = format!("{}:{}", config.general.host, config.general.port);

    let router = create_router(state);

    tracing::info!("Starting skill server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| charla_core::CharlaError::Server(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| charla_core::CharlaError::Server(format!("Server error: {}", e)))?;

    tracing::info!("Skill server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
