//! HTTP API module for Listpulse
//!
//! Exposes the two timestamp routes: batch writes gated by shared
//! credentials, and public batch reads.

mod auth;
pub mod routes;
pub mod validate;

use crate::config::Config;
use crate::error::{CoreError, Result};
use crate::store::TimestampStore;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Timestamp store backend
    pub store: Arc<dyn TimestampStore>,
    /// Secret gating write requests; unset refuses every write
    pub credentials: Option<String>,
}

/// Fixed prefix on the body of every 500 response
pub(crate) const INTERNAL_ERROR_PREFIX: &str =
    "Service encountered an unknown error during processing:\n";

/// Converts any error escaping a handler into the 500 response.
///
/// This is the only place raw error detail reaches a caller.
impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("{}{}", INTERNAL_ERROR_PREFIX, self),
        )
            .into_response()
    }
}

/// Start the HTTP API server
pub async fn serve(
    addr: SocketAddr,
    store: Arc<dyn TimestampStore>,
    config: &Config,
) -> Result<()> {
    let state = AppState {
        store,
        credentials: config.server.credentials.clone(),
    };

    let app = create_router(state);

    // Check if port is already in use (another listpulse instance running)
    if tokio::net::TcpStream::connect(addr).await.is_ok() {
        tracing::error!(
            "Port {} is already in use — another listpulse instance may be running.",
            addr.port()
        );
        return Err(CoreError::Api(format!(
            "Port {} already in use",
            addr.port()
        )));
    }

    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CoreError::Api(e.to_string()))?;

    Ok(())
}

/// Create the router: the two timestamp routes, everything else resolving to
/// the unknown-route fallback (including other methods on known paths).
pub(crate) fn create_router(state: AppState) -> Router {
    // CORS configuration - allow all origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            routes::SET_TIMESTAMPS_ROUTE,
            post(routes::set_timestamps).fallback(routes::unknown_route),
        )
        .route(
            routes::GET_TIMESTAMPS_ROUTE,
            post(routes::get_timestamps).fallback(routes::unknown_route),
        )
        .fallback(routes::unknown_route)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
