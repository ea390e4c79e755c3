//! HTTP surface of the relay: a single `POST /chat` route.

pub mod core {
    pub mod app_state;
}
pub mod error_handler;
mod routes;

use std::sync::Arc;

use axum::{Router, routing::post};
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

pub use crate::core::app_state::AppState;
pub use crate::error_handler::{AppError, AppResult, GENERIC_ERROR};

use crate::routes::chat::chat_route::chat;

/// Default port when neither `API_ADDRESS` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 5000;

/// Builds the application router around the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Resolves the listen address: `API_ADDRESS` if set, else `0.0.0.0:{PORT}`.
///
/// # Errors
/// Returns [`AppError::Config`] when `PORT` is not a valid port number.
pub fn listen_address() -> AppResult<String> {
    if let Ok(addr) = std::env::var("API_ADDRESS") {
        if !addr.trim().is_empty() {
            return Ok(addr.trim().to_string());
        }
    }
    let port = match std::env::var("PORT") {
        Ok(p) if !p.trim().is_empty() => p
            .trim()
            .parse::<u16>()
            .map_err(|_| AppError::Config(format!("PORT must be a port number, got `{p}`")))?,
        _ => DEFAULT_PORT,
    };
    Ok(format!("0.0.0.0:{port}"))
}

/// Binds `addr` and serves until Ctrl+C / SIGTERM.
pub async fn start(addr: &str, state: AppState) -> AppResult<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(AppError::Bind)?;

    info!(addr = %addr, "RAG relay listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C (or SIGTERM on unix) is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
