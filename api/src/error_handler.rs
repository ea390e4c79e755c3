use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contextor::ContextorError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Body returned for every internal failure, whatever the cause.
pub const GENERIC_ERROR: &str = "Something went wrong";

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("invalid configuration: {0}")]
    Config(String),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / pipeline ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Chat(#[from] ContextorError),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => {
                warn!(reason = %msg, "rejected chat request");
                (StatusCode::BAD_REQUEST, msg.as_str())
            }
            // Embedding, storage and completion failures all look the same to
            // the caller; the stage is only visible in logs.
            AppError::Chat(e) => {
                error!(stage = e.kind(), error = %e, "chat request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR)
            }
            AppError::Config(_) | AppError::Bind(_) | AppError::Server(_) => {
                error!(error = %self, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR)
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Malformed or non-JSON bodies are client errors.
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        warn!(error = %err, "unreadable chat body");
        AppError::BadRequest(crate::routes::chat::chat_request::MESSAGE_REQUIRED.into())
    }
}
