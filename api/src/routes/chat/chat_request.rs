use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error_handler::AppError;

/// Error text for a missing, blank or non-string `message`.
pub const MESSAGE_REQUIRED: &str = "message is required";

/// Request payload for /chat.
///
/// `message` is kept loosely typed so that a wrong type yields the same
/// 400 as a missing field instead of a serde-specific rejection.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<Value>,
}

impl ChatRequest {
    /// The user's message, verbatim.
    pub fn message(&self) -> Result<&str, AppError> {
        match &self.message {
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(s),
            _ => Err(AppError::BadRequest(MESSAGE_REQUIRED.into())),
        }
    }
}

/// Response payload for /chat.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}
