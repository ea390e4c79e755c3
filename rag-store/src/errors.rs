//! Unified error types for the crate.

use ai_llm_service::AiLlmError;
use thiserror::Error;

/// Top-level error for rag-store operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// The query text could not be turned into a vector.
    #[error("embedding error: {0}")]
    Embedding(#[from] AiLlmError),

    /// The document store is unreachable or rejected the query
    /// (e.g. vector dimension mismatch).
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),
}
