//! OpenAI-compatible LLM client used by the relay.
//!
//! Two remote operations are exposed through [`services::open_ai_service::OpenAiService`]:
//! text embeddings (`/v1/embeddings`) and non-streaming chat completions
//! (`/v1/chat/completions`). Configs are built from environment variables in
//! [`config::default_config`].

pub mod config {
    pub mod default_config;
    pub mod llm_model_config;
}
pub mod error_handler;
pub mod services {
    pub mod open_ai_service;
}

pub use config::llm_model_config::{ChatMessage, ChatRole, LlmModelConfig};
pub use error_handler::{AiLlmError, ConfigError};
pub use services::open_ai_service::OpenAiService;
