//! Default LLM configs loaded strictly from environment variables.
//!
//! Two roles are supported, both against an OpenAI-compatible API
//! (OpenRouter unless `LLM_API_BASE` says otherwise):
//!
//! - **Embedding**  → text to vector for similarity search
//! - **Completion** → chat model that writes the reply
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_API_KEY` (or legacy `OPENROUTER_API_KEY`) = bearer token (mandatory)
//! - `LLM_API_BASE`     = API base, default `https://openrouter.ai/api`
//! - `LLM_TIMEOUT_SECS` = optional request timeout (u64)
//! - `LLM_HTTP_REFERER` = optional `HTTP-Referer` attribution header
//! - `LLM_APP_TITLE`    = optional `X-Title` attribution header
//!
//! Per role:
//! - `EMBEDDING_MODEL` = embedding model (mandatory)
//! - `LLM_MODEL`       = completion model (mandatory)

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{
        AiLlmError, ConfigError, env_opt, env_opt_u64, must_env, validate_http_endpoint,
    },
};

/// API base used when `LLM_API_BASE` is not set.
pub const DEFAULT_API_BASE: &str = "https://openrouter.ai/api";

/// Builds the optional attribution headers from explicit values.
///
/// OpenRouter reads `HTTP-Referer` and `X-Title` to attribute traffic to an app;
/// other providers ignore them.
pub fn attribution_headers(
    referer: Option<String>,
    title: Option<String>,
) -> Vec<(String, String)> {
    let mut headers = Vec::with_capacity(2);
    if let Some(r) = referer {
        headers.push(("HTTP-Referer".to_string(), r));
    }
    if let Some(t) = title {
        headers.push(("X-Title".to_string(), t));
    }
    headers
}

/// Resolves the shared parts of every config (endpoint, key, headers, timeout).
fn shared(model: String) -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = env_opt("LLM_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    validate_http_endpoint("LLM_API_BASE", &endpoint)?;

    let api_key = env_opt("LLM_API_KEY")
        .or_else(|| env_opt("OPENROUTER_API_KEY"))
        .ok_or(ConfigError::MissingVar("LLM_API_KEY or OPENROUTER_API_KEY"))?;

    Ok(LlmModelConfig {
        model,
        endpoint,
        api_key,
        extra_headers: attribution_headers(env_opt("LLM_HTTP_REFERER"), env_opt("LLM_APP_TITLE")),
        timeout_secs: env_opt_u64("LLM_TIMEOUT_SECS")?,
    })
}

/// Constructs the config for the **embedding** model.
///
/// # Env
/// - `EMBEDDING_MODEL` (required)
pub fn config_embedding() -> Result<LlmModelConfig, AiLlmError> {
    shared(must_env("EMBEDDING_MODEL")?)
}

/// Constructs the config for the **completion** model.
///
/// # Env
/// - `LLM_MODEL` (required)
pub fn config_completion() -> Result<LlmModelConfig, AiLlmError> {
    shared(must_env("LLM_MODEL")?)
}
