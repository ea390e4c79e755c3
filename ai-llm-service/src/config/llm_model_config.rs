use serde::Serialize;

/// Configuration for one OpenAI-compatible model invocation.
///
/// The relay keeps two of these: one for the embedding model and one for the
/// completion model. Both usually point at the same endpoint and key.
///
/// # Fields
///
/// - `model`: The model identifier (e.g., `"openai/text-embedding-3-small"`).
/// - `endpoint`: API base without the `/v1/...` suffix (e.g., `"https://openrouter.ai/api"`).
/// - `api_key`: Bearer token sent with every request.
/// - `extra_headers`: Additional default headers (e.g., OpenRouter's
///   `HTTP-Referer` and `X-Title` attribution).
/// - `timeout_secs`: Optional request timeout; `None` keeps the transport default.
///
/// # Examples
///
/// ```
/// use ai_llm_service::LlmModelConfig;
///
/// let cfg = LlmModelConfig {
///     model: "openai/gpt-4o-mini".to_string(),
///     endpoint: "https://openrouter.ai/api".to_string(),
///     api_key: "sk-or-...".to_string(),
///     extra_headers: vec![("X-Title".into(), "Docs Chatbot".into())],
///     timeout_secs: None,
/// };
/// assert!(cfg.timeout_secs.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmModelConfig {
    /// Model identifier string.
    pub model: String,

    /// API base URL.
    pub endpoint: String,

    /// API key for bearer authentication.
    pub api_key: String,

    /// Extra default headers as `(name, value)` pairs.
    pub extra_headers: Vec<(String, String)>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One entry of the `messages` array sent to `/v1/chat/completions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}
