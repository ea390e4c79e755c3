//! OpenAI-compatible service for chat completions and embeddings.
//!
//! Minimal, non-streaming client around the OpenAI REST API shape, which
//! OpenRouter and most gateways also speak. Endpoints are derived from
//! `LlmModelConfig::endpoint`:
//! - POST {endpoint}/v1/chat/completions — chat completion (non-streaming)
//! - POST {endpoint}/v1/embeddings       — embeddings retrieval
//!
//! Constructor validation:
//! - `cfg.model` and `cfg.api_key` must be non-empty
//! - `cfg.endpoint` must start with http:// or https://
//! - every extra header must be a valid header name/value
//!
//! Errors are normalized via unified error types in `error_handler`.

use std::time::{Duration, Instant};

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, error, info};

use crate::{
    config::llm_model_config::{ChatMessage, LlmModelConfig},
    error_handler::{AiLlmError, ConfigError, make_snippet, validate_http_endpoint},
};

/// Thin client for an OpenAI-compatible API.
///
/// Constructed from a complete [`LlmModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (with default headers and optional timeout),
/// so one instance should be shared for the lifetime of the process.
///
/// High-level operations:
/// - [`OpenAiService::chat`]       — single, non-streaming chat completion
/// - [`OpenAiService::embeddings`] — single embeddings vector retrieval
#[derive(Debug)]
pub struct OpenAiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
    url_embeddings: String,
}

impl OpenAiService {
    /// Creates a new [`OpenAiService`] from the given config.
    ///
    /// # Errors
    /// - [`AiLlmError::Config`] if the model, key, endpoint or an extra header is invalid
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }
        if cfg.api_key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey.into());
        }
        let endpoint = cfg.endpoint.trim();
        validate_http_endpoint("endpoint", endpoint)?;

        let headers = default_headers(&cfg)?;

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = cfg.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_chat = format!("{base}/v1/chat/completions");
        let url_embeddings = format!("{base}/v1/embeddings");

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            extra_headers = cfg.extra_headers.len(),
            timeout_secs = ?cfg.timeout_secs,
            "OpenAiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
            url_embeddings,
        })
    }

    /// Model identifier this client sends with every request.
    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Performs a **non-streaming** chat completion request (`/v1/chat/completions`).
    ///
    /// `messages` are sent as-is, in order.
    ///
    /// # Errors
    /// - [`AiLlmError::HttpStatus`] for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client/network failures
    /// - [`AiLlmError::Decode`] if the JSON cannot be parsed
    /// - [`AiLlmError::EmptyData`] if there is no `choices[0].message.content`
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = ChatCompletionRequest {
            model: &self.cfg.model,
            messages,
        };

        debug!(
            model = %self.cfg.model,
            messages = messages.len(),
            "POST {}", self.url_chat
        );

        let out: ChatCompletionResponse = self
            .post_json(&self.url_chat, &body, "expected `choices[0].message.content`")
            .await?;

        let content = out
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                error!(
                    model = %self.cfg.model,
                    latency_ms = started.elapsed().as_millis(),
                    "chat completion response has no `choices[0].message.content`"
                );
                AiLlmError::EmptyData("choices[0].message.content")
            })?;

        info!(
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            reply_len = content.len(),
            "chat completion completed"
        );

        Ok(content)
    }

    /// Retrieves a single embeddings vector via `/v1/embeddings`.
    ///
    /// # Errors
    /// - [`AiLlmError::HttpStatus`] for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client/network failures
    /// - [`AiLlmError::Decode`] if the JSON cannot be parsed
    /// - [`AiLlmError::EmptyData`] if `data` is empty
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let started = Instant::now();
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            input,
        };

        debug!(
            model = %self.cfg.model,
            input_len = input.len(),
            "POST {}", self.url_embeddings
        );

        let out: EmbeddingsResponse = self
            .post_json(&self.url_embeddings, &body, "expected `data[0].embedding`")
            .await?;

        let first = out.data.into_iter().next().ok_or_else(|| {
            error!(
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "embeddings response has empty `data`"
            );
            AiLlmError::EmptyData("data[0].embedding")
        })?;

        info!(
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            dim = first.embedding.len(),
            "embeddings completed"
        );

        Ok(first.embedding)
    }

    /// Sends `body` to `url` and decodes a JSON response, logging enough of a
    /// failure (status + body snippet, or the decode error) to tell the cases apart.
    async fn post_json<B, T>(&self, url: &str, body: &B, expected: &str) -> Result<T, AiLlmError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let started = Instant::now();

        let resp = match self.client.post(url).json(body).send().await {
            Ok(r) => r,
            Err(e) => {
                error!(error = %e, %url, model = %self.cfg.model, "request failed at transport level");
                return Err(e.into());
            }
        };

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "upstream returned non-success status"
            );

            return Err(AiLlmError::HttpStatus {
                status,
                url: url.to_string(),
                snippet,
            });
        }

        let text = resp.text().await?;
        serde_json::from_str::<T>(&text).map_err(|e| {
            error!(
                error = %e,
                %url,
                snippet = %make_snippet(&text),
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "failed to decode upstream response"
            );
            AiLlmError::Decode(format!("serde error: {e}; {expected}"))
        })
    }
}

/// Authorization, content type and any configured extra headers.
fn default_headers(cfg: &LlmModelConfig) -> Result<HeaderMap, AiLlmError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cfg.api_key.trim())).map_err(|e| {
            ConfigError::InvalidFormat {
                var: "api_key",
                reason: format!("not a valid header value: {e}"),
            }
        })?,
    );
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    for (name, value) in &cfg.extra_headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            ConfigError::InvalidFormat {
                var: "extra_headers",
                reason: format!("invalid header name `{name}`: {e}"),
            }
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidFormat {
            var: "extra_headers",
            reason: format!("invalid value for `{name}`: {e}"),
        })?;
        headers.insert(name, value);
    }

    Ok(headers)
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Request body for `/v1/chat/completions` (non-streaming).
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

/// Minimal response for `/v1/chat/completions`.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}

/// Request body for `/v1/embeddings`.
#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

/// Response body for `/v1/embeddings`.
#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    /// Serves `app` on an ephemeral local port and returns its base URL.
    async fn spawn_stub(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn cfg(endpoint: &str) -> LlmModelConfig {
        LlmModelConfig {
            model: "test-model".into(),
            endpoint: endpoint.into(),
            api_key: "test-key".into(),
            extra_headers: vec![("X-Title".into(), "Docs Chatbot".into())],
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let mut c = cfg("ftp://nope");
        assert!(matches!(OpenAiService::new(c.clone()), Err(AiLlmError::Config(_))));

        c.endpoint = "http://localhost".into();
        c.api_key = "  ".into();
        assert!(matches!(
            OpenAiService::new(c.clone()),
            Err(AiLlmError::Config(ConfigError::EmptyApiKey))
        ));

        c.api_key = "k".into();
        c.extra_headers = vec![("bad header".into(), "v".into())];
        assert!(matches!(OpenAiService::new(c), Err(AiLlmError::Config(_))));
    }

    #[tokio::test]
    async fn embeddings_returns_first_vector() {
        let app = Router::new().route(
            "/v1/embeddings",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["model"], "test-model");
                assert_eq!(body["input"], "hello");
                Json(json!({ "data": [ { "embedding": [0.5, -1.0, 2.0] }, { "embedding": [9.0] } ] }))
            }),
        );
        let svc = OpenAiService::new(cfg(&spawn_stub(app).await)).unwrap();

        let v = svc.embeddings("hello").await.unwrap();
        assert_eq!(v, vec![0.5, -1.0, 2.0]);
    }

    #[tokio::test]
    async fn embeddings_empty_data_is_an_error() {
        let app = Router::new().route(
            "/v1/embeddings",
            post(|| async { Json(json!({ "data": [] })) }),
        );
        let svc = OpenAiService::new(cfg(&spawn_stub(app).await)).unwrap();

        let err = svc.embeddings("hello").await.unwrap_err();
        assert!(matches!(err, AiLlmError::EmptyData(_)));
    }

    #[tokio::test]
    async fn embeddings_malformed_body_is_decode_error() {
        let app = Router::new().route(
            "/v1/embeddings",
            post(|| async { Json(json!({ "error": { "message": "no such model" } })) }),
        );
        let svc = OpenAiService::new(cfg(&spawn_stub(app).await)).unwrap();

        let err = svc.embeddings("hello").await.unwrap_err();
        assert!(matches!(err, AiLlmError::Decode(_)));
    }

    #[tokio::test]
    async fn non_success_status_keeps_snippet() {
        let app = Router::new().route(
            "/v1/embeddings",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "{\"error\":\"rate limited\"}") }),
        );
        let svc = OpenAiService::new(cfg(&spawn_stub(app).await)).unwrap();

        match svc.embeddings("hello").await.unwrap_err() {
            AiLlmError::HttpStatus { status, snippet, .. } => {
                assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
                assert!(snippet.contains("rate limited"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_failure_is_reported() {
        // Bind and drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let svc = OpenAiService::new(cfg(&format!("http://{addr}"))).unwrap();
        let err = svc.embeddings("hello").await.unwrap_err();
        assert!(matches!(err, AiLlmError::HttpTransport(_)));
    }

    #[tokio::test]
    async fn chat_sends_messages_and_headers() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|headers: axum::http::HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["authorization"], "Bearer test-key");
                assert_eq!(headers["x-title"], "Docs Chatbot");
                assert_eq!(body["model"], "test-model");
                assert_eq!(body["messages"][0]["role"], "system");
                assert_eq!(body["messages"][1]["role"], "user");
                let echoed = body["messages"][1]["content"].clone();
                Json(json!({ "choices": [ { "message": { "role": "assistant", "content": echoed } } ] }))
            }),
        );
        let svc = OpenAiService::new(cfg(&spawn_stub(app).await)).unwrap();

        let reply = svc
            .chat(&[ChatMessage::system("be brief"), ChatMessage::user("ping")])
            .await
            .unwrap();
        assert_eq!(reply, "ping");
    }

    #[tokio::test]
    async fn chat_without_choices_is_empty_data() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({ "choices": [] })) }),
        );
        let svc = OpenAiService::new(cfg(&spawn_stub(app).await)).unwrap();

        let err = svc.chat(&[ChatMessage::user("ping")]).await.unwrap_err();
        assert!(matches!(err, AiLlmError::EmptyData(_)));
    }

    #[tokio::test]
    async fn chat_null_content_is_empty_data() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({ "choices": [ { "message": { "content": null } } ] })) }),
        );
        let svc = OpenAiService::new(cfg(&spawn_stub(app).await)).unwrap();

        let err = svc.chat(&[ChatMessage::user("ping")]).await.unwrap_err();
        assert!(matches!(err, AiLlmError::EmptyData(_)));
    }
}
