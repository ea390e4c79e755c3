//! End-to-end tests for `POST /chat` with in-memory pipeline stages.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use ai_llm_service::{AiLlmError, ChatMessage};
use api::{AppState, GENERIC_ERROR, router};
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use contextor::{ChatCompleter, Contextor};
use http_body_util::BodyExt;
use rag_store::{BoxFuture, EmbeddingsProvider, RagConfig, RagError, RagStore, VectorIndex};
use serde_json::{Value, json};
use tower::ServiceExt;

#[derive(Clone, Copy, PartialEq)]
enum Fail {
    Nothing,
    Embedding,
    Storage,
    Completion,
}

struct Embedder {
    fail: bool,
    calls: AtomicUsize,
}

impl EmbeddingsProvider for Embedder {
    fn embed<'a>(&'a self, _text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, RagError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let fail = self.fail;
        Box::pin(async move {
            if fail {
                Err(AiLlmError::EmptyData("data[0].embedding").into())
            } else {
                Ok(vec![0.0, 0.0])
            }
        })
    }
}

/// Stored docs with their distance to any query.
struct Index {
    docs: Vec<(f32, &'static str)>,
    fail: bool,
}

impl VectorIndex for Index {
    fn nearest<'a>(
        &'a self,
        _vector: &'a [f32],
        top_k: u32,
    ) -> BoxFuture<'a, Result<Vec<String>, RagError>> {
        Box::pin(async move {
            if self.fail {
                return Err(RagError::Storage(sqlx::Error::PoolTimedOut));
            }
            let mut docs = self.docs.clone();
            docs.sort_by(|a, b| a.0.total_cmp(&b.0));
            Ok(docs
                .into_iter()
                .take(top_k as usize)
                .map(|(_, t)| t.to_string())
                .collect())
        })
    }
}

#[derive(Default)]
struct Completer {
    fail: bool,
    calls: AtomicUsize,
    prompt: Mutex<Vec<ChatMessage>>,
}

impl ChatCompleter for Completer {
    fn complete<'a>(
        &'a self,
        messages: &'a [ChatMessage],
    ) -> BoxFuture<'a, Result<String, AiLlmError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.prompt.lock().unwrap() = messages.to_vec();
        let fail = self.fail;
        Box::pin(async move {
            if fail {
                Err(AiLlmError::Decode("expected `choices[0].message.content`".into()))
            } else {
                Ok("Members meet monthly.".to_string())
            }
        })
    }
}

struct Harness {
    app: axum::Router,
    embedder: Arc<Embedder>,
    completer: Arc<Completer>,
}

fn harness(fail: Fail, docs: Vec<(f32, &'static str)>) -> Harness {
    let embedder = Arc::new(Embedder {
        fail: fail == Fail::Embedding,
        calls: AtomicUsize::new(0),
    });
    let completer = Arc::new(Completer {
        fail: fail == Fail::Completion,
        ..Default::default()
    });
    let store = RagStore::new(
        RagConfig::new_default("postgres://unused"),
        embedder.clone(),
        Arc::new(Index {
            docs,
            fail: fail == Fail::Storage,
        }),
    )
    .unwrap();
    let contextor = Contextor::new(store, completer.clone());

    Harness {
        app: router(AppState::new(Arc::new(contextor))),
        embedder,
        completer,
    }
}

fn post_chat(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn send(app: axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn default_docs() -> Vec<(f32, &'static str)> {
    vec![(0.1, "doc at 0.1"), (0.3, "doc at 0.3"), (0.2, "doc at 0.2")]
}

#[tokio::test]
async fn replies_with_completion_text() {
    let h = harness(Fail::Nothing, default_docs());
    let (status, body) = send(h.app, post_chat(json!({ "message": "When do we meet?" }).to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "reply": "Members meet monthly." }));
}

#[tokio::test]
async fn prompt_has_context_nearest_first_and_message_last() {
    let h = harness(Fail::Nothing, default_docs());
    let message = "When do we meet?\n  (exact text)";
    let (status, _) = send(h.app, post_chat(json!({ "message": message }).to_string())).await;
    assert_eq!(status, StatusCode::OK);

    let prompt = h.completer.prompt.lock().unwrap().clone();
    assert_eq!(prompt.len(), 3);
    assert_eq!(prompt[1].content, "Context:\ndoc at 0.1\ndoc at 0.2\ndoc at 0.3");
    assert_eq!(prompt[2].content, message);
}

#[tokio::test]
async fn empty_store_still_answers() {
    let h = harness(Fail::Nothing, vec![]);
    let (status, body) = send(h.app, post_chat(json!({ "message": "hello" }).to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "Members meet monthly.");
    assert_eq!(h.completer.prompt.lock().unwrap()[1].content, "Context:\n");
}

#[tokio::test]
async fn embedding_failure_is_generic_500_without_completion() {
    let h = harness(Fail::Embedding, default_docs());
    let (status, body) = send(h.app, post_chat(json!({ "message": "hello" }).to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": GENERIC_ERROR }));
    assert_eq!(h.completer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn storage_failure_is_generic_500() {
    let h = harness(Fail::Storage, default_docs());
    let (status, body) = send(h.app, post_chat(json!({ "message": "hello" }).to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Something went wrong" }));
    assert_eq!(h.completer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn completion_failure_is_generic_500() {
    let h = harness(Fail::Completion, default_docs());
    let (status, body) = send(h.app, post_chat(json!({ "message": "hello" }).to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Something went wrong" }));
    assert_eq!(h.completer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_message_is_rejected_before_embedding() {
    for raw in [
        json!({}).to_string(),
        json!({ "message": "" }).to_string(),
        json!({ "message": 7 }).to_string(),
        "not json".to_string(),
    ] {
        let h = harness(Fail::Nothing, default_docs());
        let (status, body) = send(h.app, post_chat(raw.clone())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body {raw}");
        assert_eq!(body, json!({ "error": "message is required" }));
        assert_eq!(h.embedder.calls.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let h = harness(Fail::Nothing, default_docs());
    let req = Request::builder()
        .method("POST")
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ORIGIN, "https://bot.example.com")
        .body(Body::from(json!({ "message": "hi" }).to_string()))
        .unwrap();

    let resp = h.app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn only_chat_route_exists() {
    let h = harness(Fail::Nothing, default_docs());
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let resp = h.app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
