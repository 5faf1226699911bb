//! HTTP API integration tests.
//!
//! Drives the axum router in-process with mock embedding and generation
//! providers, asserting the exact wire contract: request/response bodies,
//! status codes, and the prompt strings handed to the generation provider.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

use rag_server::embedding::Embedder;
use rag_server::error::{Error, Result};
use rag_server::generation::Generator;
use rag_server::pipeline::{AnswerPipeline, SYSTEM_PROMPT};
use rag_server::server::router;
use rag_server::store::CorpusStore;

const DIMS: usize = 2;

/// Deterministic embedder: derives a 2-d vector from the text's bytes so
/// identical texts embed identically and distinct texts land apart.
struct MockEmbedder {
    calls: AtomicUsize,
    fail: bool,
}

impl MockEmbedder {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::embedding("mock embedding failure"));
        }
        let sum: u32 = text.bytes().map(u32::from).sum();
        Ok(vec![text.len() as f32, sum as f32])
    }

    fn model_name(&self) -> &str {
        "mock-embedder"
    }

    fn dims(&self) -> usize {
        DIMS
    }
}

/// Records every (system, user) prompt pair and returns a canned reply.
struct MockGenerator {
    prompts: Mutex<Vec<(String, String)>>,
    reply: String,
}

impl MockGenerator {
    fn replying(reply: &str) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            reply: reply.to_string(),
        }
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        Ok(self.reply.clone())
    }

    fn model_name(&self) -> &str {
        "mock-generator"
    }
}

struct TestApp {
    router: axum::Router,
    embedder: Arc<MockEmbedder>,
    generator: Arc<MockGenerator>,
}

fn test_app(embedder: MockEmbedder, generator: MockGenerator) -> TestApp {
    let embedder = Arc::new(embedder);
    let generator = Arc::new(generator);
    let pipeline = Arc::new(AnswerPipeline::new(
        CorpusStore::flat_l2(DIMS),
        embedder.clone(),
        generator.clone(),
    ));
    TestApp {
        router: router(pipeline),
        embedder,
        generator,
    }
}

async fn post_json(
    app: &TestApp,
    path: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_add_document_success() {
    let app = test_app(MockEmbedder::new(), MockGenerator::replying("ok"));

    let (status, body) = post_json(
        &app,
        "/add-document",
        serde_json::json!({ "content": "Paris is the capital of France." }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Document added successfully");
    assert_eq!(app.embedder.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_add_document_empty_content_is_400() {
    let app = test_app(MockEmbedder::new(), MockGenerator::replying("ok"));

    for body in [
        serde_json::json!({ "content": "" }),
        serde_json::json!({}),
    ] {
        let (status, json) = post_json(&app, "/add-document", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["detail"], "content is required");
    }

    assert_eq!(app.embedder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_add_document_embedding_failure_is_500() {
    let app = test_app(MockEmbedder::failing(), MockGenerator::replying("ok"));

    let (status, json) = post_json(
        &app,
        "/add-document",
        serde_json::json!({ "content": "some document" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json["detail"],
        "embedding provider error: mock embedding failure"
    );
}

#[tokio::test]
async fn test_chat_empty_question_is_400_and_calls_no_provider() {
    let app = test_app(MockEmbedder::new(), MockGenerator::replying("ok"));

    for body in [
        serde_json::json!({ "question": "" }),
        serde_json::json!({ "question": "   " }),
        serde_json::json!({}),
    ] {
        let (status, json) = post_json(&app, "/api/chat", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["detail"], "Question is required");
    }

    assert_eq!(app.embedder.calls.load(Ordering::SeqCst), 0);
    assert!(app.generator.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_on_empty_corpus_succeeds_with_empty_context() {
    let app = test_app(MockEmbedder::new(), MockGenerator::replying("No idea."));

    let (status, json) = post_json(
        &app,
        "/api/chat",
        serde_json::json!({ "question": "What is Rust?" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["answer"], "No idea.");

    let prompts = app.generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].1, "Context: \n\nQuestion: What is Rust?");
}

#[tokio::test]
async fn test_end_to_end_paris() {
    let app = test_app(
        MockEmbedder::new(),
        MockGenerator::replying("  The capital of France is Paris.  "),
    );

    let (status, _) = post_json(
        &app,
        "/add-document",
        serde_json::json!({ "content": "Paris is the capital of France." }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = post_json(
        &app,
        "/api/chat",
        serde_json::json!({ "question": "What is the capital of France?" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // The generated text passes through trimmed.
    assert_eq!(json["answer"], "The capital of France is Paris.");

    // The single stored document must be retrieved as context, and both
    // prompt strings must match the fixed template exactly.
    let prompts = app.generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].0, SYSTEM_PROMPT);
    assert_eq!(
        prompts[0].1,
        "Context: Paris is the capital of France.\n\nQuestion: What is the capital of France?"
    );
}

#[tokio::test]
async fn test_process_data_uppercases_values() {
    let app = test_app(MockEmbedder::new(), MockGenerator::replying("ok"));

    let (status, json) = post_json(
        &app,
        "/process-data",
        serde_json::json!({ "data": { "a": "x", "b": "y" } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["processed_data"],
        serde_json::json!({ "a": "X", "b": "Y" })
    );
}

#[tokio::test]
async fn test_process_data_non_string_value_is_500_not_crash() {
    let app = test_app(MockEmbedder::new(), MockGenerator::replying("ok"));

    let (status, json) = post_json(
        &app,
        "/process-data",
        serde_json::json!({ "data": { "a": "x", "b": 42 } }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    // Generic body only; the offending key is logged, not exposed.
    assert_eq!(json["detail"], "Internal Server Error");
}

#[tokio::test]
async fn test_health() {
    let app = test_app(MockEmbedder::new(), MockGenerator::replying("ok"));

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
}
