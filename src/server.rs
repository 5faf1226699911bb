//! HTTP server for the question-answering backend.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/add-document` | Ingest a document into the corpus |
//! | `POST` | `/api/chat` | Answer a question grounded on the corpus |
//! | `POST` | `/process-data` | Uppercase the values of a string map |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Error responses carry a JSON body `{ "detail": "<message>" }`:
//! `400` for invalid input, `500` for provider failures (message names the
//! provider origin) and anything unexpected (fixed message, details logged).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support browser-based
//! clients.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::pipeline::AnswerPipeline;

/// Starts the HTTP server.
///
/// Binds to the address configured in `[server].bind` and serves until the
/// process is terminated.
pub async fn run_server(config: &Config, pipeline: Arc<AnswerPipeline>) -> anyhow::Result<()> {
    let app = router(pipeline);

    tracing::info!(bind = %config.server.bind, "server listening");

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the application router. Exposed separately from [`run_server`]
/// so tests can drive the routes in-process with mock providers.
pub fn router(pipeline: Arc<AnswerPipeline>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/add-document", post(handle_add_document))
        .route("/api/chat", post(handle_chat))
        .route("/process-data", post(handle_process_data))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(pipeline)
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /add-document ============

#[derive(Deserialize)]
struct AddDocumentRequest {
    #[serde(default)]
    content: String,
}

#[derive(Serialize)]
struct AddDocumentResponse {
    message: String,
}

/// Handler for `POST /add-document`.
///
/// Embeds the document content and appends it to the corpus. Returns `400`
/// if `content` is missing or empty, `500` if the embedding provider fails.
async fn handle_add_document(
    State(pipeline): State<Arc<AnswerPipeline>>,
    Json(req): Json<AddDocumentRequest>,
) -> Result<Json<AddDocumentResponse>> {
    pipeline.ingest(&req.content).await?;

    Ok(Json(AddDocumentResponse {
        message: "Document added successfully".to_string(),
    }))
}

// ============ POST /api/chat ============

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    question: String,
}

#[derive(Serialize)]
struct ChatResponse {
    answer: String,
}

/// Handler for `POST /api/chat`.
///
/// Runs the answer pipeline: embed the question, retrieve the nearest
/// document, generate a grounded completion. Returns `400` if `question`
/// is missing or empty, `500` on provider failure.
async fn handle_chat(
    State(pipeline): State<Arc<AnswerPipeline>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let answer = pipeline.answer(&req.question).await?;

    Ok(Json(ChatResponse { answer }))
}

// ============ POST /process-data ============

#[derive(Deserialize)]
struct ProcessDataRequest {
    #[serde(default)]
    data: serde_json::Map<String, serde_json::Value>,
}

#[derive(Serialize)]
struct ProcessDataResponse {
    processed_data: serde_json::Map<String, serde_json::Value>,
}

/// Handler for `POST /process-data`.
///
/// Uppercases every value in the `data` map. A non-string value is a `500`
/// with the generic body, not a panic.
async fn handle_process_data(
    Json(req): Json<ProcessDataRequest>,
) -> Result<Json<ProcessDataResponse>> {
    let mut processed = serde_json::Map::with_capacity(req.data.len());

    for (key, value) in &req.data {
        let text = value.as_str().ok_or_else(|| {
            Error::Unexpected(anyhow::anyhow!("non-string value for key '{}'", key))
        })?;
        processed.insert(key.clone(), text.to_uppercase().into());
    }

    Ok(Json(ProcessDataResponse {
        processed_data: processed,
    }))
}
