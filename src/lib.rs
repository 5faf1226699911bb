//! # RAG Server
//!
//! A minimal retrieval-augmented question-answering backend.
//!
//! Documents are ingested over HTTP, embedded via an external provider, and
//! stored in an in-memory corpus alongside a brute-force flat L2 vector
//! index. Questions are answered by embedding the question, retrieving the
//! single nearest document, and forwarding it as context to a chat
//! completion call.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────────────────┐   ┌──────────────┐
//! │   HTTP   │──▶│ Answer Pipeline │──▶│ Corpus Store │
//! │  (axum)  │   │ embed→nearest→  │   │ docs+flat L2 │
//! └──────────┘   │    complete     │   └──────────────┘
//!                └───────┬─────────┘
//!                        ▼
//!            ┌───────────────────────┐
//!            │ OpenAI embeddings +   │
//!            │ chat completions APIs │
//!            └───────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export OPENAI_API_KEY=sk-...
//! ragd serve
//! curl -X POST localhost:8000/add-document \
//!   -H 'Content-Type: application/json' \
//!   -d '{"content": "Paris is the capital of France."}'
//! curl -X POST localhost:8000/api/chat \
//!   -H 'Content-Type: application/json' \
//!   -d '{"question": "What is the capital of France?"}'
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`error`] | Tagged application error type |
//! | [`embedding`] | Embedding provider abstraction |
//! | [`generation`] | Chat-completion provider abstraction |
//! | [`index`] | Nearest-neighbor index abstraction |
//! | [`store`] | Append-only corpus store |
//! | [`pipeline`] | Retrieval-and-answer pipeline |
//! | [`server`] | HTTP server |

pub mod config;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod pipeline;
pub mod server;
pub mod store;
