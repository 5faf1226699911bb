//! # RAG Server CLI (`ragd`)
//!
//! The `ragd` binary starts the retrieval-augmented question-answering
//! HTTP server.
//!
//! ## Usage
//!
//! ```bash
//! ragd serve                              # defaults, bind 127.0.0.1:8000
//! ragd --config ./config/ragd.toml serve  # explicit configuration
//! ```
//!
//! The OpenAI credential is read from the `OPENAI_API_KEY` environment
//! variable at startup. Logging is controlled via `RUST_LOG`
//! (e.g. `RUST_LOG=rag_server=debug`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use rag_server::config::{self, Config};
use rag_server::embedding::OpenAiEmbedder;
use rag_server::generation::OpenAiGenerator;
use rag_server::pipeline::AnswerPipeline;
use rag_server::server;
use rag_server::store::CorpusStore;

/// RAG Server CLI — a retrieval-augmented question-answering backend.
#[derive(Parser)]
#[command(
    name = "ragd",
    about = "RAG Server — a retrieval-augmented question-answering HTTP backend",
    version
)]
struct Cli {
    /// Path to configuration file (TOML). Built-in defaults are used
    /// when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    ///
    /// Serves `/add-document`, `/api/chat`, `/process-data`, and `/health`.
    /// The corpus lives in process memory and resets on restart.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rag_server=info,ragd=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Serve => {
            let embedder = Arc::new(OpenAiEmbedder::new(&config.embedding)?);
            let generator = Arc::new(OpenAiGenerator::new(&config.generation)?);
            let store = CorpusStore::flat_l2(config.embedding.dims);
            let pipeline = Arc::new(AnswerPipeline::new(store, embedder, generator));

            server::run_server(&config, pipeline).await?;
        }
    }

    Ok(())
}
