//! Document-retrieval-and-answer pipeline.
//!
//! On a question: embed it, look up the nearest stored document, build a
//! grounded chat prompt, and return the generation provider's completion.
//! Each call is a single linear sequence with no persisted intermediate
//! state; the only shared state is the [`CorpusStore`].

use std::sync::Arc;

use crate::embedding::Embedder;
use crate::error::{Error, Result};
use crate::generation::Generator;
use crate::store::CorpusStore;

/// Fixed system instruction for every grounded completion.
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Use the following context to answer the question.";

/// Fixed user-message template embedding the retrieved context and the
/// question. The context is the empty string when the corpus is empty.
pub fn user_prompt(context: &str, question: &str) -> String {
    format!("Context: {}\n\nQuestion: {}", context, question)
}

/// Answer pipeline over a corpus store and two external providers.
///
/// The store and providers are constructor-injected; tests substitute
/// mock providers to assert prompts and count provider calls.
pub struct AnswerPipeline {
    store: CorpusStore,
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn Generator>,
}

impl AnswerPipeline {
    pub fn new(
        store: CorpusStore,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            store,
            embedder,
            generator,
        }
    }

    /// Embed `content` and append it to the corpus.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if `content` is empty (the embedding
    ///   provider is never called).
    /// - [`Error::Provider`] if the embedding call fails.
    pub async fn ingest(&self, content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(Error::validation("content is required"));
        }

        let embedding = self.embedder.embed(content).await?;
        self.store.append(content.to_string(), embedding)?;

        tracing::info!(corpus_len = self.store.len(), "document ingested");
        Ok(())
    }

    /// Answer `question` grounded on the nearest stored document.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if `question` is empty or whitespace-only
    ///   (no provider is called).
    /// - [`Error::Provider`] if the embedding or generation call fails,
    ///   tagged with its origin.
    pub async fn answer(&self, question: &str) -> Result<String> {
        if question.trim().is_empty() {
            return Err(Error::validation("Question is required"));
        }

        let question_embedding = self.embedder.embed(question).await?;

        let relevant_context = self
            .store
            .nearest(&question_embedding)?
            .unwrap_or_default();

        let prompt = user_prompt(&relevant_context, question);
        let raw = self.generator.complete(SYSTEM_PROMPT, &prompt).await?;

        Ok(raw.trim().to_string())
    }

    pub fn corpus_len(&self) -> usize {
        self.store.len()
    }
}
