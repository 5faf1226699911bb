//! Append-only corpus store.
//!
//! Holds the ingestion-ordered document contents and their embeddings,
//! kept in lockstep: index position *i* always corresponds to the *i*-th
//! ingested document. Both live behind a single `RwLock` so concurrent
//! appends and reads from parallel request handlers cannot observe the
//! two sequences at different lengths.

use std::sync::RwLock;

use crate::error::{Error, Result};
use crate::index::{FlatL2Index, VectorIndex};

struct Inner {
    documents: Vec<String>,
    index: Box<dyn VectorIndex>,
}

/// Process-wide corpus of ingested documents plus their vector index.
///
/// Documents are append-only and never deleted; identity is insertion
/// position. The store is constructor-injected into the pipeline rather
/// than living as a module-level global, so tests get isolated corpora.
pub struct CorpusStore {
    inner: RwLock<Inner>,
}

impl CorpusStore {
    pub fn new(index: Box<dyn VectorIndex>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                documents: Vec::new(),
                index,
            }),
        }
    }

    /// Convenience constructor with a brute-force flat L2 index.
    pub fn flat_l2(dims: usize) -> Self {
        Self::new(Box::new(FlatL2Index::new(dims)))
    }

    /// Append a document and its embedding at the same position.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if `content` is empty.
    /// - [`Error::Unexpected`] if the embedding's dimensionality does not
    ///   match the index or the lock is poisoned. The document sequence is
    ///   rolled back on index failure so the lockstep invariant holds.
    pub fn append(&self, content: String, embedding: Vec<f32>) -> Result<()> {
        if content.trim().is_empty() {
            return Err(Error::validation("content is required"));
        }

        let mut inner = self
            .inner
            .write()
            .map_err(|_| anyhow::anyhow!("corpus lock poisoned"))?;

        inner.documents.push(content);
        if let Err(e) = inner.index.add(embedding) {
            inner.documents.pop();
            return Err(Error::Unexpected(e));
        }

        Ok(())
    }

    /// Return the content of the document nearest to `query` under L2
    /// distance, or `None` if the corpus is empty.
    pub fn nearest(&self, query: &[f32]) -> Result<Option<String>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| anyhow::anyhow!("corpus lock poisoned"))?;

        Ok(inner
            .index
            .search(query)
            .map(|i| inner.documents[i].clone()))
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.documents.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
