//! Nearest-neighbor index abstraction.
//!
//! The corpus store talks to a [`VectorIndex`] trait object so the search
//! algorithm can be swapped without touching the store or the pipeline.
//! The only implementation is [`FlatL2Index`]: exact brute-force search
//! under squared Euclidean distance, O(n × dims) per query. Appropriate
//! for small corpora; no approximation, no eviction.

use anyhow::{bail, Result};

/// A k=1 nearest-neighbor index over fixed-dimensionality vectors.
pub trait VectorIndex: Send + Sync {
    /// Append a vector. Position is the vector's identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the vector's dimensionality does not match
    /// the index's.
    fn add(&mut self, vector: Vec<f32>) -> Result<()>;

    /// Return the position of the vector nearest to `query` under L2
    /// distance, or `None` if the index is empty.
    ///
    /// Ties are broken by insertion order: the first position at minimum
    /// distance wins.
    fn search(&self, query: &[f32]) -> Option<usize>;

    /// Number of stored vectors.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Brute-force exact flat index under squared L2 distance.
pub struct FlatL2Index {
    dims: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatL2Index {
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            vectors: Vec::new(),
        }
    }

    pub fn dims(&self) -> usize {
        self.dims
    }
}

impl VectorIndex for FlatL2Index {
    fn add(&mut self, vector: Vec<f32>) -> Result<()> {
        if vector.len() != self.dims {
            bail!(
                "Vector dimensionality mismatch: expected {}, got {}",
                self.dims,
                vector.len()
            );
        }
        self.vectors.push(vector);
        Ok(())
    }

    fn search(&self, query: &[f32]) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;

        for (i, v) in self.vectors.iter().enumerate() {
            let dist = l2_squared(query, v);
            match best {
                // Strict less-than keeps the first position on ties.
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((i, dist)),
            }
        }

        best.map(|(i, _)| i)
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }
}

/// Squared Euclidean distance between two vectors.
///
/// Skips the final square root: ordering under squared distance is the
/// same as under true L2 distance.
pub fn l2_squared(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}
