//! Pairwise distance matrices.
//!
//! [`DistanceMatrixAssembler`] fans a metric out over every unordered pair of
//! corpora, then mirrors each result into both cells. Pairs are independent:
//! each task computes one value, and the matrix is only written after the
//! fan-out has been collected. A failing pair leaves its two cells empty and
//! is recorded as a [`PairFailure`]; the rest of the fan-out proceeds.

use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::corpus::Corpus;
use crate::engine::AbortHandle;
use crate::error::{DivergenceError, DivergenceResult, FailureKind};

/// Symmetric distance matrix keyed by corpus id.
///
/// Diagonal cells are always exactly `0.0`. Off-diagonal cells are absent
/// when the pair's metric failed. Serializes as `languages` (ids) and
/// `distance_matrix` (nested map), the keys downstream consumers index by.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DistanceMatrix {
    #[serde(rename = "languages")]
    ids: Vec<String>,
    #[serde(rename = "distance_matrix")]
    values: BTreeMap<String, BTreeMap<String, f64>>,
}

impl DistanceMatrix {
    /// Matrix over `ids` holding only the zero diagonal.
    pub fn with_ids(ids: Vec<String>) -> Self {
        let values = ids
            .iter()
            .map(|id| (id.clone(), BTreeMap::from([(id.clone(), 0.0)])))
            .collect();
        Self { ids, values }
    }

    /// Write one off-diagonal value into both cells; diagonal writes are ignored.
    fn set(&mut self, a: &str, b: &str, value: f64) {
        if a == b {
            return;
        }
        for (row, col) in [(a, b), (b, a)] {
            if let Some(cells) = self.values.get_mut(row) {
                cells.insert(col.to_string(), value);
            }
        }
    }

    /// Corpus ids in input order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Nested `row -> column -> value` map.
    pub fn values(&self) -> &BTreeMap<String, BTreeMap<String, f64>> {
        &self.values
    }

    /// Number of corpora.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the matrix has no corpora.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Distance between two ids, if both are present and the cell was computed.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.values.get(a)?.get(b).copied()
    }

    /// Number of filled cells, diagonal included.
    pub fn cell_count(&self) -> usize {
        self.values.values().map(BTreeMap::len).sum()
    }

    /// The `k` nearest other corpora to `id`, closest first.
    ///
    /// Ties are broken by input order. Missing cells are skipped.
    pub fn nearest(&self, id: &str, k: usize) -> Vec<(String, f64)> {
        let Some(row) = self.values.get(id) else {
            return Vec::new();
        };
        let mut neighbours: Vec<(usize, &String, f64)> = self
            .ids
            .iter()
            .enumerate()
            .filter(|(_, other)| other.as_str() != id)
            .filter_map(|(order, other)| row.get(other).map(|&d| (order, other, d)))
            .collect();
        neighbours.sort_by(|a, b| a.2.total_cmp(&b.2).then(a.0.cmp(&b.0)));
        neighbours
            .into_iter()
            .take(k)
            .map(|(_, other, d)| (other.clone(), d))
            .collect()
    }

    /// Unordered pairs whose cell is empty, in input order.
    pub fn missing_cells(&self) -> Vec<(String, String)> {
        let mut missing = Vec::new();
        for (i, a) in self.ids.iter().enumerate() {
            for b in &self.ids[i + 1..] {
                if self.get(a, b).is_none() {
                    missing.push((a.clone(), b.clone()));
                }
            }
        }
        missing
    }
}

/// A pair whose metric failed; its cells are left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairFailure {
    /// First corpus id.
    pub a: String,
    /// Second corpus id.
    pub b: String,
    /// Failure category.
    pub kind: FailureKind,
    /// Error message.
    pub message: String,
}

/// Result of one matrix assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    /// Assembled matrix.
    pub matrix: DistanceMatrix,
    /// Pairs that could not be computed.
    pub failures: Vec<PairFailure>,
    /// Number of metric evaluations performed.
    pub evaluations: usize,
}

/// Fans a pairwise metric out over all unordered pairs.
///
/// # Example
///
/// ```
/// use content_divergence_engine::corpus::Corpus;
/// use content_divergence_engine::matrix::DistanceMatrixAssembler;
///
/// let corpora = vec![Corpus::new("a", "aa"), Corpus::new("b", "bbbb")];
/// let assembly = DistanceMatrixAssembler::new()
///     .build(&corpora, |x, y| Ok((x.len() as f64 - y.len() as f64).abs()))
///     .unwrap();
/// assert_eq!(assembly.matrix.get("a", "b"), Some(2.0));
/// assert_eq!(assembly.matrix.get("b", "b"), Some(0.0));
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrixAssembler {
    parallel: bool,
    abort: Option<AbortHandle>,
}

impl Default for DistanceMatrixAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl DistanceMatrixAssembler {
    /// Create a parallel assembler.
    pub fn new() -> Self {
        Self {
            parallel: true,
            abort: None,
        }
    }

    /// Choose between the rayon fan-out and a sequential loop.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Stop early and fail with `Aborted` once `handle` is raised.
    pub fn with_abort(mut self, handle: AbortHandle) -> Self {
        self.abort = Some(handle);
        self
    }

    fn aborted(&self) -> bool {
        self.abort.as_ref().is_some_and(AbortHandle::is_aborted)
    }

    /// Build a matrix by applying `metric` to every unordered pair of corpora.
    pub fn build<F>(&self, corpora: &[Corpus], metric: F) -> DivergenceResult<Assembly>
    where
        F: Fn(&Corpus, &Corpus) -> DivergenceResult<f64> + Sync,
    {
        let ids = corpora.iter().map(|c| c.id().to_string()).collect();
        self.build_indexed(ids, |i, j| metric(&corpora[i], &corpora[j]))
    }

    /// Build a matrix over `ids`, calling `metric(i, j)` with `i < j` indices.
    ///
    /// Indices refer to positions in `ids`. A repeated id keeps its first
    /// position; later ones are left out of the matrix and recorded as
    /// `DuplicateId` failures against the first.
    pub fn build_indexed<F>(&self, ids: Vec<String>, metric: F) -> DivergenceResult<Assembly>
    where
        F: Fn(usize, usize) -> DivergenceResult<f64> + Sync,
    {
        let mut failures = Vec::new();
        let mut first_seen: HashMap<&str, usize> = HashMap::with_capacity(ids.len());
        let mut kept = Vec::with_capacity(ids.len());
        for (position, id) in ids.iter().enumerate() {
            if let Some(&first) = first_seen.get(id.as_str()) {
                tracing::warn!(id = %id, first, position, "Duplicate id left out of matrix");
                failures.push(PairFailure {
                    a: ids[first].clone(),
                    b: id.clone(),
                    kind: FailureKind::DuplicateId,
                    message: format!("id at position {} already used at position {}", position, first),
                });
                continue;
            }
            first_seen.insert(id.as_str(), position);
            kept.push(position);
        }

        let n = kept.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .map(|(i, j)| (kept[i], kept[j]))
            .collect();

        let evaluate = |&(i, j): &(usize, usize)| {
            if self.aborted() {
                None
            } else {
                Some(((i, j), metric(i, j)))
            }
        };
        let results: Vec<Option<((usize, usize), DivergenceResult<f64>)>> = if self.parallel {
            pairs.par_iter().map(evaluate).collect()
        } else {
            pairs.iter().map(evaluate).collect()
        };

        if self.aborted() {
            return Err(DivergenceError::Aborted);
        }

        let mut matrix = DistanceMatrix::with_ids(kept.iter().map(|&i| ids[i].clone()).collect());
        let mut evaluations = 0;
        for ((i, j), result) in results.into_iter().flatten() {
            evaluations += 1;
            let (a, b) = (ids[i].clone(), ids[j].clone());
            match result {
                Ok(value) => matrix.set(&a, &b, value),
                Err(err) if err.is_pair_local() => {
                    tracing::warn!(a = %a, b = %b, error = %err, "Pair omitted from matrix");
                    failures.push(PairFailure {
                        kind: err.failure_kind().unwrap_or(FailureKind::CompressionFailure),
                        message: err.to_string(),
                        a,
                        b,
                    });
                }
                Err(err) => return Err(err),
            }
        }

        tracing::debug!(
            corpora = n,
            evaluations,
            failures = failures.len(),
            "Distance matrix assembled"
        );
        Ok(Assembly {
            matrix,
            failures,
            evaluations,
        })
    }
}
