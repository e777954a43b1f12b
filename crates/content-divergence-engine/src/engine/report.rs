//! Serializable results of one analysis run.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::FailureKind;
use crate::matrix::{DistanceMatrix, PairFailure};

/// One metric's output, in the shape visualization consumers read.
///
/// Serializes with exactly the keys `languages`, `distance_matrix`,
/// `entropy_values` and `categories`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisOutput {
    /// Ids and distances (`languages` and `distance_matrix`).
    #[serde(flatten)]
    pub matrix: DistanceMatrix,
    /// Shannon entropy in bits per included id.
    pub entropy_values: BTreeMap<String, f64>,
    /// Category per included id.
    pub categories: BTreeMap<String, String>,
}

impl AnalysisOutput {
    /// Included ids, in input order.
    pub fn ids(&self) -> &[String] {
        self.matrix.ids()
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// A corpus left out of a matrix, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exclusion {
    /// Corpus id.
    pub id: String,
    /// Failure category.
    pub kind: FailureKind,
    /// Human-readable reason.
    pub message: String,
}

/// Everything that did not make it into the matrices.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExclusionReport {
    /// Ids left out of the KL matrix.
    pub kl: Vec<Exclusion>,
    /// Ids left out of the generalized matrix.
    pub generalized: Vec<Exclusion>,
    /// Pairs whose cell is missing from the KL matrix.
    pub kl_missing_pairs: Vec<PairFailure>,
    /// Pairs whose cell is missing from the generalized matrix.
    pub generalized_missing_pairs: Vec<PairFailure>,
    /// Ids kept in the generalized matrix although their dictionary is all
    /// zero bytes, tagged `EmptyDictionarySource` or `NoDictionaryPatterns`.
    pub degenerate_dictionaries: Vec<Exclusion>,
}

impl ExclusionReport {
    /// Check if the run was complete.
    pub fn is_empty(&self) -> bool {
        self.kl.is_empty()
            && self.generalized.is_empty()
            && self.kl_missing_pairs.is_empty()
            && self.generalized_missing_pairs.is_empty()
            && self.degenerate_dictionaries.is_empty()
    }

    /// One line per exclusion, failed pair and degenerate dictionary.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (metric, exclusions) in [("kl", &self.kl), ("generalized", &self.generalized)] {
            for e in exclusions {
                lines.push(format!("{}: excluded '{}' ({:?}): {}", metric, e.id, e.kind, e.message));
            }
        }
        for (metric, pairs) in [
            ("kl", &self.kl_missing_pairs),
            ("generalized", &self.generalized_missing_pairs),
        ] {
            for p in pairs {
                lines.push(format!(
                    "{}: missing pair '{}'/'{}' ({:?}): {}",
                    metric, p.a, p.b, p.kind, p.message
                ));
            }
        }
        for d in &self.degenerate_dictionaries {
            lines.push(format!(
                "generalized: '{}' has an all-zero dictionary ({:?}): {}",
                d.id, d.kind, d.message
            ));
        }
        lines
    }
}

/// Full report of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Unique run id.
    pub run_id: Uuid,
    /// Completion time.
    pub generated_at: DateTime<Utc>,
    /// Configuration the run used.
    pub config: EngineConfig,
    /// KL divergence output.
    pub kl: AnalysisOutput,
    /// Generalized (cross-compression) divergence output.
    pub generalized: AnalysisOutput,
    /// Exclusions and failed pairs across both metrics.
    pub exclusions: ExclusionReport,
}
