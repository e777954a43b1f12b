//! Analysis run orchestrator.
//!
//! The `DivergenceEngine` runs one analysis over a set of corpora:
//! - drops duplicate ids (first occurrence wins)
//! - builds and freezes the per-corpus [`ArtifactCache`]
//! - assembles the KL and generalized divergence matrices
//! - collects every exclusion and failed pair into an [`AnalysisReport`]
//!
//! Per-corpus and per-pair failures never fail a run. A run only fails on an
//! invalid configuration or when its [`AbortHandle`] is raised, in which case
//! no partial matrix is returned.

mod abort;
mod cache;
mod divergence_engine;
mod report;


pub use self::abort::AbortHandle;
pub use self::cache::{ArtifactCache, CorpusArtifacts};
pub use self::divergence_engine::DivergenceEngine;
pub use self::report::{AnalysisOutput, AnalysisReport, Exclusion, ExclusionReport};
