//! DivergenceEngine - runs one analysis over a corpus set.

use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use super::abort::AbortHandle;
use super::cache::{ArtifactCache, CorpusArtifacts};
use super::report::{AnalysisOutput, AnalysisReport, Exclusion, ExclusionReport};
use crate::config::EngineConfig;
use crate::corpus::Corpus;
use crate::error::{DivergenceError, DivergenceResult, FailureKind};
use crate::generalized::GeneralizedDivergenceCalculator;
use crate::kl::KlDivergenceCalculator;
use crate::matrix::{Assembly, DistanceMatrixAssembler, PairFailure};

/// Orchestrates KL and generalized divergence over a corpus set.
///
/// # Example
/// ```
/// use content_divergence_engine::config::EngineConfig;
/// use content_divergence_engine::corpus::Corpus;
/// use content_divergence_engine::engine::DivergenceEngine;
///
/// let engine = DivergenceEngine::new(EngineConfig::default()).unwrap();
/// let corpora = vec![
///     Corpus::new("animal_cat", "the cat sat on the mat and purred at the cat ".repeat(8)),
///     Corpus::new("animal_dog", "the dog dug in the yard and barked at the dog ".repeat(8)),
/// ];
///
/// let report = engine.analyze(&corpora).unwrap();
/// assert_eq!(report.kl.matrix.get("animal_cat", "animal_cat"), Some(0.0));
/// assert!(report.generalized.matrix.get("animal_cat", "animal_dog").is_some());
/// assert_eq!(report.kl.categories["animal_dog"], "animal");
/// ```
#[derive(Debug)]
pub struct DivergenceEngine {
    config: EngineConfig,
    kl: KlDivergenceCalculator,
    generalized: GeneralizedDivergenceCalculator,
}

impl DivergenceEngine {
    /// Create an engine, validating the configuration.
    pub fn new(config: EngineConfig) -> DivergenceResult<Self> {
        let config = config.validated()?;
        Ok(Self {
            kl: KlDivergenceCalculator::from_config(&config.kl),
            generalized: GeneralizedDivergenceCalculator::from_config(&config)?,
            config,
        })
    }

    /// Create an engine with default configuration.
    pub fn with_defaults() -> DivergenceResult<Self> {
        Self::new(EngineConfig::default())
    }

    /// Configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// KL calculator in use.
    pub fn kl_calculator(&self) -> &KlDivergenceCalculator {
        &self.kl
    }

    /// Generalized divergence calculator in use.
    pub fn generalized_calculator(&self) -> &GeneralizedDivergenceCalculator {
        &self.generalized
    }

    /// Run a full analysis.
    ///
    /// Never fails because of corpus content: excluded ids and failed pairs
    /// are listed in the report's exclusions.
    pub fn analyze(&self, corpora: &[Corpus]) -> DivergenceResult<AnalysisReport> {
        self.analyze_with_abort(corpora, &AbortHandle::new())
    }

    /// Run a full analysis that stops with `Aborted` once `abort` is raised.
    pub fn analyze_with_abort(
        &self,
        corpora: &[Corpus],
        abort: &AbortHandle,
    ) -> DivergenceResult<AnalysisReport> {
        let start = Instant::now();
        let run_id = Uuid::new_v4();
        tracing::info!(
            run_id = %run_id,
            corpora = corpora.len(),
            compressor = self.generalized.compressor().name(),
            dictionary_size = self.config.dictionary.size,
            "Starting divergence analysis"
        );

        let mut exclusions = ExclusionReport::default();
        let unique = dedupe(corpora, &mut exclusions);
        check(abort)?;

        let cache = ArtifactCache::build(&unique, &self.config);
        check(abort)?;

        let assembler = DistanceMatrixAssembler::new()
            .with_parallel(self.config.parallel)
            .with_abort(abort.clone());

        let kl = self.kl_output(&cache, &assembler, &mut exclusions)?;
        let generalized = self.generalized_output(&cache, &assembler, &mut exclusions)?;
        check(abort)?;

        tracing::info!(
            run_id = %run_id,
            kl_ids = kl.ids().len(),
            generalized_ids = generalized.ids().len(),
            kl_missing_pairs = exclusions.kl_missing_pairs.len(),
            generalized_missing_pairs = exclusions.generalized_missing_pairs.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Divergence analysis complete"
        );

        Ok(AnalysisReport {
            run_id,
            generated_at: Utc::now(),
            config: self.config.clone(),
            kl,
            generalized,
            exclusions,
        })
    }

    fn kl_output(
        &self,
        cache: &ArtifactCache<'_>,
        assembler: &DistanceMatrixAssembler,
        exclusions: &mut ExclusionReport,
    ) -> DivergenceResult<AnalysisOutput> {
        let mut included = Vec::new();
        let mut models = Vec::new();
        for entry in cache.entries() {
            match entry.frequency() {
                Ok(model) => {
                    included.push(entry);
                    models.push(model);
                }
                Err(err) => exclusions.kl.push(exclude(entry.id(), err)),
            }
        }

        let assembly = assembler.build_indexed(ids_of(&included), |i, j| {
            let d = self.kl.distance(models[i], models[j]);
            tracing::trace!(a = included[i].id(), b = included[j].id(), kl = d, "KL divergence");
            Ok(d)
        })?;
        Ok(output(assembly, &included, &mut exclusions.kl_missing_pairs))
    }

    fn generalized_output(
        &self,
        cache: &ArtifactCache<'_>,
        assembler: &DistanceMatrixAssembler,
        exclusions: &mut ExclusionReport,
    ) -> DivergenceResult<AnalysisOutput> {
        let mut included = Vec::new();
        for entry in cache.entries() {
            if entry.held_out().is_empty() {
                let err = DivergenceError::EmptyHeldOut {
                    id: entry.id().to_string(),
                };
                exclusions.generalized.push(exclude(entry.id(), &err));
                continue;
            }
            if entry.dictionary().is_degenerate() {
                let degenerate = degenerate_dictionary(entry);
                tracing::debug!(
                    id = entry.id(),
                    kind = ?degenerate.kind,
                    "Degenerate dictionary, divergence collapses toward 0"
                );
                exclusions.degenerate_dictionaries.push(degenerate);
            }
            included.push(entry);
        }

        let assembly = assembler.build_indexed(ids_of(&included), |i, j| {
            self.generalized
                .breakdown_sides(included[i].side(), included[j].side())
                .map(|cross| cross.divergence())
        })?;
        Ok(output(assembly, &included, &mut exclusions.generalized_missing_pairs))
    }
}

fn check(abort: &AbortHandle) -> DivergenceResult<()> {
    if abort.is_aborted() {
        tracing::warn!("Divergence analysis aborted by caller");
        return Err(DivergenceError::Aborted);
    }
    Ok(())
}

/// Keep the first corpus per id; report the rest.
fn dedupe<'a>(corpora: &'a [Corpus], exclusions: &mut ExclusionReport) -> Vec<&'a Corpus> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(corpora.len());
    for corpus in corpora {
        if seen.insert(corpus.id()) {
            unique.push(corpus);
            continue;
        }
        tracing::warn!(id = corpus.id(), "Duplicate corpus id, keeping first occurrence");
        let exclusion = Exclusion {
            id: corpus.id().to_string(),
            kind: FailureKind::DuplicateId,
            message: "id already used by an earlier corpus".to_string(),
        };
        exclusions.kl.push(exclusion.clone());
        exclusions.generalized.push(exclusion);
    }
    unique
}

fn exclude(id: &str, err: &DivergenceError) -> Exclusion {
    tracing::warn!(id, error = %err, "Corpus excluded from matrix");
    Exclusion {
        id: id.to_string(),
        kind: err.failure_kind().unwrap_or(FailureKind::CompressionFailure),
        message: err.to_string(),
    }
}

fn degenerate_dictionary(entry: &CorpusArtifacts<'_>) -> Exclusion {
    let training = entry.corpus().halves().0;
    let (kind, message) = if training.is_empty() {
        (FailureKind::EmptyDictionarySource, "training half is empty".to_string())
    } else {
        (
            FailureKind::NoDictionaryPatterns,
            format!("no words or n-grams qualify in {} training bytes", training.len()),
        )
    };
    Exclusion {
        id: entry.id().to_string(),
        kind,
        message,
    }
}

fn ids_of(entries: &[&CorpusArtifacts<'_>]) -> Vec<String> {
    entries.iter().map(|e| e.id().to_string()).collect()
}

fn output(
    assembly: Assembly,
    included: &[&CorpusArtifacts<'_>],
    missing_pairs: &mut Vec<PairFailure>,
) -> AnalysisOutput {
    missing_pairs.extend(assembly.failures);
    let entropy_values: BTreeMap<String, f64> = included
        .iter()
        .map(|e| (e.id().to_string(), e.entropy()))
        .collect();
    let categories: BTreeMap<String, String> = included
        .iter()
        .map(|e| (e.id().to_string(), e.corpus().category().to_string()))
        .collect();
    AnalysisOutput {
        matrix: assembly.matrix,
        entropy_values,
        categories,
    }
}
