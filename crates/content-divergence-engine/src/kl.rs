//! Symmetrized KL divergence between character-frequency models.
//!
//! # Mathematical Background
//!
//! KL divergence from distribution P to Q, in bits:
//! ```text
//! D_KL(P || Q) = sum_i P(i) * log2(P(i) / Q(i))
//! ```
//!
//! The engine reports the symmetrized form:
//! ```text
//! D_sym(P, Q) = 0.5 * D_KL(P || Q) + 0.5 * D_KL(Q || P)
//! ```
//!
//! # Probability floor
//!
//! Both distributions are taken over the union of their symbols. Every
//! probability is raised to at least `min_freq` and each side is then
//! renormalized to sum to 1, so a symbol present in one corpus and absent from
//! the other yields a large but finite divergence.

use std::collections::BTreeSet;

use crate::config::{KlConfig, DEFAULT_MIN_FREQ};
use crate::error::{DivergenceError, DivergenceResult};
use crate::frequency::{FrequencyModel, SymbolDistribution};

/// Symmetrized KL divergence calculator.
///
/// # Example
///
/// ```
/// use content_divergence_engine::frequency::FrequencyModel;
/// use content_divergence_engine::kl::KlDivergenceCalculator;
///
/// let calc = KlDivergenceCalculator::default();
/// let a = FrequencyModel::compute("hello world").unwrap();
/// let b = FrequencyModel::compute("bonjour le monde").unwrap();
///
/// assert_eq!(calc.distance(&a, &a), 0.0);
/// assert_eq!(calc.distance(&a, &b), calc.distance(&b, &a));
/// assert!(calc.distance(&a, &b) > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct KlDivergenceCalculator {
    /// Probability floor applied before renormalization.
    min_freq: f64,
}

impl Default for KlDivergenceCalculator {
    fn default() -> Self {
        Self {
            min_freq: DEFAULT_MIN_FREQ,
        }
    }
}

impl KlDivergenceCalculator {
    /// Create a calculator from the KL configuration.
    pub fn from_config(config: &KlConfig) -> Self {
        Self {
            min_freq: config.min_freq,
        }
    }

    /// Create a calculator with a custom probability floor.
    ///
    /// # Errors
    ///
    /// Returns `DivergenceError::InvalidParameter` unless `min_freq` is in `(0, 0.5]`.
    pub fn new(min_freq: f64) -> DivergenceResult<Self> {
        if !(min_freq > 0.0 && min_freq <= 0.5) {
            return Err(DivergenceError::invalid_param(
                "min_freq",
                min_freq,
                "Must be in range (0, 0.5]",
            ));
        }
        Ok(Self { min_freq })
    }

    /// Get the probability floor.
    pub fn min_freq(&self) -> f64 {
        self.min_freq
    }

    /// Symmetrized KL divergence between two frequency models, in bits.
    ///
    /// Always non-negative, exactly zero for identical models and exactly
    /// symmetric in its arguments.
    pub fn distance(&self, a: &FrequencyModel, b: &FrequencyModel) -> f64 {
        self.divergence(a.distribution(), b.distribution())
    }

    /// Symmetrized KL divergence between raw distributions, in bits.
    ///
    /// Unlike [`distance`](Self::distance) this accepts degenerate
    /// (single-symbol or empty) distributions.
    pub fn divergence(&self, a: &SymbolDistribution, b: &SymbolDistribution) -> f64 {
        let (p, q) = self.aligned(a, b);
        if p.is_empty() {
            return 0.0;
        }

        let kl_pq = kl_bits(&p, &q);
        let kl_qp = kl_bits(&q, &p);
        let result = 0.5 * (kl_pq + kl_qp);

        if result.is_nan() {
            0.0
        } else {
            result.max(0.0)
        }
    }

    /// Floored and renormalized probability vectors over the symbol union.
    fn aligned(&self, a: &SymbolDistribution, b: &SymbolDistribution) -> (Vec<f64>, Vec<f64>) {
        let union: BTreeSet<char> = a
            .probabilities()
            .keys()
            .chain(b.probabilities().keys())
            .copied()
            .collect();

        let p = self.floor_and_normalize(union.iter().map(|&s| a.probability(s)));
        let q = self.floor_and_normalize(union.iter().map(|&s| b.probability(s)));
        (p, q)
    }

    fn floor_and_normalize(&self, probabilities: impl Iterator<Item = f64>) -> Vec<f64> {
        let mut floored: Vec<f64> = probabilities.map(|p| p.max(self.min_freq)).collect();
        let sum: f64 = floored.iter().sum();
        if sum > 0.0 {
            for p in &mut floored {
                *p /= sum;
            }
        }
        floored
    }
}

/// One-directional KL divergence in bits over aligned vectors.
fn kl_bits(p: &[f64], q: &[f64]) -> f64 {
    p.iter()
        .zip(q)
        .filter(|&(&p_i, _)| p_i > 0.0)
        .map(|(&p_i, &q_i)| p_i * (p_i / q_i).log2())
        .sum()
}
