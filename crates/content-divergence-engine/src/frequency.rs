//! Per-corpus symbol frequency models.
//!
//! A [`SymbolDistribution`] is the raw relative-frequency table of a text.
//! A [`FrequencyModel`] is a distribution that is valid for KL divergence
//! (at least two distinct symbols), together with its Shannon entropy.
//!
//! # Symbols
//!
//! Text corpora are counted per Unicode scalar value. Corpora that are not
//! valid UTF-8 are counted per byte, with each byte mapped to the code point of
//! the same value, so both kinds share the `char` key space.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DivergenceError, DivergenceResult};

/// What counts as one symbol when counting frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolUnit {
    /// Characters for valid UTF-8, bytes otherwise.
    #[default]
    Auto,
    /// Unicode scalar values; invalid sequences become U+FFFD.
    Char,
    /// Raw bytes.
    Byte,
}

/// Relative frequency of every observed symbol.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SymbolDistribution {
    probabilities: BTreeMap<char, f64>,
}

impl SymbolDistribution {
    /// Count symbols in `bytes` according to `unit`.
    pub fn from_bytes(bytes: &[u8], unit: SymbolUnit) -> Self {
        let counts = match unit {
            SymbolUnit::Byte => count_bytes(bytes),
            SymbolUnit::Char => count_chars(&String::from_utf8_lossy(bytes)),
            SymbolUnit::Auto => match std::str::from_utf8(bytes) {
                Ok(text) => count_chars(text),
                Err(_) => count_bytes(bytes),
            },
        };
        Self::from_counts(counts)
    }

    /// Count characters of a string.
    pub fn from_text(text: &str) -> Self {
        Self::from_counts(count_chars(text))
    }

    /// Normalize raw counts into probabilities.
    pub fn from_counts(counts: BTreeMap<char, u64>) -> Self {
        let total: u64 = counts.values().sum();
        if total == 0 {
            return Self::default();
        }
        let total = total as f64;
        let probabilities = counts
            .into_iter()
            .filter(|&(_, count)| count > 0)
            .map(|(symbol, count)| (symbol, count as f64 / total))
            .collect();
        Self { probabilities }
    }

    /// Probability of `symbol`, zero if it was never observed.
    pub fn probability(&self, symbol: char) -> f64 {
        self.probabilities.get(&symbol).copied().unwrap_or(0.0)
    }

    /// All observed symbols with their probabilities, in code point order.
    pub fn probabilities(&self) -> &BTreeMap<char, f64> {
        &self.probabilities
    }

    /// Number of distinct observed symbols.
    pub fn distinct_symbols(&self) -> usize {
        self.probabilities.len()
    }

    /// Check if nothing was observed.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Shannon entropy in bits.
    pub fn entropy(&self) -> f64 {
        self.probabilities
            .values()
            .filter(|&&p| p > 0.0)
            .map(|&p| -p * p.log2())
            .sum::<f64>()
            .max(0.0)
    }
}

/// Character probability distribution of one corpus plus its entropy.
///
/// # Example
///
/// ```
/// use content_divergence_engine::frequency::FrequencyModel;
///
/// let model = FrequencyModel::compute("abab").unwrap();
/// assert_eq!(model.probability('a'), 0.5);
/// assert!((model.entropy() - 1.0).abs() < 1e-12);
///
/// assert!(FrequencyModel::compute("aaaa").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyModel {
    distribution: SymbolDistribution,
    entropy: f64,
}

impl FrequencyModel {
    /// Build a model from text.
    ///
    /// # Errors
    ///
    /// Returns `DivergenceError::NotEnoughData` if the text has fewer than
    /// 2 distinct characters.
    pub fn compute(text: &str) -> DivergenceResult<Self> {
        Self::from_distribution(SymbolDistribution::from_text(text))
    }

    /// Build a model from raw corpus bytes.
    pub fn compute_bytes(bytes: &[u8], unit: SymbolUnit) -> DivergenceResult<Self> {
        Self::from_distribution(SymbolDistribution::from_bytes(bytes, unit))
    }

    /// Wrap a distribution, enforcing the two-symbol minimum.
    pub fn from_distribution(distribution: SymbolDistribution) -> DivergenceResult<Self> {
        let distinct = distribution.distinct_symbols();
        if distinct < 2 {
            return Err(DivergenceError::NotEnoughData { distinct });
        }
        let entropy = distribution.entropy();
        Ok(Self {
            distribution,
            entropy,
        })
    }

    /// Shannon entropy in bits.
    pub fn entropy(&self) -> f64 {
        self.entropy
    }

    /// Probability of `symbol`, zero if absent.
    pub fn probability(&self, symbol: char) -> f64 {
        self.distribution.probability(symbol)
    }

    /// All probabilities, in code point order.
    pub fn probabilities(&self) -> &BTreeMap<char, f64> {
        self.distribution.probabilities()
    }

    /// Underlying distribution.
    pub fn distribution(&self) -> &SymbolDistribution {
        &self.distribution
    }
}

fn count_chars(text: &str) -> BTreeMap<char, u64> {
    let mut counts = BTreeMap::new();
    for c in text.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }
    counts
}

fn count_bytes(bytes: &[u8]) -> BTreeMap<char, u64> {
    let mut histogram = [0u64; 256];
    for &b in bytes {
        histogram[b as usize] += 1;
    }
    histogram
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .map(|(b, &count)| (char::from(b as u8), count))
        .collect()
}
