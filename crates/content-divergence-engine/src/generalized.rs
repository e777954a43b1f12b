//! Cross-compression ("generalized") divergence between corpora.
//!
//! For each corpus a dictionary is built from its first half and its second
//! half is held out. The divergence from A to B is the extra bits per
//! held-out byte A pays when compressed with B's dictionary instead of its
//! own:
//!
//! ```text
//! self_A  = 8 * |compress(held_A, dict_A)| / |held_A|
//! cross_A = 8 * |compress(held_A, dict_B)| / |held_A|
//! D(A, B) = ((cross_A - self_A) + (cross_B - self_B)) / 2
//! ```
//!
//! Greedy matching can make a foreign dictionary marginally beat a corpus's
//! own, so slightly negative values are possible. They are reported as
//! computed. When a training half is empty its dictionary is all zeros and
//! primes nothing, pulling that pair's divergence toward 0.

use serde::{Deserialize, Serialize};

use crate::compressor::{self, DivergenceCompressor};
use crate::config::EngineConfig;
use crate::corpus::Corpus;
use crate::dictionary::{Dictionary, DictionaryBuilder};
use crate::error::{DivergenceError, DivergenceResult};

/// Dictionary and held-out half of one corpus, ready for cross-compression.
#[derive(Debug, Clone, Copy)]
pub struct CompressionSide<'a> {
    /// Corpus id, for error reporting.
    pub id: &'a str,
    /// Dictionary built from the training half.
    pub dictionary: &'a Dictionary,
    /// Held-out second half.
    pub held_out: &'a [u8],
}

/// Per-direction cross-compression costs in bits per held-out byte.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossCompression {
    /// A's held-out text with A's dictionary.
    pub self_a: f64,
    /// A's held-out text with B's dictionary.
    pub cross_a: f64,
    /// B's held-out text with B's dictionary.
    pub self_b: f64,
    /// B's held-out text with A's dictionary.
    pub cross_b: f64,
}

impl CrossCompression {
    /// Excess cost of coding A with B's dictionary.
    pub fn a_to_b(&self) -> f64 {
        self.cross_a - self.self_a
    }

    /// Excess cost of coding B with A's dictionary.
    pub fn b_to_a(&self) -> f64 {
        self.cross_b - self.self_b
    }

    /// Symmetrized divergence: mean of both directions.
    pub fn divergence(&self) -> f64 {
        (self.a_to_b() + self.b_to_a()) / 2.0
    }
}

/// Cross-compression divergence calculator.
#[derive(Debug)]
pub struct GeneralizedDivergenceCalculator {
    builder: DictionaryBuilder,
    compressor: Box<dyn DivergenceCompressor>,
    verify_round_trip: bool,
}

impl GeneralizedDivergenceCalculator {
    /// Create a calculator from the engine configuration.
    pub fn from_config(config: &EngineConfig) -> DivergenceResult<Self> {
        Ok(Self {
            builder: DictionaryBuilder::new(config.dictionary.clone()),
            compressor: compressor::from_config(&config.compressor)?,
            verify_round_trip: config.compressor.verify_round_trip,
        })
    }

    /// Create a calculator from explicit parts.
    pub fn new(builder: DictionaryBuilder, compressor: Box<dyn DivergenceCompressor>) -> Self {
        Self {
            builder,
            compressor,
            verify_round_trip: true,
        }
    }

    /// Enable or disable round-trip verification of every measurement.
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify_round_trip = verify;
        self
    }

    /// Dictionary builder used for corpora passed to [`distance`](Self::distance).
    pub fn builder(&self) -> &DictionaryBuilder {
        &self.builder
    }

    /// Compressor backend in use.
    pub fn compressor(&self) -> &dyn DivergenceCompressor {
        self.compressor.as_ref()
    }

    /// Generalized divergence between two corpora, in bits per held-out byte.
    ///
    /// # Errors
    ///
    /// - `EmptyHeldOut` if either corpus is empty
    /// - compression errors from the backend
    pub fn distance(&self, a: &Corpus, b: &Corpus) -> DivergenceResult<f64> {
        Ok(self.breakdown(a, b)?.divergence())
    }

    /// Full per-direction costs for two corpora.
    pub fn breakdown(&self, a: &Corpus, b: &Corpus) -> DivergenceResult<CrossCompression> {
        let dict_a = self.builder.build(a.bytes());
        let dict_b = self.builder.build(b.bytes());
        let side_a = CompressionSide {
            id: a.id(),
            dictionary: &dict_a,
            held_out: a.halves().1,
        };
        let side_b = CompressionSide {
            id: b.id(),
            dictionary: &dict_b,
            held_out: b.halves().1,
        };
        self.breakdown_sides(side_a, side_b)
    }

    /// Per-direction costs from prebuilt dictionaries.
    pub fn breakdown_sides(
        &self,
        a: CompressionSide<'_>,
        b: CompressionSide<'_>,
    ) -> DivergenceResult<CrossCompression> {
        for side in [&a, &b] {
            if side.held_out.is_empty() {
                return Err(DivergenceError::EmptyHeldOut {
                    id: side.id.to_string(),
                });
            }
        }

        let result = CrossCompression {
            self_a: self.bits_per_byte(a.held_out, a.dictionary)?,
            cross_a: self.bits_per_byte(a.held_out, b.dictionary)?,
            self_b: self.bits_per_byte(b.held_out, b.dictionary)?,
            cross_b: self.bits_per_byte(b.held_out, a.dictionary)?,
        };

        tracing::trace!(
            a = a.id,
            b = b.id,
            self_a = result.self_a,
            cross_a = result.cross_a,
            self_b = result.self_b,
            cross_b = result.cross_b,
            "Cross-compression measured"
        );
        Ok(result)
    }

    fn bits_per_byte(&self, held_out: &[u8], dictionary: &Dictionary) -> DivergenceResult<f64> {
        let size = if self.verify_round_trip {
            self.compressor.compress_verified(held_out, Some(dictionary))?
        } else {
            self.compressor.compress(held_out, Some(dictionary))?
        };
        Ok(8.0 * size as f64 / held_out.len() as f64)
    }
}
