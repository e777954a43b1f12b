//! Divergence engine error types.
//!
//! This module defines the error type shared by every component of the engine:
//! frequency models, KL divergence, dictionary construction, the compressors,
//! cross-compression divergence and the run orchestrator.
//!
//! Most errors are pair-local: the orchestrator records them in the run report
//! and keeps going. Only [`DivergenceError::Aborted`] and configuration errors
//! escape a whole run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while computing content divergence.
#[derive(Debug, Error)]
pub enum DivergenceError {
    /// Corpus has too few distinct symbols for a frequency model
    #[error("Not enough data: frequency model needs at least 2 distinct symbols, got {distinct}")]
    NotEnoughData {
        /// Number of distinct symbols observed
        distinct: usize,
    },

    /// Held-out evaluation half of a corpus is empty
    #[error("Held-out half of corpus '{id}' is empty")]
    EmptyHeldOut {
        /// Corpus id
        id: String,
    },

    /// Underlying coder failed to produce a stream
    #[error("Compression failure: {0}")]
    CompressionFailure(String),

    /// Compressed stream could not be decoded
    #[error("Corrupt compressed stream: {0}")]
    CorruptStream(String),

    /// Decoded output does not match the original input
    #[error("Round-trip mismatch: expected {expected} bytes, decoded {actual} bytes with differing content")]
    RoundTripMismatch {
        /// Length of the original input
        expected: usize,
        /// Length of the decoded output
        actual: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {value}. {reason}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Parameter value as string
        value: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Run aborted by the caller before results were committed
    #[error("Analysis run aborted by caller")]
    Aborted,

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// I/O error while reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for divergence operations.
pub type DivergenceResult<T> = Result<T, DivergenceError>;

impl From<serde_json::Error> for DivergenceError {
    fn from(err: serde_json::Error) -> Self {
        DivergenceError::SerializationError(err.to_string())
    }
}

/// Failure categories surfaced in the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Fewer than 2 distinct symbols; corpus left out of the KL matrix.
    NotEnoughData,
    /// Training half empty; dictionary is all zero bytes.
    EmptyDictionarySource,
    /// Training half has no qualifying words or n-grams; dictionary is all zero bytes.
    NoDictionaryPatterns,
    /// Coder error for a specific pair; that cell is omitted.
    CompressionFailure,
    /// Held-out half empty; generalized divergence undefined for the corpus.
    EmptyHeldOut,
    /// Id already used by an earlier corpus in the same run.
    DuplicateId,
}

impl DivergenceError {
    /// Create an invalid parameter error.
    pub fn invalid_param(
        name: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        DivergenceError::InvalidParameter {
            name: name.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a corrupt stream error.
    pub fn corrupt(reason: impl Into<String>) -> Self {
        DivergenceError::CorruptStream(reason.into())
    }

    /// Report category for this error, if it is one the report tracks.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            DivergenceError::NotEnoughData { .. } => Some(FailureKind::NotEnoughData),
            DivergenceError::EmptyHeldOut { .. } => Some(FailureKind::EmptyHeldOut),
            DivergenceError::CompressionFailure(_)
            | DivergenceError::CorruptStream(_)
            | DivergenceError::RoundTripMismatch { .. } => Some(FailureKind::CompressionFailure),
            _ => None,
        }
    }

    /// Check if this error only invalidates a single corpus or pair.
    ///
    /// Pair-local errors degrade the matrix; everything else fails the run.
    pub fn is_pair_local(&self) -> bool {
        self.failure_kind().is_some()
    }
}
