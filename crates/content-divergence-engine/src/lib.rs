//! Content divergence engine.
//!
//! This crate measures how far apart text corpora are using two
//! information-theoretic signals and assembles the results into symmetric
//! pairwise distance matrices:
//!
//! - **KL divergence** between character-frequency distributions, floored and
//!   symmetrized so it is finite, non-negative and exactly symmetric.
//! - **Generalized divergence**: the extra bits per held-out byte a corpus
//!   costs when compressed with another corpus's dictionary instead of its own.
//!
//! # Modules
//!
//! - [`config`]: Engine configuration and presets
//! - [`error`]: Error types and result aliases
//! - [`corpus`]: Named corpora and the train/held-out split
//! - [`frequency`]: Symbol distributions and frequency models
//! - [`kl`]: Symmetrized KL divergence
//! - [`dictionary`]: Frequency-ranked, fixed-size compression dictionaries
//! - [`compressor`]: Static, dictionary-primable compressor backends
//! - [`generalized`]: Cross-compression divergence
//! - [`matrix`]: Distance matrices and the pairwise fan-out
//! - [`engine`]: Run orchestration, artifact cache and reports
//!
//! # Example
//!
//! ```
//! use content_divergence_engine::{Corpus, DivergenceEngine, EngineConfig};
//!
//! let engine = DivergenceEngine::new(EngineConfig::small_corpora()).unwrap();
//! let corpora = vec![
//!     Corpus::new("lang_en", "the quick brown fox jumps over the lazy dog ".repeat(10)),
//!     Corpus::new("lang_de", "der schnelle braune fuchs springt ueber den faulen hund ".repeat(10)),
//! ];
//!
//! let report = engine.analyze(&corpora).unwrap();
//! assert!(report.kl.matrix.get("lang_en", "lang_de").unwrap() > 0.0);
//! assert_eq!(report.generalized.matrix.get("lang_de", "lang_de"), Some(0.0));
//! ```

pub mod compressor;
pub mod config;
pub mod corpus;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod frequency;
pub mod generalized;
pub mod kl;
pub mod matrix;

pub use compressor::DivergenceCompressor;
pub use config::{CompressorKind, EngineConfig};
pub use corpus::Corpus;
pub use dictionary::{Dictionary, DictionaryBuilder};
pub use engine::{AbortHandle, AnalysisOutput, AnalysisReport, DivergenceEngine};
pub use error::{DivergenceError, DivergenceResult, FailureKind};
pub use frequency::{FrequencyModel, SymbolDistribution, SymbolUnit};
pub use generalized::{CrossCompression, GeneralizedDivergenceCalculator};
pub use kl::KlDivergenceCalculator;
pub use matrix::{DistanceMatrix, DistanceMatrixAssembler};
