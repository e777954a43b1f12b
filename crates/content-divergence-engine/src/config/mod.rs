//! Engine configuration types.
//!
//! This module defines the configuration for every component of the divergence
//! engine: frequency models and KL divergence, dictionary construction, and the
//! compressor backend used for cross-compression.
//!
//! Dictionary size and `min_freq` are the two numeric knobs external callers
//! usually tune; everything else has defaults that match common usage.

mod compressor;
mod dictionary;
mod kl;


pub use self::compressor::{CompressorConfig, CompressorKind};
pub use self::dictionary::{DictionaryConfig, MAX_DICTIONARY_SIZE, SMALL_DICTIONARY_SIZE};
pub use self::kl::{KlConfig, DEFAULT_MIN_FREQ};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DivergenceError, DivergenceResult};

/// Main engine configuration containing all subsystem settings.
///
/// # Example
///
/// ```
/// use content_divergence_engine::config::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.dictionary.size, 1024);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Dictionary construction settings.
    pub dictionary: DictionaryConfig,

    /// KL divergence settings.
    pub kl: KlConfig,

    /// Compressor backend settings.
    pub compressor: CompressorConfig,

    /// Fan pair computations out over the rayon pool.
    /// Results are identical either way.
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dictionary: DictionaryConfig::default(),
            kl: KlConfig::default(),
            compressor: CompressorConfig::default(),
            parallel: true,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for short corpora (a few KiB each): 1024-byte dictionaries.
    pub fn small_corpora() -> Self {
        Self::default()
    }

    /// Preset for larger corpora: 32 KiB dictionaries.
    pub fn large_corpora() -> Self {
        Self {
            dictionary: DictionaryConfig::large(),
            ..Default::default()
        }
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> DivergenceResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validated()
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> DivergenceResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validate the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<(), String> {
        self.dictionary.validate()?;
        self.kl.validate()?;
        self.compressor.validate()?;
        Ok(())
    }

    /// Consume the configuration, returning it if valid.
    pub fn validated(self) -> DivergenceResult<Self> {
        self.validate().map_err(DivergenceError::InvalidConfig)?;
        Ok(self)
    }
}
