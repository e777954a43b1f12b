//! Dictionary construction settings.
//!
//! Controls the byte budget of the compression dictionary and the minimum
//! occurrence counts each candidate-pattern class needs before it is packed.

use serde::{Deserialize, Serialize};

/// Largest dictionary the compressors can address (one DEFLATE window).
pub const MAX_DICTIONARY_SIZE: usize = 32 * 1024;

/// Dictionary size commonly used for small corpora.
pub const SMALL_DICTIONARY_SIZE: usize = 1024;

/// Dictionary construction settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Dictionary size in bytes. Output is padded or truncated to exactly this.
    /// Range: `[1, 32768]`
    pub size: usize,

    /// Minimum occurrences for a word token to be packed.
    pub word_min_count: usize,

    /// Minimum occurrences for a character trigram to be packed.
    pub trigram_min_count: usize,

    /// Minimum occurrences for a character bigram to be packed.
    pub bigram_min_count: usize,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            size: SMALL_DICTIONARY_SIZE,
            word_min_count: 2,
            trigram_min_count: 2,
            bigram_min_count: 3,
        }
    }
}

impl DictionaryConfig {
    /// Settings for corpora large enough to fill a full 32 KiB window.
    pub fn large() -> Self {
        Self {
            size: MAX_DICTIONARY_SIZE,
            ..Default::default()
        }
    }

    /// Validate the dictionary configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.size == 0 || self.size > MAX_DICTIONARY_SIZE {
            return Err(format!(
                "size must be in [1, {}], got {}",
                MAX_DICTIONARY_SIZE, self.size
            ));
        }
        if self.word_min_count == 0 || self.trigram_min_count == 0 || self.bigram_min_count == 0 {
            return Err("minimum pattern counts must be >= 1".to_string());
        }
        Ok(())
    }
}
