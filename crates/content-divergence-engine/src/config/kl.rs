//! KL divergence computation settings.
//!
//! Controls how character-frequency distributions are compared.

use serde::{Deserialize, Serialize};

use crate::frequency::SymbolUnit;

/// Default probability floor applied before renormalizing: `2^-10`.
pub const DEFAULT_MIN_FREQ: f64 = 1.0 / 1024.0;

/// KL divergence computation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KlConfig {
    /// Per-symbol probability floor applied before renormalization.
    /// Prevents infinite divergence when a symbol is absent from one side.
    /// Range: `(0.0, 0.5]`
    pub min_freq: f64,

    /// What counts as a symbol when building frequency models.
    pub symbol_unit: SymbolUnit,
}

impl Default for KlConfig {
    fn default() -> Self {
        Self {
            min_freq: DEFAULT_MIN_FREQ,
            symbol_unit: SymbolUnit::Auto,
        }
    }
}

impl KlConfig {
    /// Validate the KL configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.min_freq > 0.0 && self.min_freq <= 0.5) {
            return Err(format!(
                "min_freq must be in (0, 0.5], got {}",
                self.min_freq
            ));
        }
        Ok(())
    }
}
