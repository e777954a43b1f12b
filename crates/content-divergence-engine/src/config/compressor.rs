//! Compressor backend settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Available static, dictionary-primable compressor backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressorKind {
    /// LZ77 over a dictionary-primed window + one fixed-Huffman DEFLATE block.
    #[default]
    DeflateFixed,
    /// Order-0 canonical Huffman with code lengths taken from dictionary byte counts.
    PrimedHuffman,
}

impl CompressorKind {
    /// Stable name used in configuration files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompressorKind::DeflateFixed => "deflate_fixed",
            CompressorKind::PrimedHuffman => "primed_huffman",
        }
    }

    /// All backends.
    pub fn all() -> [CompressorKind; 2] {
        [CompressorKind::DeflateFixed, CompressorKind::PrimedHuffman]
    }
}

impl fmt::Display for CompressorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompressorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "deflate_fixed" | "deflate" => Ok(CompressorKind::DeflateFixed),
            "primed_huffman" | "huffman" => Ok(CompressorKind::PrimedHuffman),
            other => Err(format!(
                "unknown compressor '{}', expected one of: deflate_fixed, primed_huffman",
                other
            )),
        }
    }
}

/// Compressor backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressorConfig {
    /// Which backend measures cross-compression.
    pub kind: CompressorKind,

    /// Maximum hash-chain candidates examined per position (LZ backends).
    /// Range: `[1, 4096]`
    pub max_chain: usize,

    /// Decode every measured stream and compare it against the input.
    pub verify_round_trip: bool,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            kind: CompressorKind::DeflateFixed,
            max_chain: 128,
            verify_round_trip: true,
        }
    }
}

impl CompressorConfig {
    /// Validate the compressor configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=4096).contains(&self.max_chain) {
            return Err(format!(
                "max_chain must be in [1, 4096], got {}",
                self.max_chain
            ));
        }
        Ok(())
    }
}
