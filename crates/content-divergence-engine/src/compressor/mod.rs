//! Static, dictionary-primable compressors.
//!
//! Every backend implements [`DivergenceCompressor`]. The contract:
//!
//! - **Static**: one fixed model per call and no state carried between calls,
//!   so repeating a call always gives the same output. Any size difference
//!   between two calls comes from the dictionary alone.
//! - **Round-trip**: `decompress(encode(data, d), d) == data` for any data and
//!   dictionary, including no dictionary on both sides.
//! - **Padding-blind**: trailing zero padding of a dictionary is ignored, so
//!   an all-zero dictionary behaves exactly like no dictionary.
//!
//! Backends are chosen at configuration time through [`CompressorKind`].

mod bits;
mod deflate_fixed;
mod huffman;
mod lz;
mod primed_huffman;

pub use deflate_fixed::DeflateFixedCompressor;
pub use primed_huffman::PrimedHuffmanCompressor;

use crate::config::{CompressorConfig, CompressorKind};
use crate::dictionary::Dictionary;
use crate::error::{DivergenceError, DivergenceResult};

/// Capability shared by all compressor backends.
pub trait DivergenceCompressor: Send + Sync + std::fmt::Debug {
    /// Stable backend name.
    fn name(&self) -> &'static str;

    /// Compress `data`, optionally primed with `dictionary`.
    fn encode(&self, data: &[u8], dictionary: Option<&Dictionary>) -> DivergenceResult<Vec<u8>>;

    /// Reverse [`encode`](Self::encode) given the same dictionary.
    fn decompress(
        &self,
        compressed: &[u8],
        dictionary: Option<&Dictionary>,
    ) -> DivergenceResult<Vec<u8>>;

    /// Compressed size in bytes.
    fn compress(&self, data: &[u8], dictionary: Option<&Dictionary>) -> DivergenceResult<usize> {
        Ok(self.encode(data, dictionary)?.len())
    }

    /// Compressed size in bytes, after checking the stream decodes back to `data`.
    fn compress_verified(
        &self,
        data: &[u8],
        dictionary: Option<&Dictionary>,
    ) -> DivergenceResult<usize> {
        let encoded = self.encode(data, dictionary)?;
        let decoded = self.decompress(&encoded, dictionary)?;
        if decoded != data {
            return Err(DivergenceError::RoundTripMismatch {
                expected: data.len(),
                actual: decoded.len(),
            });
        }
        Ok(encoded.len())
    }
}

impl CompressorKind {
    /// Instantiate the backend this kind names.
    pub fn build(&self, config: &CompressorConfig) -> DivergenceResult<Box<dyn DivergenceCompressor>> {
        let compressor: Box<dyn DivergenceCompressor> = match self {
            CompressorKind::DeflateFixed => Box::new(DeflateFixedCompressor::new(config.max_chain)?),
            CompressorKind::PrimedHuffman => Box::new(PrimedHuffmanCompressor::new()),
        };
        Ok(compressor)
    }
}

/// Instantiate the backend selected by `config`.
pub fn from_config(config: &CompressorConfig) -> DivergenceResult<Box<dyn DivergenceCompressor>> {
    config.kind.build(config)
}
