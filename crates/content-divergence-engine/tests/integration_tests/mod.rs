//! Integration tests for the content divergence engine.
//!
//! These tests exercise the public API end to end with generated corpora
//! (NO MOCKS):
//! - KL divergence identity, symmetry and non-negativity
//! - Dictionary determinism and the train/held-out split
//! - Compressor round-trips over arbitrary bytes and dictionaries
//! - Matrix shape, zero diagonals and failure handling
//! - Whole-run scenarios through `DivergenceEngine`

mod helpers;
mod compressor_tests;
mod dictionary_tests;
mod kl_tests;
mod matrix_tests;
mod scenario_tests;
