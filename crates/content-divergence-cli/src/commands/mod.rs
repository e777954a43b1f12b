//! CLI command handlers
//!
//! # Modules
//!
//! - `analyze`: Run one divergence analysis and write its outputs

pub mod analyze;
