//! Analyze command: one divergence run over a corpus directory.
//!
//! # Usage
//!
//! ```bash
//! content-divergence analyze --corpus-dir corpora/ --output-dir out/
//! content-divergence -v analyze --corpus-dir corpora/ --dictionary-size 32768 --compressor huffman
//! ```
//!
//! Writes `kl_divergence.json`, `generalized_divergence.json` and
//! `report.json` into the output directory and prints every exclusion.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use content_divergence_engine::{AnalysisReport, CompressorKind, DivergenceEngine, EngineConfig};
use serde::Serialize;
use tracing::{error, info};

use crate::corpus_store;

/// KL divergence output file.
pub const KL_OUTPUT: &str = "kl_divergence.json";
/// Generalized divergence output file.
pub const GENERALIZED_OUTPUT: &str = "generalized_divergence.json";
/// Full run report file.
pub const REPORT_OUTPUT: &str = "report.json";

/// Arguments for the analyze command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Directory of `<category>_<name>.txt` corpora
    #[arg(long)]
    pub corpus_dir: PathBuf,

    /// Directory the JSON outputs are written to (created if missing)
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// JSON engine configuration file; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Dictionary size in bytes (1..=32768)
    #[arg(long)]
    pub dictionary_size: Option<usize>,

    /// Probability floor for KL divergence
    #[arg(long)]
    pub min_freq: Option<f64>,

    /// Compressor backend (deflate_fixed | primed_huffman)
    #[arg(long)]
    pub compressor: Option<CompressorKind>,

    /// Compute pairs on the current thread only
    #[arg(long)]
    pub sequential: bool,
}

impl AnalyzeArgs {
    /// Resolve the engine configuration: file (or defaults), then flag overrides.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_json_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => EngineConfig::default(),
        };
        if let Some(size) = self.dictionary_size {
            config.dictionary.size = size;
        }
        if let Some(min_freq) = self.min_freq {
            config.kl.min_freq = min_freq;
        }
        if let Some(kind) = self.compressor {
            config.compressor.kind = kind;
        }
        if self.sequential {
            config.parallel = false;
        }
        Ok(config.validated()?)
    }
}

/// Execute the analyze command.
///
/// # Returns
///
/// Exit code:
/// - 0: Success (exclusions, if any, are reported but not fatal)
/// - 1: Configuration, input or output failure
pub fn handle_analyze(args: AnalyzeArgs) -> i32 {
    match run(&args) {
        Ok(report) => {
            println!(
                "KL matrix: {} corpora, generalized matrix: {} corpora -> {}",
                report.kl.ids().len(),
                report.generalized.ids().len(),
                args.output_dir.display()
            );
            for line in report.exclusions.summary_lines() {
                println!("  {}", line);
            }
            0
        }
        Err(e) => {
            error!("Analysis failed: {:#}", e);
            eprintln!("error: {:#}", e);
            1
        }
    }
}

fn run(args: &AnalyzeArgs) -> Result<AnalysisReport> {
    let config = args.engine_config()?;
    let engine = DivergenceEngine::new(config)?;
    let corpora = corpus_store::load_dir(&args.corpus_dir)?;

    let report = engine.analyze(&corpora)?;
    write_outputs(&report, &args.output_dir)?;
    info!(run_id = %report.run_id, output_dir = %args.output_dir.display(), "Outputs written");
    Ok(report)
}

/// Write the two metric outputs and the full report into `dir`.
pub fn write_outputs(report: &AnalysisReport, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    write_json(&dir.join(KL_OUTPUT), &report.kl)?;
    write_json(&dir.join(GENERALIZED_OUTPUT), &report.generalized)?;
    write_json(&dir.join(REPORT_OUTPUT), report)?;
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
