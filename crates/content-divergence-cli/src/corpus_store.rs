//! Directory-backed corpus store.
//!
//! Every regular `*.txt` file directly inside the directory is one corpus.
//! The id is the file stem; files are loaded in id order so runs are
//! reproducible regardless of directory listing order.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use content_divergence_engine::Corpus;

const CORPUS_EXTENSION: &str = "txt";

/// Load all corpora from `dir`, sorted by id.
pub fn load_dir(dir: &Path) -> Result<Vec<Corpus>> {
    if !dir.is_dir() {
        bail!("corpus directory {} does not exist", dir.display());
    }

    let mut corpora = Vec::new();
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to list corpus directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(CORPUS_EXTENSION) {
            continue;
        }
        let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
            tracing::warn!(path = %path.display(), "Skipping corpus with non-UTF-8 file name");
            continue;
        };
        let text = fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
        tracing::debug!(id, bytes = text.len(), "Loaded corpus");
        corpora.push(Corpus::new(id, text));
    }

    corpora.sort_by(|a, b| a.id().cmp(b.id()));
    tracing::info!(count = corpora.len(), dir = %dir.display(), "Corpora loaded");
    Ok(corpora)
}
