//! Per-run artifact cache.
//!
//! Every artifact a pair computation needs is derived once per corpus before
//! the fan-out starts. After [`ArtifactCache::build`] returns, the cache is
//! only ever read, so pair tasks can share it without locking.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::config::EngineConfig;
use crate::corpus::Corpus;
use crate::dictionary::{Dictionary, DictionaryBuilder};
use crate::error::DivergenceResult;
use crate::frequency::{FrequencyModel, SymbolDistribution};
use crate::generalized::CompressionSide;

/// Derived artifacts of one corpus.
#[derive(Debug)]
pub struct CorpusArtifacts<'a> {
    corpus: &'a Corpus,
    frequency: DivergenceResult<FrequencyModel>,
    entropy: f64,
    dictionary: Dictionary,
}

impl<'a> CorpusArtifacts<'a> {
    fn derive(corpus: &'a Corpus, builder: &DictionaryBuilder, config: &EngineConfig) -> Self {
        let distribution = SymbolDistribution::from_bytes(corpus.bytes(), config.kl.symbol_unit);
        let entropy = distribution.entropy();
        let frequency = FrequencyModel::from_distribution(distribution);
        let dictionary = builder.build(corpus.bytes());

        tracing::debug!(
            id = corpus.id(),
            bytes = corpus.len(),
            entropy,
            frequency_ok = frequency.is_ok(),
            dictionary_degenerate = dictionary.is_degenerate(),
            "Corpus artifacts derived"
        );

        Self {
            corpus,
            frequency,
            entropy,
            dictionary,
        }
    }

    /// Corpus id.
    pub fn id(&self) -> &'a str {
        self.corpus.id()
    }

    /// Source corpus.
    pub fn corpus(&self) -> &'a Corpus {
        self.corpus
    }

    /// Frequency model, or the reason it is undefined.
    pub fn frequency(&self) -> &DivergenceResult<FrequencyModel> {
        &self.frequency
    }

    /// Shannon entropy of the symbol distribution in bits (0 for degenerate corpora).
    pub fn entropy(&self) -> f64 {
        self.entropy
    }

    /// Dictionary built from the training half.
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Held-out second half.
    pub fn held_out(&self) -> &'a [u8] {
        self.corpus.halves().1
    }

    /// View used for cross-compression.
    pub fn side(&self) -> CompressionSide<'_> {
        CompressionSide {
            id: self.id(),
            dictionary: &self.dictionary,
            held_out: self.held_out(),
        }
    }
}

/// Frozen per-run cache of corpus artifacts, keyed by corpus id.
#[derive(Debug)]
pub struct ArtifactCache<'a> {
    entries: Vec<CorpusArtifacts<'a>>,
    index: HashMap<&'a str, usize>,
}

impl<'a> ArtifactCache<'a> {
    /// Derive artifacts for every corpus, in parallel when configured.
    ///
    /// Ids are expected to be unique; a repeated id resolves to its first entry.
    pub fn build(corpora: &[&'a Corpus], config: &EngineConfig) -> Self {
        let builder = DictionaryBuilder::new(config.dictionary.clone());
        let entries: Vec<CorpusArtifacts<'a>> = if config.parallel {
            corpora
                .par_iter()
                .map(|&corpus| CorpusArtifacts::derive(corpus, &builder, config))
                .collect()
        } else {
            corpora
                .iter()
                .map(|&corpus| CorpusArtifacts::derive(corpus, &builder, config))
                .collect()
        };

        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            index.entry(entry.id()).or_insert(position);
        }
        Self { entries, index }
    }

    /// Artifacts for `id`.
    pub fn get(&self, id: &str) -> Option<&CorpusArtifacts<'a>> {
        self.index.get(id).map(|&position| &self.entries[position])
    }

    /// All entries in input order.
    pub fn entries(&self) -> &[CorpusArtifacts<'a>] {
        &self.entries
    }

    /// Number of cached corpora.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache holds no corpora.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
