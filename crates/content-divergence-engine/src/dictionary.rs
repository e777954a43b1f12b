//! Frequency-ranked compression dictionaries.
//!
//! A dictionary is a fixed-size byte buffer built from the first half of a
//! corpus. It is packed greedily, in priority order, with:
//!
//! 1. word tokens seen at least `word_min_count` times, each as `" word "`;
//! 2. character trigrams seen at least `trigram_min_count` times;
//! 3. character bigrams seen at least `bigram_min_count` times.
//!
//! N-grams already contained in the packed content are skipped. Within each
//! class, candidates are ranked by count (descending) and then by first
//! occurrence, and packing of a class stops at the first candidate that would
//! overflow the budget. The buffer is then zero-padded to the budget.
//!
//! The builder never reads past the training half: the second half of a corpus
//! is reserved as held-out text for cross-compression.

use std::collections::HashMap;

use crate::config::DictionaryConfig;
use crate::corpus::split_halves;

/// Fixed-size compression dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dictionary {
    bytes: Vec<u8>,
}

impl Dictionary {
    /// Dictionary of `size` zero bytes.
    pub fn zeroed(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
        }
    }

    /// Wrap raw bytes as a dictionary.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Full buffer, padding included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Buffer size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the buffer has zero length.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Buffer without its trailing zero padding.
    ///
    /// This is what compressors prime their model with, so an all-zero
    /// dictionary primes exactly like no dictionary at all.
    pub fn content(&self) -> &[u8] {
        let end = self
            .bytes
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |last| last + 1);
        &self.bytes[..end]
    }

    /// Check if the dictionary holds nothing but zero bytes.
    pub fn is_degenerate(&self) -> bool {
        self.content().is_empty()
    }
}

/// Candidate pattern with its rank keys.
#[derive(Debug)]
struct Candidate {
    pattern: String,
    count: usize,
    first_seen: usize,
}

/// Deterministic dictionary builder.
///
/// # Example
///
/// ```
/// use content_divergence_engine::dictionary::DictionaryBuilder;
///
/// let builder = DictionaryBuilder::with_size(64);
/// let corpus = b"the cat and the hat and the bat | held-out text is never read";
///
/// let dict = builder.build(corpus);
/// assert_eq!(dict.len(), 64);
/// assert!(dict.content().starts_with(b" the "));
/// assert_eq!(dict, builder.build(corpus));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DictionaryBuilder {
    config: DictionaryConfig,
}

impl DictionaryBuilder {
    /// Create a builder from the dictionary configuration.
    pub fn new(config: DictionaryConfig) -> Self {
        Self { config }
    }

    /// Create a builder with default counts and a custom byte budget.
    pub fn with_size(size: usize) -> Self {
        Self::new(DictionaryConfig {
            size,
            ..Default::default()
        })
    }

    /// Byte budget of built dictionaries.
    pub fn target_size(&self) -> usize {
        self.config.size
    }

    /// Build a dictionary from the training half of `corpus`.
    ///
    /// An empty training half yields an all-zero dictionary.
    pub fn build(&self, corpus: &[u8]) -> Dictionary {
        let (training, _) = split_halves(corpus);
        self.build_from_training(training)
    }

    /// Build a dictionary from text that is already the training half.
    pub fn build_from_training(&self, training: &[u8]) -> Dictionary {
        let target = self.config.size;
        if training.is_empty() {
            tracing::debug!(target_size = target, "Empty training half, dictionary is all zeros");
            return Dictionary::zeroed(target);
        }

        let text = String::from_utf8_lossy(training);
        let chars: Vec<char> = text.chars().collect();

        let mut packed = String::new();

        let words = rank(word_counts(&text), self.config.word_min_count);
        for word in &words {
            let entry = format!(" {} ", word.pattern);
            if packed.len() + entry.len() > target {
                break;
            }
            packed.push_str(&entry);
        }

        let trigrams = rank(ngram_counts(&chars, 3), self.config.trigram_min_count);
        pack_ngrams(&mut packed, &trigrams, target);

        let bigrams = rank(ngram_counts(&chars, 2), self.config.bigram_min_count);
        pack_ngrams(&mut packed, &bigrams, target);

        tracing::trace!(
            words = words.len(),
            trigrams = trigrams.len(),
            bigrams = bigrams.len(),
            packed = packed.len(),
            target_size = target,
            "Dictionary packed"
        );

        let mut bytes = packed.into_bytes();
        bytes.resize(target, 0);
        Dictionary { bytes }
    }
}

fn pack_ngrams(packed: &mut String, candidates: &[Candidate], target: usize) {
    for candidate in candidates {
        if packed.contains(candidate.pattern.as_str()) {
            continue;
        }
        if packed.len() + candidate.pattern.len() > target {
            break;
        }
        packed.push_str(&candidate.pattern);
    }
}

/// Keep candidates with at least `min_count` occurrences, most frequent first.
fn rank(counts: HashMap<String, (usize, usize)>, min_count: usize) -> Vec<Candidate> {
    let mut ranked: Vec<Candidate> = counts
        .into_iter()
        .filter(|(_, (count, _))| *count >= min_count)
        .map(|(pattern, (count, first_seen))| Candidate {
            pattern,
            count,
            first_seen,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then(a.first_seen.cmp(&b.first_seen))
    });
    ranked
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Occurrence count and first-occurrence index of each word token.
fn word_counts(text: &str) -> HashMap<String, (usize, usize)> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    let words = text
        .split(|c: char| !is_word_char(c))
        .filter(|w| !w.is_empty());
    for (index, word) in words.enumerate() {
        counts.entry(word.to_string()).or_insert((0, index)).0 += 1;
    }
    counts
}

/// An n-gram qualifies if it is all alphanumeric or contains a space.
fn qualifies(gram: &[char]) -> bool {
    if gram.contains(&char::REPLACEMENT_CHARACTER) {
        return false;
    }
    gram.iter().all(|c| c.is_alphanumeric()) || gram.contains(&' ')
}

/// Occurrence count and first-occurrence index of each qualifying n-gram.
fn ngram_counts(chars: &[char], n: usize) -> HashMap<String, (usize, usize)> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (index, gram) in chars.windows(n).enumerate() {
        if !qualifies(gram) {
            continue;
        }
        let pattern: String = gram.iter().collect();
        counts.entry(pattern).or_insert((0, index)).0 += 1;
    }
    counts
}
