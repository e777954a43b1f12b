//! Helper Functions: Deterministic Corpus Generation (NO MOCKS)

use content_divergence_engine::Corpus;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Bytes from a seeded ChaCha20 stream. Same seed, same bytes.
pub fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut bytes = vec![0u8; len];
    rng.fill_bytes(&mut bytes);
    bytes
}

/// Text of roughly `len` bytes drawn word by word from `vocabulary`.
pub fn word_text(vocabulary: &[&str], len: usize, seed: u64) -> String {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut text = String::with_capacity(len + 16);
    while text.len() < len {
        text.push_str(vocabulary[rng.gen_range(0..vocabulary.len())]);
        text.push(' ');
    }
    text
}

/// `unit` repeated until the result is exactly `len` bytes.
pub fn repeated(unit: &str, len: usize) -> Vec<u8> {
    unit.bytes().cycle().take(len).collect()
}

pub const ENGLISH: &[&str] = &[
    "the", "of", "and", "to", "in", "is", "that", "it", "was", "for", "on", "are", "with",
    "they", "be", "at", "one", "have", "this", "from", "word", "but", "what", "some", "we",
];

pub const FINNISH: &[&str] = &[
    "ja", "on", "ei", "se", "että", "hän", "oli", "ole", "kuin", "mutta", "niin", "kun",
    "tämä", "jo", "vain", "myös", "nyt", "sitten", "kanssa", "koska", "mitä", "siitä",
];

pub const SPANISH: &[&str] = &[
    "el", "la", "de", "que", "y", "en", "un", "ser", "se", "no", "haber", "por", "con", "su",
    "para", "como", "estar", "tener", "le", "lo", "todo", "pero", "más", "hacer",
];

/// Three language corpora of about `len` bytes each.
pub fn language_corpora(len: usize) -> Vec<Corpus> {
    vec![
        Corpus::new("lang_english", word_text(ENGLISH, len, 1)),
        Corpus::new("lang_finnish", word_text(FINNISH, len, 2)),
        Corpus::new("lang_spanish", word_text(SPANISH, len, 3)),
    ]
}

/// `n` corpora with distinct generated content.
pub fn numbered_corpora(n: usize, len: usize) -> Vec<Corpus> {
    let vocabularies = [ENGLISH, FINNISH, SPANISH];
    (0..n)
        .map(|i| {
            let vocabulary = vocabularies[i % vocabularies.len()];
            Corpus::new(format!("set_{:02}", i), word_text(vocabulary, len, 100 + i as u64))
        })
        .collect()
}
