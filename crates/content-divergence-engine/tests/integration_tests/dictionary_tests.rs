//! Dictionary construction: determinism, budget and the held-out split.

use content_divergence_engine::config::{DictionaryConfig, MAX_DICTIONARY_SIZE};
use content_divergence_engine::DictionaryBuilder;

use super::helpers::{random_bytes, word_text, ENGLISH, FINNISH};

#[test]
fn test_build_twice_is_byte_identical() {
    let text = word_text(ENGLISH, 20_000, 5);
    for size in [64, 1024, MAX_DICTIONARY_SIZE] {
        let builder = DictionaryBuilder::with_size(size);
        let first = builder.build(text.as_bytes());
        let second = builder.build(text.as_bytes());
        assert_eq!(first.as_bytes(), second.as_bytes());
        assert_eq!(first.len(), size);
    }
}

#[test]
fn test_empty_input_is_all_zero() {
    let dict = DictionaryBuilder::with_size(1024).build(b"");
    assert_eq!(dict.len(), 1024);
    assert!(dict.as_bytes().iter().all(|&b| b == 0));
    assert!(dict.is_degenerate());
}

#[test]
fn test_held_out_half_is_never_read() {
    let training = word_text(ENGLISH, 3000, 11);
    let mut a = training.clone().into_bytes();
    let mut b = training.into_bytes();
    let half = a.len();
    a.extend_from_slice(&word_text(FINNISH, 10_000, 12).as_bytes()[..half]);
    b.extend_from_slice(&random_bytes(half, 13));

    let builder = DictionaryBuilder::new(DictionaryConfig::default());
    assert_eq!(builder.build(&a), builder.build(&b));
}

#[test]
fn test_small_source_is_zero_padded() {
    let dict = DictionaryBuilder::with_size(1024).build(b"echo echo echo echo | tail");
    let content = dict.content();
    assert!(!content.is_empty());
    assert!(content.len() < 1024);
    assert!(dict.as_bytes()[content.len()..].iter().all(|&b| b == 0));
}

#[test]
fn test_large_source_fills_budget() {
    let text = word_text(ENGLISH, 200_000, 21);
    let dict = DictionaryBuilder::with_size(256).build(text.as_bytes());
    assert_eq!(dict.len(), 256);
    assert!(dict.content().starts_with(b" "));
}

#[test]
fn test_binary_input_is_deterministic() {
    let bytes = random_bytes(4096, 77);
    let builder = DictionaryBuilder::with_size(1024);
    assert_eq!(builder.build(&bytes), builder.build(&bytes));
    assert_eq!(builder.build(&bytes).len(), 1024);
}
