//! Compressor contract across backends: round-trip and static behaviour.

use content_divergence_engine::compressor;
use content_divergence_engine::config::{CompressorConfig, CompressorKind};
use content_divergence_engine::{Dictionary, DictionaryBuilder, DivergenceCompressor};

use super::helpers::{random_bytes, repeated, word_text, ENGLISH, SPANISH};

fn backends() -> Vec<Box<dyn DivergenceCompressor>> {
    CompressorKind::all()
        .iter()
        .map(|kind| {
            compressor::from_config(&CompressorConfig {
                kind: *kind,
                ..Default::default()
            })
            .unwrap()
        })
        .collect()
}

fn dictionaries() -> Vec<Option<Dictionary>> {
    let english = word_text(ENGLISH, 8000, 3);
    vec![
        None,
        Some(Dictionary::zeroed(1024)),
        Some(DictionaryBuilder::with_size(1024).build(english.as_bytes())),
        Some(DictionaryBuilder::with_size(32_768).build(english.as_bytes())),
        Some(Dictionary::from_bytes(random_bytes(2048, 4))),
    ]
}

#[test]
fn test_round_trip_arbitrary_bytes() {
    let inputs = vec![
        Vec::new(),
        random_bytes(1, 1),
        random_bytes(5000, 2),
        repeated("AB", 70_000),
        word_text(SPANISH, 6000, 8).into_bytes(),
    ];
    for c in backends() {
        for dict in dictionaries() {
            for data in &inputs {
                let encoded = c.encode(data, dict.as_ref()).unwrap();
                let decoded = c.decompress(&encoded, dict.as_ref()).unwrap();
                assert_eq!(&decoded, data, "backend {}", c.name());
                assert_eq!(
                    c.compress_verified(data, dict.as_ref()).unwrap(),
                    encoded.len()
                );
            }
        }
    }
}

#[test]
fn test_static_across_call_history() {
    let data = word_text(ENGLISH, 3000, 31).into_bytes();
    let dict = DictionaryBuilder::with_size(1024).build(&data);
    for c in backends() {
        let before = c.compress(&data, Some(&dict)).unwrap();
        for seed in 0..5 {
            c.compress(&random_bytes(2000, seed), None).unwrap();
        }
        assert_eq!(c.compress(&data, Some(&dict)).unwrap(), before, "backend {}", c.name());
    }
}

#[test]
fn test_own_dictionary_beats_foreign() {
    let english = word_text(ENGLISH, 8000, 40);
    let spanish = word_text(SPANISH, 8000, 41);
    let builder = DictionaryBuilder::with_size(1024);
    let own = builder.build(english.as_bytes());
    let foreign = builder.build(spanish.as_bytes());
    let held_out = &english.as_bytes()[english.len() / 2..];
    for c in backends() {
        let with_own = c.compress(held_out, Some(&own)).unwrap();
        let with_foreign = c.compress(held_out, Some(&foreign)).unwrap();
        assert!(with_own < with_foreign, "backend {}: {} vs {}", c.name(), with_own, with_foreign);
    }
}
