//! KL divergence properties over generated corpora.

use content_divergence_engine::{
    FrequencyModel, KlDivergenceCalculator, SymbolDistribution, SymbolUnit,
};

use super::helpers::{language_corpora, random_bytes, repeated, word_text, ENGLISH};

fn model(bytes: &[u8]) -> FrequencyModel {
    FrequencyModel::compute_bytes(bytes, SymbolUnit::Auto).unwrap()
}

#[test]
fn test_self_distance_is_zero() {
    let calc = KlDivergenceCalculator::default();
    for corpus in language_corpora(2000) {
        let m = model(corpus.bytes());
        assert_eq!(calc.distance(&m, &m), 0.0, "corpus {}", corpus.id());
    }
    let random = model(&random_bytes(1000, 9));
    assert_eq!(calc.distance(&random, &random), 0.0);
}

#[test]
fn test_identical_text_different_ids_is_zero() {
    let calc = KlDivergenceCalculator::default();
    let text = word_text(ENGLISH, 1500, 42);
    let a = FrequencyModel::compute(&text).unwrap();
    let a_prime = FrequencyModel::compute(&text.clone()).unwrap();
    assert_eq!(calc.distance(&a, &a_prime), 0.0);
}

#[test]
fn test_symmetry_is_exact() {
    let corpora = language_corpora(1500);
    for min_freq in [1.0 / 1024.0, 1e-6, 0.01] {
        let calc = KlDivergenceCalculator::new(min_freq).unwrap();
        for a in &corpora {
            for b in &corpora {
                let (ma, mb) = (model(a.bytes()), model(b.bytes()));
                let ab = calc.distance(&ma, &mb);
                let ba = calc.distance(&mb, &ma);
                assert_eq!(ab.to_bits(), ba.to_bits(), "{} vs {}", a.id(), b.id());
                assert!(ab >= 0.0);
            }
        }
    }
}

#[test]
fn test_disjoint_alphabets_stay_finite() {
    let calc = KlDivergenceCalculator::default();
    let a = FrequencyModel::compute("abababab").unwrap();
    let b = FrequencyModel::compute("xyxyxyxy").unwrap();
    let d = calc.distance(&a, &b);
    assert!(d.is_finite());
    assert!(d > 1.0);
}

#[test]
fn test_repeated_vs_random_scenario() {
    let calc = KlDivergenceCalculator::default();
    let repeated_text = repeated("A", 1000);
    let single = SymbolDistribution::from_bytes(&repeated_text, SymbolUnit::Byte);
    let random = SymbolDistribution::from_bytes(&random_bytes(1000, 7), SymbolUnit::Byte);

    assert_eq!(calc.divergence(&single, &single), 0.0);
    assert_eq!(calc.divergence(&random, &random), 0.0);
    let d = calc.divergence(&single, &random);
    assert!(d > 3.0, "expected a large divergence, got {}", d);
    assert_eq!(d, calc.divergence(&random, &single));

    // The repeated corpus has no frequency model at all.
    assert!(FrequencyModel::compute_bytes(&repeated_text, SymbolUnit::Byte).is_err());
}

#[test]
fn test_probabilities_sum_to_one() {
    for corpus in language_corpora(1200) {
        let m = model(corpus.bytes());
        let sum: f64 = m.probabilities().values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(m.entropy() > 0.0);
    }
}
