//! Whole-run scenarios through `DivergenceEngine`.

use content_divergence_engine::{
    AbortHandle, Corpus, DivergenceEngine, DivergenceError, EngineConfig, FailureKind,
    GeneralizedDivergenceCalculator, KlDivergenceCalculator,
};

use super::helpers::{language_corpora, numbered_corpora, random_bytes, repeated, word_text, ENGLISH};

#[test]
fn test_identical_corpora_scenario() {
    let text = word_text(ENGLISH, 4000, 99);
    let a = Corpus::new("doc_a", text.clone());
    let a_prime = Corpus::new("doc_a_prime", text);

    let engine = DivergenceEngine::with_defaults().unwrap();
    let report = engine.analyze(&[a.clone(), a_prime.clone()]).unwrap();
    assert_eq!(report.kl.matrix.get("doc_a", "doc_a_prime"), Some(0.0));

    let generalized = report.generalized.matrix.get("doc_a", "doc_a_prime").unwrap();
    assert!(generalized.abs() < 1e-9, "got {}", generalized);

    let calc = GeneralizedDivergenceCalculator::from_config(&EngineConfig::default()).unwrap();
    assert!(calc.distance(&a, &a_prime).unwrap().abs() < 1e-9);
}

#[test]
fn test_repeated_vs_random_run() {
    let corpora = vec![
        Corpus::new("synthetic_repeated", repeated("A", 1000)),
        Corpus::new("synthetic_random", random_bytes(1000, 2024)),
        Corpus::new("synthetic_pairs", repeated("AB", 1000)),
    ];
    let report = DivergenceEngine::with_defaults().unwrap().analyze(&corpora).unwrap();

    // The single-symbol corpus cannot enter the KL matrix.
    assert_eq!(report.exclusions.kl.len(), 1);
    assert_eq!(report.exclusions.kl[0].id, "synthetic_repeated");
    assert_eq!(report.exclusions.kl[0].kind, FailureKind::NotEnoughData);

    let kl = report.kl.matrix.get("synthetic_pairs", "synthetic_random").unwrap();
    assert!(kl > 1.0, "got {}", kl);

    // All three take part in the generalized matrix.
    assert_eq!(report.generalized.ids().len(), 3);
    assert!(report.exclusions.generalized_missing_pairs.is_empty());
}

#[test]
fn test_languages_cluster() {
    let mut corpora = language_corpora(6000);
    corpora.push(Corpus::new("lang_english_more", word_text(ENGLISH, 6000, 500)));
    let report = DivergenceEngine::with_defaults().unwrap().analyze(&corpora).unwrap();

    for output in [&report.kl, &report.generalized] {
        let nearest = output.matrix.nearest("lang_english", 1);
        assert_eq!(nearest[0].0, "lang_english_more");
    }
    assert_eq!(report.kl.categories["lang_finnish"], "lang");
}

#[test]
fn test_kl_matches_direct_calculation() {
    let corpora = language_corpora(2000);
    let report = DivergenceEngine::with_defaults().unwrap().analyze(&corpora).unwrap();
    let calc = KlDivergenceCalculator::default();
    let model = |c: &Corpus| {
        content_divergence_engine::FrequencyModel::compute(c.as_str().unwrap()).unwrap()
    };
    let direct = calc.distance(&model(&corpora[0]), &model(&corpora[1]));
    assert_eq!(
        report.kl.matrix.get(corpora[0].id(), corpora[1].id()),
        Some(direct)
    );
}

#[test]
fn test_large_dictionary_preset() {
    let corpora = numbered_corpora(3, 40_000);
    let report = DivergenceEngine::new(EngineConfig::large_corpora())
        .unwrap()
        .analyze(&corpora)
        .unwrap();
    assert_eq!(report.config.dictionary.size, 32_768);
    assert_eq!(report.generalized.matrix.cell_count(), 9);
}

#[test]
fn test_abort_returns_no_report() {
    let abort = AbortHandle::new();
    abort.abort();
    let result = DivergenceEngine::with_defaults()
        .unwrap()
        .analyze_with_abort(&numbered_corpora(4, 500), &abort);
    assert!(matches!(result, Err(DivergenceError::Aborted)));
}

#[test]
fn test_runs_are_reproducible() {
    let corpora = numbered_corpora(5, 1500);
    let engine = DivergenceEngine::with_defaults().unwrap();
    let first = engine.analyze(&corpora).unwrap();
    let second = engine.analyze(&corpora).unwrap();
    assert_eq!(first.kl, second.kl);
    assert_eq!(first.generalized, second.generalized);
}
