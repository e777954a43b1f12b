//! Matrix assembly over real metrics.

use std::sync::atomic::{AtomicUsize, Ordering};

use content_divergence_engine::{
    Corpus, DistanceMatrixAssembler, EngineConfig, FrequencyModel, GeneralizedDivergenceCalculator,
    KlDivergenceCalculator,
};

use super::helpers::numbered_corpora;

#[test]
fn test_shape_and_call_count() {
    let kl = KlDivergenceCalculator::default();
    for n in [1usize, 4, 8] {
        let corpora = numbered_corpora(n, 600);
        let calls = AtomicUsize::new(0);
        let assembly = DistanceMatrixAssembler::new()
            .build(&corpora, |a, b| {
                calls.fetch_add(1, Ordering::SeqCst);
                let ma = FrequencyModel::compute_bytes(a.bytes(), Default::default())?;
                let mb = FrequencyModel::compute_bytes(b.bytes(), Default::default())?;
                Ok(kl.distance(&ma, &mb))
            })
            .unwrap();

        assert_eq!(assembly.matrix.ids().len(), n);
        assert_eq!(assembly.matrix.cell_count(), n * n);
        assert_eq!(calls.load(Ordering::SeqCst), n * (n - 1) / 2);
        assert!(assembly.failures.is_empty());
    }
}

#[test]
fn test_diagonal_zero_both_metrics() {
    let corpora = numbered_corpora(5, 800);
    let kl = KlDivergenceCalculator::default();
    let generalized = GeneralizedDivergenceCalculator::from_config(&EngineConfig::default()).unwrap();
    let assembler = DistanceMatrixAssembler::new();

    let kl_matrix = assembler
        .build(&corpora, |a, b| {
            let ma = FrequencyModel::compute_bytes(a.bytes(), Default::default())?;
            let mb = FrequencyModel::compute_bytes(b.bytes(), Default::default())?;
            Ok(kl.distance(&ma, &mb))
        })
        .unwrap()
        .matrix;
    let gen_matrix = assembler
        .build(&corpora, |a, b| generalized.distance(a, b))
        .unwrap()
        .matrix;

    for matrix in [&kl_matrix, &gen_matrix] {
        for id in matrix.ids() {
            assert_eq!(matrix.get(id, id), Some(0.0));
        }
        for a in matrix.ids() {
            for b in matrix.ids() {
                assert_eq!(matrix.get(a, b), matrix.get(b, a));
            }
        }
    }
    assert_eq!(kl_matrix.ids(), gen_matrix.ids());
}

#[test]
fn test_sequential_matches_parallel_with_real_metric() {
    let corpora = numbered_corpora(6, 700);
    let generalized = GeneralizedDivergenceCalculator::from_config(&EngineConfig::default()).unwrap();
    let metric = |a: &Corpus, b: &Corpus| generalized.distance(a, b);
    let parallel = DistanceMatrixAssembler::new().build(&corpora, metric).unwrap();
    let sequential = DistanceMatrixAssembler::new()
        .with_parallel(false)
        .build(&corpora, metric)
        .unwrap();
    assert_eq!(parallel.matrix, sequential.matrix);
}
