//! Statistical validity checks.
//!
//! These run the tester against simulated data where the right answer is
//! known: pure-noise datasets for false-positive calibration, planted
//! effects for sensitivity, and small epoch counts for the exact test.

use erds_cluster::{ClusterPermutationTest, Error, Tail, Threshold};
use ndarray::Array2;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use rand_xoshiro::Xoshiro256PlusPlus;

fn gaussian_matrix(n_epochs: usize, n_timepoints: usize, seed: u64) -> Array2<f64> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    Array2::from_shape_simple_fn((n_epochs, n_timepoints), || {
        StandardNormal.sample(&mut rng)
    })
}

/// Under the null, the fraction of datasets with any cluster at p <= 0.05
/// stays near 0.05. Loose bounds: this is a Monte-Carlo check, not a proof.
#[test]
fn false_positive_rate_is_calibrated() {
    let n_datasets = 200;
    let mut false_positives = 0;

    for dataset in 0..n_datasets {
        let data = gaussian_matrix(16, 40, 1_000 + dataset as u64);
        let result = ClusterPermutationTest::new()
            .tail(Tail::TwoSided)
            .n_permutations(200)
            .seed(dataset as u64)
            .run(&data)
            .unwrap();

        if result.p_values.iter().any(|&p| p <= 0.05) {
            false_positives += 1;
        }
    }

    let rate = false_positives as f64 / n_datasets as f64;
    assert!(
        rate < 0.15,
        "false positive rate {} far above nominal 0.05",
        rate
    );
}

/// A planted effect of moderate size is detected with p at the floor.
#[test]
fn planted_effect_is_detected() {
    let noise = gaussian_matrix(20, 50, 77);
    let data = Array2::from_shape_fn((20, 50), |(i, j)| {
        let effect = if (15..30).contains(&j) { 1.0 } else { 0.0 };
        effect + 0.4 * noise[[i, j]]
    });

    let result = ClusterPermutationTest::new()
        .tail(Tail::Positive)
        .n_permutations(400)
        .seed(5)
        .run(&data)
        .unwrap();

    let floor = 1.0 / result.metadata.n_draws as f64;
    let best = result
        .p_values
        .iter()
        .cloned()
        .fold(f64::INFINITY, f64::min);
    assert!(best <= floor + 1e-12, "planted effect missed: p = {}", best);
}

/// All p-values lie in [0, 1] across tails and thresholds.
#[test]
fn p_values_stay_in_unit_interval() {
    for (seed, tail) in [
        (1, Tail::Positive),
        (2, Tail::Negative),
        (3, Tail::TwoSided),
    ] {
        let data = gaussian_matrix(12, 35, seed);
        let threshold = match tail {
            Tail::Negative => Threshold::Fixed(-1.5),
            _ => Threshold::Fixed(1.5),
        };
        let result = ClusterPermutationTest::new()
            .tail(tail)
            .threshold(threshold)
            .n_permutations(150)
            .seed(seed)
            .run(&data)
            .unwrap();
        for &p in &result.p_values {
            assert!((0.0..=1.0).contains(&p), "p = {} out of range", p);
        }
    }
}

/// With 2^n_epochs <= n_permutations, all sign assignments are enumerated
/// and p-values are exact rational multiples of 1/2^n_epochs.
#[test]
fn exact_test_enumerates_all_assignments() {
    let noise = gaussian_matrix(10, 24, 13);
    let data = Array2::from_shape_fn((10, 24), |(i, j)| {
        let effect = if (4..12).contains(&j) { 0.8 } else { 0.0 };
        effect + 0.5 * noise[[i, j]]
    });

    let result = ClusterPermutationTest::new()
        .tail(Tail::Positive)
        .n_permutations(2_000)
        .seed(999) // irrelevant for the exact path
        .run(&data)
        .unwrap();

    assert!(result.metadata.exact);
    assert_eq!(result.metadata.n_draws, 1 << 10);
    assert_eq!(result.h0.len(), 1 << 10);
    for &p in &result.p_values {
        let scaled = p * (1 << 10) as f64;
        assert!(
            (scaled - scaled.round()).abs() < 1e-9,
            "exact p {} is not a multiple of 1/1024",
            p
        );
    }

    // The exact path ignores the seed entirely.
    let again = ClusterPermutationTest::new()
        .tail(Tail::Positive)
        .n_permutations(2_000)
        .seed(0)
        .run(&data)
        .unwrap();
    assert_eq!(result.h0, again.h0);
    assert_eq!(result.p_values, again.p_values);
}

/// The identity draw keeps every observed cluster's p at or above 1/n_draws.
#[test]
fn p_value_floor_is_one_over_draws() {
    let data = Array2::from_shape_fn((20, 50), |(_, j)| {
        if (10..20).contains(&j) {
            1.0
        } else {
            0.0
        }
    });

    let result = ClusterPermutationTest::new()
        .tail(Tail::Positive)
        .n_permutations(100)
        .seed(1)
        .threshold(Threshold::Fixed(2.0))
        .run(&data)
        .unwrap();

    assert_eq!(result.clusters.len(), 1);
    let floor = 1.0 / result.metadata.n_draws as f64;
    for &p in &result.p_values {
        assert!(p >= floor - 1e-12);
    }
}

/// Config errors surface as `InvalidConfig`, data errors as `InvalidInput`.
#[test]
fn error_taxonomy() {
    let data = gaussian_matrix(6, 10, 1);

    let err = ClusterPermutationTest::new()
        .n_permutations(0)
        .run(&data)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));

    let err = Tail::from_i8(2).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));

    let one_epoch = gaussian_matrix(1, 10, 2);
    let err = ClusterPermutationTest::new().run(&one_epoch).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let empty = Array2::<f64>::zeros((0, 0));
    let err = ClusterPermutationTest::new().run(&empty).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}
