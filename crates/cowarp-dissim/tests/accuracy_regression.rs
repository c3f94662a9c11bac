//! Accuracy regression tests for cowarp-dissim.
//!
//! Expected values are worked out by hand from the definitions of each term.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use cowarp_dissim::{
    DissimError, Measure, Signature, correlation_distance, dnom, dord, nominal_distance,
    ordinal_distance, pairwise, presence_distance,
};

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

/// Sparse non-negative spectrum: roughly a third of the entries are zero.
fn sparse_spectrum(rng: &mut ChaCha8Rng, len: usize) -> Vec<f64> {
    (0..len)
        .map(|_| {
            if rng.gen_range(0..3) == 0 {
                0.0
            } else {
                rng.gen_range(0.1..5.0)
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// a) hand_computed_pair
// ---------------------------------------------------------------------------

/// x = [0, 2, 0, 1, 3], y = [1, 2, 0, 0, 1].
///
/// presence: x -> [0,1,0,1,1], y -> [1,1,0,0,1]; two disagreements -> sqrt(2).
/// correlation: means 1.2 and 0.8; sxy = 2.2, sxx = 6.8, syy = 2.8 -> r = 2.2 / sqrt(19.04).
/// signatures merge on [0, 1, 3, 4]: x = [0, 2, 1, 3], y = [1, 2, 0, 1].
/// nominal: 1 + 0 + 1 + 2 = 4.
/// ordinal: p = -1, -1, 0 with gaps 1, 2, 1 -> 1 + 2 + 0 = 3.
#[test]
fn hand_computed_pair() {
    let x = [0.0, 2.0, 0.0, 1.0, 3.0];
    let y = [1.0, 2.0, 0.0, 0.0, 1.0];

    let pres = 2.0_f64.sqrt();
    let corr = 1.0 - 2.2 / 19.04_f64.sqrt();

    assert!((presence_distance(&x, &y).unwrap() - pres).abs() < 1e-12);
    assert!((correlation_distance(&x, &y).unwrap() - corr).abs() < 1e-12);
    assert!((nominal_distance(&x, &y) - 4.0).abs() < 1e-12);
    assert!((ordinal_distance(&x, &y) - 3.0).abs() < 1e-12);

    let expected_nom = 0.5 * pres + 0.25 * corr + 0.25 * 4.0;
    let expected_ord = 0.5 * pres + 0.25 * corr + 0.25 * 3.0;
    assert!((dnom(&x, &y).unwrap() - expected_nom).abs() < 1e-12);
    assert!((dord(&x, &y).unwrap() - expected_ord).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// b) measures_are_symmetric_and_non_negative
// ---------------------------------------------------------------------------

#[test]
fn measures_are_symmetric_and_non_negative() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for _ in 0..20 {
        let x = sparse_spectrum(&mut rng, 30);
        let y = sparse_spectrum(&mut rng, 30);
        for measure in [Measure::Presence, Measure::Correlation, Measure::Nominal, Measure::Ordinal] {
            let xy = measure.distance(&x, &y).unwrap();
            let yx = measure.distance(&y, &x).unwrap();
            assert!(xy >= 0.0, "{}: {xy}", measure.name());
            assert!((xy - yx).abs() < 1e-9, "{}: {xy} vs {yx}", measure.name());
        }
    }
}

// ---------------------------------------------------------------------------
// c) merged signature covers both supports
// ---------------------------------------------------------------------------

#[test]
fn merged_signature_covers_both_supports() {
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let x = sparse_spectrum(&mut rng, 40);
    let y = sparse_spectrum(&mut rng, 40);
    let merged = Signature::extend(&Signature::from_values(&x), &Signature::from_values(&y));

    let support: Vec<usize> = (0..40).filter(|&i| x[i] > 0.0 || y[i] > 0.0).collect();
    assert_eq!(merged.positions(), support.as_slice());
    for (k, &p) in merged.positions().iter().enumerate() {
        assert_eq!(merged.left()[k], x[p]);
        assert_eq!(merged.right()[k], y[p]);
    }
    // total mass difference is what the nominal term sees
    let direct: f64 = x.iter().zip(&y).map(|(a, b)| (a - b).abs()).sum();
    assert!((merged.nominal_distance() - direct).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// d) pairwise matrix
// ---------------------------------------------------------------------------

#[test]
fn pairwise_matrix_matches_direct_calls() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let spectra: Vec<Vec<f64>> = (0..6).map(|_| sparse_spectrum(&mut rng, 25)).collect();
    let matrix = pairwise(&spectra, Measure::Nominal).unwrap();
    assert_eq!(matrix.len(), 6);
    for i in 0..6 {
        for j in 0..6 {
            let expected = if i == j { 0.0 } else { dnom(&spectra[i], &spectra[j]).unwrap() };
            assert!((matrix.get(i, j) - expected).abs() < 1e-9, "({i}, {j})");
        }
    }
}

#[test]
fn pairwise_rejects_ragged_input() {
    let spectra = vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0]];
    assert_eq!(
        pairwise(&spectra, Measure::Presence).unwrap_err(),
        DissimError::LengthMismatch { left: 2, right: 3 }
    );
}
