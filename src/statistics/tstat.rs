//! One-sample t statistics over the epoch axis.
//!
//! The per-timepoint statistic is `mean / (sd / sqrt(n))` with the sample
//! standard deviation (n - 1 denominator). Columns with zero variance map
//! to signed infinity (nonzero mean) or 0.0 (zero mean) so that downstream
//! threshold comparisons stay well defined without NaN propagation.

use ndarray::{Array1, Array2, Axis};

/// Compute the observed per-timepoint one-sample t statistic.
///
/// `data` is epochs x timepoints with at least 2 epochs (enforced by the
/// caller's input validation).
pub fn one_sample_t(data: &Array2<f64>) -> Array1<f64> {
    let n = data.nrows() as f64;
    let sumsq = column_sumsq(data);
    let mut t = Array1::zeros(data.ncols());

    for (j, col) in data.axis_iter(Axis(1)).enumerate() {
        let mean = col.sum() / n;
        t[j] = t_from_moments(mean, sumsq[j], n);
    }
    t
}

/// Per-column sums of squares, invariant under sign flips.
///
/// Precomputed once per test: flipping an epoch's sign changes the column
/// mean but not `sum(x^2)`, so each permutation draw only needs the signed
/// column sums.
pub(crate) fn column_sumsq(data: &Array2<f64>) -> Vec<f64> {
    data.axis_iter(Axis(1))
        .map(|col| col.iter().map(|x| x * x).sum())
        .collect()
}

/// Recompute the t statistic under a per-epoch sign assignment.
///
/// Writes into `t_out` (one slot per timepoint) using the precomputed
/// `sumsq` from [`column_sumsq`]. `signs` holds one +1.0/-1.0 per epoch.
pub(crate) fn signed_t_into(
    data: &Array2<f64>,
    sumsq: &[f64],
    signs: &[f64],
    t_out: &mut [f64],
) {
    let n = data.nrows() as f64;
    t_out.fill(0.0);

    // Accumulate signed column sums row-wise for contiguous access.
    for (row, &sign) in data.axis_iter(Axis(0)).zip(signs) {
        for (acc, &x) in t_out.iter_mut().zip(row.iter()) {
            *acc += sign * x;
        }
    }

    for (j, t) in t_out.iter_mut().enumerate() {
        let mean = *t / n;
        *t = t_from_moments(mean, sumsq[j], n);
    }
}

fn t_from_moments(mean: f64, sumsq: f64, n: f64) -> f64 {
    // Var = (sum(x^2) - n*mean^2) / (n - 1); clamp tiny negatives from
    // cancellation.
    let var = ((sumsq - n * mean * mean) / (n - 1.0)).max(0.0);
    let se = (var / n).sqrt();
    if se == 0.0 {
        if mean == 0.0 {
            0.0
        } else {
            f64::INFINITY.copysign(mean)
        }
    } else {
        mean / se
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn t_matches_hand_computation() {
        // Column 0: values 1, 2, 3 -> mean 2, sd 1, se 1/sqrt(3), t = 2*sqrt(3).
        let data = array![[1.0, -1.0], [2.0, -2.0], [3.0, -3.0]];
        let t = one_sample_t(&data);
        assert!((t[0] - 2.0 * 3.0_f64.sqrt()).abs() < 1e-12);
        assert!((t[1] + 2.0 * 3.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn zero_variance_columns() {
        let data = array![[2.0, 0.0], [2.0, 0.0], [2.0, 0.0]];
        let t = one_sample_t(&data);
        assert!(t[0].is_infinite() && t[0] > 0.0);
        assert_eq!(t[1], 0.0);
    }

    #[test]
    fn identity_signs_reproduce_observed() {
        let data = array![[0.3, -1.2, 4.0], [1.7, 0.4, -0.5], [-0.2, 2.2, 1.1]];
        let sumsq = column_sumsq(&data);
        let observed = one_sample_t(&data);

        let mut t = vec![0.0; data.ncols()];
        signed_t_into(&data, &sumsq, &[1.0, 1.0, 1.0], &mut t);
        for (a, b) in t.iter().zip(observed.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn flipping_all_signs_negates_t() {
        let data = array![[0.3, -1.2], [1.7, 0.4], [-0.2, 2.2]];
        let sumsq = column_sumsq(&data);
        let observed = one_sample_t(&data);

        let mut t = vec![0.0; data.ncols()];
        signed_t_into(&data, &sumsq, &[-1.0, -1.0, -1.0], &mut t);
        for (a, b) in t.iter().zip(observed.iter()) {
            assert!((a + b).abs() < 1e-12);
        }
    }
}
