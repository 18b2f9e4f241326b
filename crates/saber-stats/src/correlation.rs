//! Correlation and reliability coefficients.
//!
//! - [`pearson`]: Pearson product-moment correlation of two paired series
//! - [`spearman_brown`]: Spearman-Brown correction of a split-half correlation
//! - [`spearman_brown_prophecy`]: general prophecy formula for a length factor `k`
//!
//! All functions return `None` instead of producing `NaN` or infinities, so callers can treat
//! an undefined coefficient as "not enough information" rather than as a value.

use std::iter;

use crate::descriptive;

/// Pearson correlation coefficient between two paired series.
///
/// # Returns
///
/// * `Some(r)` with `r` in \[-1.0, 1.0\]
/// * `None` - if the series differ in length, hold fewer than two pairs,
///   either series is constant or has zero variance, or the result is not finite
///
/// # Examples
///
/// ```
/// # use saber_stats::correlation::pearson;
/// let r = pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
/// assert!((r - 1.0).abs() < 1e-12);
///
/// // One series is constant
/// assert_eq!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]), None);
/// ```
#[must_use]
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    // A constant series need not have an exactly zero computed variance
    if is_constant(x) || is_constant(y) {
        return None;
    }

    let mean_x = descriptive::mean(x.iter().copied())?;
    let mean_y = descriptive::mean(y.iter().copied())?;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in iter::zip(x, y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    let r = cov / (var_x * var_y).sqrt();
    // Rounding can push |r| marginally past 1
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|&v| v == values[0])
}

/// Spearman-Brown correction of a split-half correlation.
///
/// Estimates the reliability of the full-length measurement from the correlation
/// between its two halves: `2r / (1 + r)`.
///
/// Returns `None` when `r == -1` (the formula divides by zero).
///
/// # Examples
///
/// ```
/// # use saber_stats::correlation::spearman_brown;
/// assert_eq!(spearman_brown(0.5), Some(2.0 / 3.0));
/// assert_eq!(spearman_brown(-1.0), None);
/// ```
#[must_use]
pub fn spearman_brown(r: f64) -> Option<f64> {
    spearman_brown_prophecy(r, 2.0)
}

/// Spearman-Brown prophecy formula for a test lengthened by factor `k`.
///
/// `k r / (1 + (k - 1) r)`. Returns `None` if the denominator is zero or the
/// result is not finite.
///
/// # Examples
///
/// ```
/// # use saber_stats::correlation::spearman_brown_prophecy;
/// // Reliability of a measurement 3x as long as one with r = 0.5
/// let r3 = spearman_brown_prophecy(0.5, 3.0).unwrap();
/// assert!((r3 - 0.75).abs() < 1e-12);
/// ```
#[must_use]
pub fn spearman_brown_prophecy(r: f64, k: f64) -> Option<f64> {
    let denominator = 1.0 + (k - 1.0) * r;
    if denominator == 0.0 {
        return None;
    }
    let corrected = k * r / denominator;
    corrected.is_finite().then_some(corrected)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_perfect_negative_correlation() {
        let r = pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
        assert_eq!(r, -1.0);
        assert_eq!(spearman_brown(r), None);
    }

    #[test]
    fn test_known_correlation() {
        // r = 0.8 for this textbook pair
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 1.0, 4.0, 3.0, 5.0];
        let r = pearson(&x, &y).unwrap();
        assert!((r - 0.8).abs() < 1e-12);
        let corrected = spearman_brown(r).unwrap();
        assert!((corrected - 1.6 / 1.8).abs() < 1e-12);
    }

    #[test]
    fn test_undefined_inputs() {
        assert_eq!(pearson(&[], &[]), None);
        assert_eq!(pearson(&[1.0], &[1.0]), None);
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), None);
        assert_eq!(pearson(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn test_inexact_constant_has_no_correlation() {
        // the mean of repeated 0.1 is not exactly 0.1
        let constant = [0.1; 5];
        let varying = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(pearson(&constant, &varying), None);
        assert_eq!(pearson(&varying, &constant), None);
        assert_eq!(pearson(&constant, &[0.7; 5]), None);
    }

    #[test]
    fn test_zero_correlation_stays_zero() {
        assert_eq!(spearman_brown(0.0), Some(0.0));
        assert_eq!(spearman_brown(1.0), Some(1.0));
    }

    proptest! {
        #[test]
        fn corrected_exceeds_positive_half_correlation(r in 0.001f64..0.999) {
            let corrected = spearman_brown(r).unwrap();
            prop_assert!(corrected > r);
            prop_assert!(corrected < 1.0);
        }

        #[test]
        fn corrected_defined_on_open_interval(r in -0.999f64..0.999) {
            prop_assert!(spearman_brown(r).is_some());
        }

        #[test]
        fn pearson_is_symmetric_and_bounded(
            pairs in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 2..50)
        ) {
            let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
            let xy = pearson(&x, &y);
            let yx = pearson(&y, &x);
            prop_assert_eq!(xy.is_some(), yx.is_some());
            if let (Some(a), Some(b)) = (xy, yx) {
                prop_assert!((a - b).abs() < 1e-9);
                prop_assert!((-1.0..=1.0).contains(&a));
            }
        }
    }
}
