use crate::{AfError, AfResult};

/// Floating point type used throughout system
pub type Real = f64;

/// Agreement band used when comparing one solver's output against another's.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { rel: 0.5, abs: 0.01 }
    }
}

/// Asymmetric closeness test against an expected value.
///
/// `actual` agrees with `expected` when `|actual - expected| <= max(rel * |expected|, abs)`.
/// Non-finite values only agree when they are identical infinities.
pub fn approx_agrees(actual: Real, expected: Real, tol: Tolerances) -> bool {
    if actual == expected {
        return true;
    }
    if !actual.is_finite() || !expected.is_finite() {
        return false;
    }
    (actual - expected).abs() <= (tol.rel * expected.abs()).max(tol.abs)
}

/// `n` evenly spaced points from `start` to `stop` inclusive.
pub fn linspace(start: Real, stop: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as Real;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as Real })
                .collect()
        }
    }
}

/// `n` points from `start` to `stop`, clustered toward both ends with cosine spacing.
pub fn cosspace(start: Real, stop: Real, n: usize) -> Vec<Real> {
    let mean = 0.5 * (start + stop);
    let amp = 0.5 * (stop - start);
    linspace(core::f64::consts::PI, 0.0, n)
        .into_iter()
        .enumerate()
        .map(|(i, theta)| {
            // Pin the ends so callers can rely on exact endpoints
            if i == 0 {
                start
            } else if i == n - 1 {
                stop
            } else {
                mean + amp * theta.cos()
            }
        })
        .collect()
}

/// Piecewise-linear interpolation of `(xs, ys)` at `x`, clamped to the end values.
///
/// `xs` must be sorted ascending.
pub fn interp_clamped(x: Real, xs: &[Real], ys: &[Real]) -> AfResult<Real> {
    if xs.is_empty() {
        return Err(AfError::EmptyTable);
    }
    if xs.len() != ys.len() {
        return Err(AfError::TableShape {
            x_len: xs.len(),
            y_len: ys.len(),
        });
    }
    if x <= xs[0] {
        return Ok(ys[0]);
    }
    let last = xs.len() - 1;
    if x >= xs[last] {
        return Ok(ys[last]);
    }
    let hi = xs.partition_point(|&v| v <= x);
    let lo = hi - 1;
    let span = xs[hi] - xs[lo];
    if span <= 0.0 {
        return Ok(ys[lo]);
    }
    let t = (x - xs[lo]) / span;
    Ok(ys[lo] + t * (ys[hi] - ys[lo]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approx_agrees_uses_expected_magnitude() {
        let tol = Tolerances { abs: 0.01, rel: 0.5 };
        assert!(approx_agrees(1.4, 1.0, tol));
        assert!(!approx_agrees(1.6, 1.0, tol));
        // Small expected values fall back to the absolute band
        assert!(approx_agrees(0.009, 0.0, tol));
        assert!(!approx_agrees(0.02, 0.0, tol));
        assert!(!approx_agrees(Real::NAN, 1.0, tol));
    }

    #[test]
    fn cosspace_endpoints_and_clustering() {
        let pts = cosspace(0.0, 1.0, 30);
        assert_eq!(pts.len(), 30);
        assert_eq!(pts[0], 0.0);
        assert_eq!(pts[29], 1.0);
        assert!(pts.windows(2).all(|w| w[1] > w[0]));
        // Spacing near the ends is tighter than in the middle
        assert!(pts[1] - pts[0] < pts[15] - pts[14]);
    }

    #[test]
    fn interp_clamps_and_blends() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.0, 10.0, 30.0];
        assert_eq!(interp_clamped(-1.0, &xs, &ys).unwrap(), 0.0);
        assert_eq!(interp_clamped(0.5, &xs, &ys).unwrap(), 5.0);
        assert_eq!(interp_clamped(1.5, &xs, &ys).unwrap(), 20.0);
        assert_eq!(interp_clamped(5.0, &xs, &ys).unwrap(), 30.0);
    }

    #[test]
    fn interp_rejects_malformed_tables() {
        assert!(matches!(interp_clamped(0.0, &[], &[]), Err(AfError::EmptyTable)));
        assert!(matches!(
            interp_clamped(0.0, &[0.0, 1.0], &[1.0]),
            Err(AfError::TableShape { x_len: 2, y_len: 1 })
        ));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn linspace_hits_both_ends(a in -100.0_f64..100.0, b in -100.0_f64..100.0, n in 2_usize..50) {
            let pts = linspace(a, b, n);
            prop_assert_eq!(pts.len(), n);
            prop_assert_eq!(pts[0], a);
            prop_assert_eq!(pts[n - 1], b);
        }

        #[test]
        fn interp_stays_within_table_range(x in -5.0_f64..5.0) {
            let xs = [-1.0, 0.0, 2.0];
            let ys = [3.0, -1.0, 4.0];
            let y = interp_clamped(x, &xs, &ys).unwrap();
            prop_assert!((-1.0..=4.0).contains(&y));
        }
    }
}
