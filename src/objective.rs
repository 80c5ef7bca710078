//! Thin adapter around the externally supplied objective function.
//!
//! The objective is a pure, deterministic map from a parameter vector and a
//! two-column time/value window to a non-negative residual sum of squares.
//! The engine never inspects its internals; its cost dominates runtime.

use ndarray::{Array1, Array2};

use crate::error::{FitError, Result};

/// Evaluates the objective for one candidate, sanitizing degenerate values.
///
/// Non-finite returns (NaN, infinities) are mapped to `f64::INFINITY` so a
/// numerically degenerate point is always worse than any finite fitness and
/// can never become the best solution.
pub fn evaluate<F>(objective: &F, x: &Array1<f64>, data: &Array2<f64>) -> f64
where
    F: Fn(&Array1<f64>, &Array2<f64>) -> f64,
{
    let value = objective(x, data);
    if value.is_finite() { value } else { f64::INFINITY }
}

/// Fails fast on empty or malformed data windows. The caller is responsible
/// for choosing windows long enough for a meaningful fit.
pub(crate) fn check_window(data: &Array2<f64>) -> Result<()> {
    if data.nrows() == 0 {
        return Err(FitError::EmptyWindow);
    }
    if data.ncols() != 2 {
        return Err(FitError::WindowShape {
            ncols: data.ncols(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_non_finite_sanitized_to_infinity() {
        let nan_obj = |_: &Array1<f64>, _: &Array2<f64>| f64::NAN;
        let neg_inf_obj = |_: &Array1<f64>, _: &Array2<f64>| f64::NEG_INFINITY;
        let x = array![0.0, 0.0, 0.0, 0.0];
        let data = array![[0.0, 1.0]];

        assert_eq!(evaluate(&nan_obj, &x, &data), f64::INFINITY);
        assert_eq!(evaluate(&neg_inf_obj, &x, &data), f64::INFINITY);
    }

    #[test]
    fn test_finite_values_pass_through() {
        let obj = |x: &Array1<f64>, _: &Array2<f64>| x.iter().map(|&v| v * v).sum::<f64>();
        let x = array![1.0, 2.0, 0.0, 0.0];
        let data = array![[0.0, 1.0]];

        assert_eq!(evaluate(&obj, &x, &data), 5.0);
    }

    #[test]
    fn test_check_window_rejects_empty_and_malformed() {
        let empty = Array2::<f64>::zeros((0, 2));
        assert!(matches!(check_window(&empty), Err(FitError::EmptyWindow)));

        let wide = Array2::<f64>::zeros((5, 3));
        assert!(matches!(
            check_window(&wide),
            Err(FitError::WindowShape { ncols: 3 })
        ));

        let ok = Array2::<f64>::zeros((5, 2));
        assert!(check_window(&ok).is_ok());
    }
}
