//! Parameter space: the axis-aligned box constraining every candidate.

use ndarray::{Array1, Zip};
use rand::Rng;

use crate::error::{FitError, Result};

/// Number of model parameters: `(t_c, omega, phi, alpha)`.
pub const PARAM_DIM: usize = 4;

/// Axis-aligned bounding box over the four model parameters.
///
/// Dimension 0 (`t_c`) is an absolute time coordinate anchored at the window
/// boundary: [`anchored`](Self::anchored) shifts both of its bounds by the
/// window end index before a fit. The remaining three dimensions are used
/// unshifted. All sampled and clamped candidate vectors lie inside the box.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpace {
    lower: Array1<f64>,
    upper: Array1<f64>,
}

impl ParamSpace {
    /// Creates a parameter space from per-parameter `(low, high)` pairs in
    /// the order `(t_c, omega, phi, alpha)`.
    ///
    /// # Errors
    ///
    /// Returns `FitError::InvalidBounds` if any pair has `low > high` or a
    /// non-finite endpoint.
    pub fn new(bounds: [(f64, f64); PARAM_DIM]) -> Result<Self> {
        for (i, &(lo, hi)) in bounds.iter().enumerate() {
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(FitError::InvalidBounds {
                    index: i,
                    lower: lo,
                    upper: hi,
                });
            }
        }
        Ok(Self {
            lower: bounds.iter().map(|b| b.0).collect(),
            upper: bounds.iter().map(|b| b.1).collect(),
        })
    }

    /// Returns a copy of the space with the `t_c` bounds shifted by the
    /// window end index.
    pub fn anchored(&self, window_end: usize) -> ParamSpace {
        let mut lower = self.lower.clone();
        let mut upper = self.upper.clone();
        lower[0] += window_end as f64;
        upper[0] += window_end as f64;
        ParamSpace { lower, upper }
    }

    /// Number of dimensions.
    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    /// Per-dimension lower bounds.
    pub fn lower(&self) -> &Array1<f64> {
        &self.lower
    }

    /// Per-dimension upper bounds.
    pub fn upper(&self) -> &Array1<f64> {
        &self.upper
    }

    /// Draws one parameter vector uniformly inside the box.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Array1<f64> {
        let mut x = Array1::zeros(self.dim());
        for j in 0..self.dim() {
            let u: f64 = rng.random();
            x[j] = self.lower[j] + u * (self.upper[j] - self.lower[j]);
        }
        x
    }

    /// Pins out-of-bounds components to the nearest bound.
    pub fn clamp(&self, x: &mut Array1<f64>) {
        Zip::from(x)
            .and(&self.lower)
            .and(&self.upper)
            .for_each(|xi, &lo, &hi| *xi = xi.clamp(lo, hi));
    }

    /// Returns `true` if every component of `x` lies within the bounds.
    pub fn contains(&self, x: &Array1<f64>) -> bool {
        x.iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .all(|(&xi, (&lo, &hi))| xi >= lo && xi <= hi)
    }
}
