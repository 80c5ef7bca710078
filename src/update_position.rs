use ndarray::{Array1, Zip};

use crate::bounds::ParamSpace;

/// PSO position update: `x + v`, with out-of-bounds components pinned to the
/// nearest bound (not reflected or wrapped).
pub(crate) fn update_position(
    position: &Array1<f64>,
    velocity: &Array1<f64>,
    space: &ParamSpace,
) -> Array1<f64> {
    Zip::from(position)
        .and(velocity)
        .and(space.lower())
        .and(space.upper())
        .map_collect(|&x, &v, &lo, &hi| (x + v).clamp(lo, hi))
}
