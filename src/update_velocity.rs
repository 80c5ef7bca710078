use ndarray::{Array1, Zip};
use rand::Rng;

/// PSO velocity update: `w * v + c1 * r1 * (local_best - x) + c2 * r2 *
/// (global_best - x)` with scalar `r1`, `r2` drawn uniformly in [0, 1] per
/// call.
#[allow(clippy::too_many_arguments)]
pub(crate) fn update_velocity<R: Rng + ?Sized>(
    velocity: &Array1<f64>,
    position: &Array1<f64>,
    local_best: &Array1<f64>,
    global_best: &Array1<f64>,
    inertia: f64,
    cognitive: f64,
    social: f64,
    rng: &mut R,
) -> Array1<f64> {
    let r1: f64 = rng.random();
    let r2: f64 = rng.random();
    Zip::from(velocity)
        .and(position)
        .and(local_best)
        .and(global_best)
        .map_collect(|&v, &x, &lb, &gb| {
            inertia * v + cognitive * r1 * (lb - x) + social * r2 * (gb - x)
        })
}
