use ndarray::Array2;
use rand::Rng;

use crate::bounds::ParamSpace;

/// Uniform re-draw mutation: with probability `prob` a candidate gets one
/// random coordinate replaced by a fresh uniform value inside the bounds.
/// This is a full re-draw of that coordinate, not a local jitter.
pub(crate) fn mutate_uniform<R: Rng + ?Sized>(
    offspring: &Array2<f64>,
    prob: f64,
    space: &ParamSpace,
    rng: &mut R,
) -> Array2<f64> {
    let dim = offspring.ncols();
    let mut mutated = offspring.clone();
    for mut row in mutated.rows_mut() {
        if rng.random::<f64>() < prob {
            let j = rng.random_range(0..dim);
            let u: f64 = rng.random();
            row[j] = space.lower()[j] + u * (space.upper()[j] - space.lower()[j]);
        }
    }
    mutated
}
