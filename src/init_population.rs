use ndarray::Array2;
use rand::Rng;

use crate::bounds::ParamSpace;

pub(crate) fn init_population<R: Rng + ?Sized>(
    space: &ParamSpace,
    size: usize,
    rng: &mut R,
) -> Array2<f64> {
    let dim = space.dim();
    let mut pop = Array2::<f64>::zeros((size, dim));
    for i in 0..size {
        for j in 0..dim {
            let u: f64 = rng.random();
            pop[(i, j)] = space.lower()[j] + u * (space.upper()[j] - space.lower()[j]);
        }
    }
    pop
}
