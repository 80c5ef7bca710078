use ndarray::Array2;
use rand::Rng;

/// Single-point crossover over adjacent pairs: with probability `prob` a pair
/// exchanges the tail segment from a random cut point. Offspring coordinates
/// therefore come only from the two parents. An odd trailing candidate is
/// carried over unchanged.
pub(crate) fn crossover_single_point<R: Rng + ?Sized>(
    parents: &Array2<f64>,
    prob: f64,
    rng: &mut R,
) -> Array2<f64> {
    let n = parents.nrows();
    let dim = parents.ncols();
    let mut offspring = parents.clone();
    let mut i = 0;
    while i + 1 < n {
        if rng.random::<f64>() < prob {
            let point = rng.random_range(1..dim);
            for j in point..dim {
                let tmp = offspring[(i, j)];
                offspring[(i, j)] = offspring[(i + 1, j)];
                offspring[(i + 1, j)] = tmp;
            }
        }
        i += 2;
    }
    offspring
}
