use ndarray::{Array1, Array2};
use rand::Rng;

/// Binary tournament selection: each slot of the new population is filled by
/// the better of two uniformly drawn candidates. Selected rows come only from
/// the existing population, and lower fitness never lowers a candidate's
/// chance of being picked.
pub(crate) fn select_tournament<R: Rng + ?Sized>(
    population: &Array2<f64>,
    fitness: &Array1<f64>,
    rng: &mut R,
) -> Array2<f64> {
    let n = population.nrows();
    let mut selected = Array2::<f64>::zeros(population.raw_dim());
    for i in 0..n {
        let a = rng.random_range(0..n);
        let b = rng.random_range(0..n);
        let winner = if fitness[a] <= fitness[b] { a } else { b };
        selected.row_mut(i).assign(&population.row(winner));
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_selected_rows_come_from_population() {
        let mut population = Array2::zeros((8, 4));
        for i in 0..8 {
            for j in 0..4 {
                population[(i, j)] = (i * 10 + j) as f64;
            }
        }
        let fitness = Array1::from_vec((0..8).map(|i| i as f64).collect());
        let mut rng = StdRng::seed_from_u64(3);

        let selected = select_tournament(&population, &fitness, &mut rng);

        for row in selected.rows() {
            let found = (0..8).any(|i| population.row(i) == row);
            assert!(found, "selected row fabricated from nowhere: {:?}", row);
        }
    }

    #[test]
    fn test_selection_favors_lower_fitness() {
        // One dominant candidate with fitness far below the rest must be
        // selected more often than average.
        let mut population = Array2::zeros((10, 4));
        for i in 0..10 {
            population[(i, 0)] = i as f64;
        }
        let mut fitness = Array1::from_elem(10, 100.0);
        fitness[0] = 0.0;
        let mut rng = StdRng::seed_from_u64(11);

        let mut wins = 0;
        for _ in 0..100 {
            let selected = select_tournament(&population, &fitness, &mut rng);
            wins += selected.rows().into_iter().filter(|r| r[0] == 0.0).count();
        }
        // Binary tournament picks the dominant candidate whenever it enters,
        // i.e. with probability 1 - (9/10)^2 = 0.19 per slot.
        assert!(wins > 120, "dominant candidate selected only {} times", wins);
    }
}
