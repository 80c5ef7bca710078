use ndarray::{Array1, Array2};
use rayon::prelude::*;

use crate::objective::evaluate;

/// Parallel evaluation configuration
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Enable parallel evaluation
    pub enabled: bool,
    /// Number of threads to use (None = use rayon default)
    pub num_threads: Option<usize>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            num_threads: None,
        }
    }
}

/// Evaluate every row of a population matrix against the data window.
///
/// The objective is pure, so parallel and sequential evaluation produce
/// identical results in the same order.
pub(crate) fn evaluate_population<F>(
    population: &Array2<f64>,
    data: &Array2<f64>,
    objective: &F,
    config: &ParallelConfig,
) -> Array1<f64>
where
    F: Fn(&Array1<f64>, &Array2<f64>) -> f64 + Sync,
{
    let npop = population.nrows();

    if !config.enabled || npop < 4 {
        // Sequential evaluation for small populations or when disabled
        let mut fitness = Array1::zeros(npop);
        for i in 0..npop {
            let candidate = population.row(i).to_owned();
            fitness[i] = evaluate(objective, &candidate, data);
        }
        return fitness;
    }

    // Always use global thread pool (configured once in the driver)
    let results = (0..npop)
        .into_par_iter()
        .map(|i| {
            let candidate = population.row(i).to_owned();
            evaluate(objective, &candidate, data)
        })
        .collect::<Vec<f64>>();

    Array1::from_vec(results)
}

/// Evaluate a batch of candidate vectors (one per particle sweep).
pub(crate) fn evaluate_batch<F>(
    candidates: &[Array1<f64>],
    data: &Array2<f64>,
    objective: &F,
    config: &ParallelConfig,
) -> Vec<f64>
where
    F: Fn(&Array1<f64>, &Array2<f64>) -> f64 + Sync,
{
    if !config.enabled || candidates.len() < 4 {
        return candidates
            .iter()
            .map(|x| evaluate(objective, x, data))
            .collect();
    }

    candidates
        .par_iter()
        .map(|x| evaluate(objective, x, data))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_matches_sequential() {
        let objective =
            |x: &Array1<f64>, _data: &Array2<f64>| x.iter().map(|&xi| xi * xi).sum::<f64>();
        let data = Array2::<f64>::zeros((3, 2));

        let mut population = Array2::zeros((10, 4));
        for i in 0..10 {
            for j in 0..4 {
                population[[i, j]] = (i as f64) * 0.1 + (j as f64) * 0.01;
            }
        }

        let parallel = ParallelConfig {
            enabled: true,
            num_threads: Some(2),
        };
        let fitness_par = evaluate_population(&population, &data, &objective, &parallel);

        let sequential = ParallelConfig {
            enabled: false,
            num_threads: None,
        };
        let fitness_seq = evaluate_population(&population, &data, &objective, &sequential);

        assert_eq!(fitness_par.len(), 10);
        for i in 0..10 {
            let expected = population.row(i).iter().map(|&x| x * x).sum::<f64>();
            assert_eq!(fitness_par[i], expected);
            assert_eq!(fitness_par[i], fitness_seq[i]);
        }
    }

    #[test]
    fn test_batch_evaluation_order_preserved() {
        let objective = |x: &Array1<f64>, _data: &Array2<f64>| x[0];
        let data = Array2::<f64>::zeros((1, 2));

        let candidates: Vec<Array1<f64>> = (0..8)
            .map(|i| Array1::from_vec(vec![i as f64, 0.0, 0.0, 0.0]))
            .collect();

        let fitness = evaluate_batch(&candidates, &data, &objective, &ParallelConfig::default());
        for (i, &f) in fitness.iter().enumerate() {
            assert_eq!(f, i as f64);
        }
    }
}
