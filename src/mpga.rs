use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bounds::ParamSpace;
use crate::crossover_single_point::crossover_single_point;
use crate::error::FitError;
use crate::init_population::init_population;
use crate::migrate_ring::migrate_ring;
use crate::mutate_uniform::mutate_uniform;
use crate::objective::check_window;
use crate::parallel_eval::evaluate_population;
use crate::select_tournament::select_tournament;
use crate::{CallbackAction, FitIntermediate, FitReport, GaConfig, Optimizer, Result, argmin};

/// Multi-Population Genetic Algorithm driver.
///
/// Several fixed-size populations evolve independently through the same
/// operator set as [`SingleGa`](crate::SingleGa), each with its own
/// crossover/mutation probabilities drawn once at the start of the run.
/// Every generation the populations exchange candidates over a ring: the
/// best of population `m` migrates into population `(m + 1) % M`. The
/// migration is what keeps a single population from permanently trapping
/// the search in one local basin; without it this would be M independent
/// SGA runs.
pub struct MultiPopGa<'a, F>
where
    F: Fn(&Array1<f64>, &Array2<f64>) -> f64 + Sync,
{
    objective: &'a F,
    space: ParamSpace,
    config: GaConfig,
}

impl<'a, F> MultiPopGa<'a, F>
where
    F: Fn(&Array1<f64>, &Array2<f64>) -> f64 + Sync,
{
    /// Creates an MPGA driver for `objective` over `space`.
    ///
    /// # Errors
    ///
    /// Returns `FitError::TooFewPopulations` if the configuration carries
    /// fewer than two populations.
    pub fn new(objective: &'a F, space: ParamSpace, config: GaConfig) -> Result<Self> {
        if config.num_populations < 2 {
            return Err(FitError::TooFewPopulations {
                num_populations: config.num_populations,
            });
        }
        Ok(Self {
            objective,
            space,
            config,
        })
    }

    /// Mutable access to configuration
    pub fn config_mut(&mut self) -> &mut GaConfig {
        &mut self.config
    }

    /// Fits the window `[window_start, window_end]`; `window_start` is
    /// bookkeeping only, `window_end` anchors the `t_c` bounds.
    pub fn fit(
        &mut self,
        window_start: usize,
        window_end: usize,
        data: &Array2<f64>,
    ) -> Result<FitReport> {
        check_window(data)?;
        let space = self.space.anchored(window_end);
        let num_pops = self.config.num_populations;
        let pop_size = self.config.population_size;
        let max_gen = self.config.max_gen;
        let stop_gen = self.config.stop_gen;
        let disp = self.config.disp;
        let parallel = self.config.parallel.clone();

        if let Some(n) = parallel.num_threads {
            // Ignore error if global pool already set
            let _ = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build_global();
        }

        let mut rng: StdRng = match self.config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => {
                let mut thread_rng = rand::rng();
                StdRng::from_rng(&mut thread_rng)
            }
        };

        // One probability pair per population, fixed for the whole run.
        let (c_lo, c_hi) = self.config.crossover_prob;
        let (m_lo, m_hi) = self.config.mutation_prob;
        let crossover_probs: Vec<f64> = (0..num_pops)
            .map(|_| c_lo + rng.random::<f64>() * (c_hi - c_lo))
            .collect();
        let mutation_probs: Vec<f64> = (0..num_pops)
            .map(|_| m_lo + rng.random::<f64>() * (m_hi - m_lo))
            .collect();

        let mut populations: Vec<Array2<f64>> = (0..num_pops)
            .map(|_| init_population(&space, pop_size, &mut rng))
            .collect();
        let mut fitness: Vec<Array1<f64>> = populations
            .iter()
            .map(|pop| evaluate_population(pop, data, self.objective, &parallel))
            .collect();
        let mut nfev = num_pops * pop_size;

        // Seed the tracker from a real candidate so the report stays inside
        // the bounds even when every fitness sanitizes to +inf.
        let (seed_i, mut best_f) = argmin(&fitness[0]);
        let mut best_x = populations[0].row(seed_i).to_owned();
        for (pop, fit) in populations.iter().zip(fitness.iter()).skip(1) {
            let (i, f) = argmin(fit);
            if f < best_f {
                best_f = f;
                best_x = pop.row(i).to_owned();
            }
        }

        if disp {
            eprintln!(
                "MPGA init [{}..{}]: {} pops x {}, best_f={:.6e}",
                window_start, window_end, num_pops, pop_size, best_f
            );
        }

        let mut gen = 1usize;
        let mut gen0 = 0usize;
        let mut nit = 0usize;
        let mut success = false;
        let mut message = String::new();

        while gen0 < stop_gen && gen <= max_gen {
            nit = gen;

            for k in 0..num_pops {
                let selected = select_tournament(&populations[k], &fitness[k], &mut rng);
                let offspring = crossover_single_point(&selected, crossover_probs[k], &mut rng);
                populations[k] = mutate_uniform(&offspring, mutation_probs[k], &space, &mut rng);
                fitness[k] =
                    evaluate_population(&populations[k], data, self.objective, &parallel);
            }
            nfev += num_pops * pop_size;

            migrate_ring(&mut populations, &mut fitness);

            let mut new_best_f = f64::INFINITY;
            let mut new_best_x = None;
            for (pop, fit) in populations.iter().zip(fitness.iter()) {
                let (i, f) = argmin(fit);
                if f < new_best_f {
                    new_best_f = f;
                    new_best_x = Some(pop.row(i).to_owned());
                }
            }

            if new_best_f < best_f {
                best_f = new_best_f;
                if let Some(x) = new_best_x {
                    best_x = x;
                }
                gen0 = 0;
            } else {
                gen0 += 1;
            }

            if disp {
                eprintln!(
                    "MPGA gen {:4}  best_f={:.6e}  stagnation={}",
                    gen, best_f, gen0
                );
            }

            if let Some(cb) = self.config.callback.as_mut() {
                let intermediate = FitIntermediate {
                    x: best_x.clone(),
                    fun: best_f,
                    stagnation: gen0,
                    iter: gen,
                };
                if matches!(cb(&intermediate), CallbackAction::Stop) {
                    success = true;
                    message = "Stopped by callback".to_string();
                    break;
                }
            }

            gen += 1;
        }

        if message.is_empty() {
            if gen0 >= stop_gen {
                success = true;
                message = format!("Converged: {} generations without improvement", gen0);
            } else {
                message = format!("Maximum generations reached: {}", max_gen);
            }
        }
        if disp {
            eprintln!("MPGA finished: {}", message);
        }

        Ok(FitReport {
            x: best_x,
            fun: best_f,
            success,
            message,
            nit,
            nfev,
        })
    }
}

impl<F> Optimizer for MultiPopGa<'_, F>
where
    F: Fn(&Array1<f64>, &Array2<f64>) -> f64 + Sync,
{
    fn fit(
        &mut self,
        window_start: usize,
        window_end: usize,
        data: &Array2<f64>,
    ) -> Result<FitReport> {
        MultiPopGa::fit(self, window_start, window_end, data)
    }
}
