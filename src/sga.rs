use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bounds::ParamSpace;
use crate::crossover_single_point::crossover_single_point;
use crate::init_population::init_population;
use crate::mutate_uniform::mutate_uniform;
use crate::objective::check_window;
use crate::parallel_eval::evaluate_population;
use crate::select_tournament::select_tournament;
use crate::{CallbackAction, FitIntermediate, FitReport, GaConfig, Optimizer, Result, argmin};

/// Single-population Genetic Algorithm driver.
///
/// One fixed-size population evolves through tournament selection,
/// single-point crossover and uniform re-draw mutation until the best
/// fitness stagnates for `stop_gen` generations or the generation budget
/// runs out. Crossover and mutation probabilities are drawn once at the
/// start of the run from the configured ranges.
pub struct SingleGa<'a, F>
where
    F: Fn(&Array1<f64>, &Array2<f64>) -> f64 + Sync,
{
    objective: &'a F,
    space: ParamSpace,
    config: GaConfig,
}

impl<'a, F> SingleGa<'a, F>
where
    F: Fn(&Array1<f64>, &Array2<f64>) -> f64 + Sync,
{
    /// Creates an SGA driver for `objective` over `space`.
    pub fn new(objective: &'a F, space: ParamSpace, config: GaConfig) -> Self {
        Self {
            objective,
            space,
            config,
        }
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

        let (c_lo, c_hi) = self.config.crossover_prob;
        let (m_lo, m_hi) = self.config.mutation_prob;
        let crossover_prob = c_lo + rng.random::<f64>() * (c_hi - c_lo);
        let mutation_prob = m_lo + rng.random::<f64>() * (m_hi - m_lo);

        let mut population = init_population(&space, pop_size, &mut rng);
        let mut fitness = evaluate_population(&population, data, self.objective, &parallel);
        let mut nfev = pop_size;

        let (best_i, mut best_f) = argmin(&fitness);
        let mut best_x = population.row(best_i).to_owned();

        if disp {
            eprintln!(
                "SGA init [{}..{}]: pop={}, p_c={:.4}, p_m={:.4}, best_f={:.6e}",
                window_start, window_end, pop_size, crossover_prob, mutation_prob, best_f
            );
        }

        let mut gen = 1usize;
        let mut gen0 = 0usize;
        let mut nit = 0usize;
        let mut success = false;
        let mut message = String::new();

        while gen0 < stop_gen && gen <= max_gen {
            nit = gen;

            let selected = select_tournament(&population, &fitness, &mut rng);
            let offspring = crossover_single_point(&selected, crossover_prob, &mut rng);
            population = mutate_uniform(&offspring, mutation_prob, &space, &mut rng);

            fitness = evaluate_population(&population, data, self.objective, &parallel);
            nfev += pop_size;

            let (new_best_i, new_best_f) = argmin(&fitness);
            if new_best_f < best_f {
                best_f = new_best_f;
                best_x = population.row(new_best_i).to_owned();
                gen0 = 0;
            } else {
                gen0 += 1;
            }

            if disp {
                eprintln!(
                    "SGA gen {:4}  best_f={:.6e}  stagnation={}",
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
            eprintln!("SGA finished: {}", message);
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

impl<F> Optimizer for SingleGa<'_, F>
where
    F: Fn(&Array1<f64>, &Array2<f64>) -> f64 + Sync,
{
    fn fit(
        &mut self,
        window_start: usize,
        window_end: usize,
        data: &Array2<f64>,
    ) -> Result<FitReport> {
        SingleGa::fit(self, window_start, window_end, data)
    }
}
