use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bounds::ParamSpace;
use crate::objective::{check_window, evaluate};
use crate::{CallbackAction, FitIntermediate, FitReport, Optimizer, Result, SaConfig};

/// Simulated Annealing driver over a single current solution.
///
/// Each iteration draws a fresh candidate uniformly over the whole anchored
/// space (full-space resampling, not a local perturbation of the current
/// point). An improving candidate is always accepted; a worse one is
/// accepted with probability `exp(-delta / temperature)` under a geometric
/// cooling schedule. The run stops once the stagnation counter exceeds its
/// cap or the iteration budget runs out, whichever fires first; the
/// iteration cap also guards against numerical underflow of the temperature.
pub struct SimulatedAnnealing<'a, F>
where
    F: Fn(&Array1<f64>, &Array2<f64>) -> f64 + Sync,
{
    objective: &'a F,
    space: ParamSpace,
    config: SaConfig,
}

impl<'a, F> SimulatedAnnealing<'a, F>
where
    F: Fn(&Array1<f64>, &Array2<f64>) -> f64 + Sync,
{
    /// Creates an SA driver for `objective` over `space`.
    pub fn new(objective: &'a F, space: ParamSpace, config: SaConfig) -> Self {
        Self {
            objective,
            space,
            config,
        }
    }

    /// Mutable access to configuration
    pub fn config_mut(&mut self) -> &mut SaConfig {
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
        let max_iter = self.config.max_iter;
        let stop_iter = self.config.stop_iter;
        let disp = self.config.disp;

        let mut rng: StdRng = match self.config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => {
                let mut thread_rng = rand::rng();
                StdRng::from_rng(&mut thread_rng)
            }
        };

        let mut current_x = space.sample(&mut rng);
        let mut current_f = evaluate(self.objective, &current_x, data);
        let mut best_x = current_x.clone();
        let mut best_f = current_f;
        let mut nfev = 1usize;
        let mut temperature = self.config.initial_temp;
        let mut stagnation = 0usize;
        let mut nit = 0usize;
        let mut success = false;
        let mut message = String::new();

        if disp {
            eprintln!(
                "SA init [{}..{}]: f={:.6e}  T={:.3e}",
                window_start, window_end, current_f, temperature
            );
        }

        while nit < max_iter {
            nit += 1;

            let candidate_x = space.sample(&mut rng);
            let candidate_f = evaluate(self.objective, &candidate_x, data);
            nfev += 1;

            let delta = candidate_f - current_f;
            if accept(delta, temperature, &mut rng) {
                current_x = candidate_x;
                current_f = candidate_f;
            }

            if current_f < best_f {
                best_f = current_f;
                best_x = current_x.clone();
                stagnation = 0;
            } else {
                stagnation += 1;
            }

            // Monotonic decay, regardless of acceptance outcome.
            temperature *= self.config.cooling_rate;

            if disp {
                eprintln!(
                    "SA iter {:6}  best_f={:.6e}  T={:.3e}  stagnation={}",
                    nit, best_f, temperature, stagnation
                );
            }

            if let Some(cb) = self.config.callback.as_mut() {
                let intermediate = FitIntermediate {
                    x: best_x.clone(),
                    fun: best_f,
                    stagnation,
                    iter: nit,
                };
                if matches!(cb(&intermediate), CallbackAction::Stop) {
                    success = true;
                    message = "Stopped by callback".to_string();
                    break;
                }
            }

            if stagnation > stop_iter {
                success = true;
                message = format!("Converged: {} iterations without improvement", stagnation);
                break;
            }
        }

        if message.is_empty() {
            message = format!("Maximum iterations reached: {}", max_iter);
        }
        if disp {
            eprintln!("SA finished: {}", message);
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

impl<F> Optimizer for SimulatedAnnealing<'_, F>
where
    F: Fn(&Array1<f64>, &Array2<f64>) -> f64 + Sync,
{
    fn fit(
        &mut self,
        window_start: usize,
        window_end: usize,
        data: &Array2<f64>,
    ) -> Result<FitReport> {
        SimulatedAnnealing::fit(self, window_start, window_end, data)
    }
}

/// Probability of accepting a candidate whose fitness differs from the
/// current one by `delta`. Improvements (`delta < 0`) are certain.
pub(crate) fn accept_probability(delta: f64, temperature: f64) -> f64 {
    if delta < 0.0 {
        1.0
    } else {
        (-delta / temperature).exp()
    }
}

pub(crate) fn accept<R: Rng + ?Sized>(delta: f64, temperature: f64, rng: &mut R) -> bool {
    delta < 0.0 || rng.random::<f64>() < (-delta / temperature).exp()
}
