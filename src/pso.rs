use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::bounds::ParamSpace;
use crate::objective::check_window;
use crate::parallel_eval::evaluate_batch;
use crate::update_position::update_position;
use crate::update_velocity::update_velocity;
use crate::{CallbackAction, FitIntermediate, FitReport, Optimizer, PsoConfig, Result};

/// One candidate solution with a velocity and an independent memory of the
/// best position it has ever visited.
struct Particle {
    position: Array1<f64>,
    velocity: Array1<f64>,
    best_position: Array1<f64>,
    best_fitness: f64,
}

/// Particle Swarm Optimization driver.
///
/// A fixed-size swarm explores the anchored space; each particle follows its
/// own momentum, its personal best and the swarm's global best. Positions
/// are clamped component-wise into the bounds. Unlike the SA/GA drivers the
/// swarm runs for the full iteration budget with no stagnation-based early
/// stop; that asymmetry is intentional and preserved for behavioral
/// fidelity.
pub struct ParticleSwarm<'a, F>
where
    F: Fn(&Array1<f64>, &Array2<f64>) -> f64 + Sync,
{
    objective: &'a F,
    space: ParamSpace,
    config: PsoConfig,
}

impl<'a, F> ParticleSwarm<'a, F>
where
    F: Fn(&Array1<f64>, &Array2<f64>) -> f64 + Sync,
{
    /// Creates a PSO driver for `objective` over `space`.
    pub fn new(objective: &'a F, space: ParamSpace, config: PsoConfig) -> Self {
        Self {
            objective,
            space,
            config,
        }
    }

    /// Mutable access to configuration
    pub fn config_mut(&mut self) -> &mut PsoConfig {
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
        let num_particles = self.config.num_particles;
        let max_iter = self.config.max_iter;
        let (inertia, cognitive, social) = (
            self.config.inertia,
            self.config.cognitive,
            self.config.social,
        );
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

        // Positions uniform in bounds, velocities zero, local best seeded
        // from the full initial position vector and its fitness.
        let positions: Vec<Array1<f64>> = (0..num_particles)
            .map(|_| space.sample(&mut rng))
            .collect();
        let initial_fitness = evaluate_batch(&positions, data, self.objective, &parallel);
        let mut nfev = num_particles;

        let mut particles: Vec<Particle> = positions
            .into_iter()
            .zip(initial_fitness)
            .map(|(position, fitness)| Particle {
                velocity: Array1::zeros(space.dim()),
                best_position: position.clone(),
                best_fitness: fitness,
                position,
            })
            .collect();

        // Seed the global best from a real swarm member so the report stays
        // inside the bounds even when every fitness sanitizes to +inf.
        let mut global_best_f = particles[0].best_fitness;
        let mut global_best_x = particles[0].best_position.clone();
        for p in &particles[1..] {
            if p.best_fitness < global_best_f {
                global_best_f = p.best_fitness;
                global_best_x = p.best_position.clone();
            }
        }

        if disp {
            eprintln!(
                "PSO init [{}..{}]: swarm={}, best_f={:.6e}",
                window_start, window_end, num_particles, global_best_f
            );
        }

        let mut nit = 0usize;
        let mut message = String::new();

        for iter in 1..=max_iter {
            nit = iter;

            // Velocity/position updates draw from the single run RNG in
            // particle order; only the fitness evaluation fans out.
            for p in particles.iter_mut() {
                p.velocity = update_velocity(
                    &p.velocity,
                    &p.position,
                    &p.best_position,
                    &global_best_x,
                    inertia,
                    cognitive,
                    social,
                    &mut rng,
                );
                p.position = update_position(&p.position, &p.velocity, &space);
            }

            let new_positions: Vec<Array1<f64>> =
                particles.iter().map(|p| p.position.clone()).collect();
            let new_fitness = evaluate_batch(&new_positions, data, self.objective, &parallel);
            nfev += num_particles;

            for (p, &f) in particles.iter_mut().zip(new_fitness.iter()) {
                if f < p.best_fitness {
                    p.best_fitness = f;
                    p.best_position = p.position.clone();
                }
            }

            // Global best only moves on strict improvement over the run's
            // previous global best.
            for p in &particles {
                if p.best_fitness < global_best_f {
                    global_best_f = p.best_fitness;
                    global_best_x = p.best_position.clone();
                }
            }

            if disp {
                eprintln!("PSO iter {:4}  best_f={:.6e}", iter, global_best_f);
            }

            if let Some(cb) = self.config.callback.as_mut() {
                let intermediate = FitIntermediate {
                    x: global_best_x.clone(),
                    fun: global_best_f,
                    stagnation: 0,
                    iter,
                };
                if matches!(cb(&intermediate), CallbackAction::Stop) {
                    message = "Stopped by callback".to_string();
                    break;
                }
            }
        }

        if message.is_empty() {
            message = format!("Iteration budget exhausted: {}", max_iter);
        }
        if disp {
            eprintln!("PSO finished: {}", message);
        }

        Ok(FitReport {
            x: global_best_x,
            fun: global_best_f,
            success: true,
            message,
            nit,
            nfev,
        })
    }
}

impl<F> Optimizer for ParticleSwarm<'_, F>
where
    F: Fn(&Array1<f64>, &Array2<f64>) -> f64 + Sync,
{
    fn fit(
        &mut self,
        window_start: usize,
        window_end: usize,
        data: &Array2<f64>,
    ) -> Result<FitReport> {
        ParticleSwarm::fit(self, window_start, window_end, data)
    }
}
