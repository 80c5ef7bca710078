//! Metaheuristic optimization engine for fitting log-periodic models.
//!
//! This crate fits a nonlinear four-parameter model to windows of a time
//! series by minimizing an externally supplied residual-sum-of-squares
//! objective with one of three interchangeable global-optimization
//! strategies:
//!
//! - Simulated Annealing ([`SimulatedAnnealing`])
//! - a Genetic Algorithm, single-population ([`SingleGa`]) or
//!   multi-population with ring migration ([`MultiPopGa`])
//! - Particle Swarm Optimization ([`ParticleSwarm`])
//!
//! All drivers share the same contract: construct with an objective, a
//! [`ParamSpace`] and a validated configuration, then call
//! [`fit`](Optimizer::fit) per time window. The objective is treated as a
//! pure black box whose cost dominates runtime; per-generation fitness
//! evaluation can fan out over a rayon thread pool.
//!
//! # Example
//!
//! ```rust
//! use lppl_optim::{ParamSpace, ParticleSwarm, PsoConfigBuilder};
//! use ndarray::{array, Array1, Array2};
//!
//! // Squared distance to a fixed point, standing in for the model RSS.
//! let objective = |x: &Array1<f64>, _data: &Array2<f64>| {
//!     x.iter().map(|&xi| (xi - 0.5) * (xi - 0.5)).sum::<f64>()
//! };
//!
//! let space = ParamSpace::new([(0.0, 1.0), (0.0, 1.0), (0.0, 1.0), (0.0, 1.0)]).unwrap();
//! let config = PsoConfigBuilder::new().seed(42).max_iter(50).build().unwrap();
//! let data = array![[0.0, 1.0], [1.0, 2.0], [2.0, 3.0]];
//!
//! let mut pso = ParticleSwarm::new(&objective, space, config);
//! let report = pso.fit(0, 0, &data).unwrap();
//! assert!(report.fun.is_finite());
//! ```
#![warn(missing_docs)]

pub mod error;
pub use error::{FitError, Result};

use ndarray::{Array1, Array2};

/// Parameter space: bounds validation, window anchoring, sampling, clamping.
pub mod bounds;
/// Thin adapter around the external objective function.
pub mod objective;

/// Uniform random initialization of a population inside the bounds.
mod init_population;

/// Tournament selection over a population.
mod select_tournament;
/// Single-point recombination over adjacent pairs.
mod crossover_single_point;
/// Uniform coordinate re-draw mutation.
mod mutate_uniform;
/// Ring migration between sub-populations.
mod migrate_ring;

/// PSO velocity dynamics.
mod update_velocity;
/// PSO position dynamics with bounds clamping.
mod update_position;

/// Parallel fitness evaluation support.
pub mod parallel_eval;

/// Simulated Annealing driver.
pub mod sa;
/// Single-population Genetic Algorithm driver.
pub mod sga;
/// Multi-population Genetic Algorithm driver with migration.
pub mod mpga;
/// Particle Swarm Optimization driver.
pub mod pso;


pub use bounds::{PARAM_DIM, ParamSpace};
pub use mpga::MultiPopGa;
pub use parallel_eval::ParallelConfig;
pub use pso::ParticleSwarm;
pub use sa::SimulatedAnnealing;
pub use sga::SingleGa;

pub(crate) fn argmin(v: &Array1<f64>) -> (usize, f64) {
    let mut best_i = 0usize;
    let mut best_v = v[0];
    for (i, &val) in v.iter().enumerate() {
        if val < best_v {
            best_v = val;
            best_i = i;
        }
    }
    (best_i, best_v)
}

/// Callback function type
pub type CallbackFn = Box<dyn FnMut(&FitIntermediate) -> CallbackAction>;

/// Action returned by callback to control optimization flow.
pub enum CallbackAction {
    /// Continue optimization.
    Continue,
    /// Stop optimization early.
    Stop,
}

/// Information passed to callback after each iteration/generation.
pub struct FitIntermediate {
    /// Current best parameter vector.
    pub x: Array1<f64>,
    /// Current best fitness value.
    pub fun: f64,
    /// Consecutive iterations without strict improvement (always zero for
    /// PSO, which does not track stagnation).
    pub stagnation: usize,
    /// Current iteration/generation number.
    pub iter: usize,
}

/// Result/report of a single `fit` call.
///
/// Contains the best solution found, termination status, and counters.
#[derive(Debug, Clone)]
pub struct FitReport {
    /// Best parameter vector found, component-wise inside the anchored bounds.
    pub x: Array1<f64>,
    /// Best fitness value (RSS) found.
    pub fun: f64,
    /// Whether the run terminated through convergence (stagnation cap or
    /// callback) rather than exhausting its budget. Always `true` for PSO,
    /// whose only termination primitive is the iteration cap.
    pub success: bool,
    /// Human-readable termination message.
    pub message: String,
    /// Number of iterations (generations) performed.
    pub nit: usize,
    /// Number of objective evaluations performed.
    pub nfev: usize,
}

/// Uniform contract implemented by every strategy driver.
///
/// `window_start` is carried for bookkeeping only; `window_end` anchors the
/// absolute-time parameter bounds. `data` is the two-column time/value
/// window itself; slicing it out of the full series is the caller's job.
pub trait Optimizer {
    /// Runs one complete optimization over the window and returns the best
    /// `(fitness, parameters)` found.
    fn fit(
        &mut self,
        window_start: usize,
        window_end: usize,
        data: &Array2<f64>,
    ) -> Result<FitReport>;
}

// ------------------------------ Configurations ------------------------------

/// Configuration for the Simulated Annealing driver.
pub struct SaConfig {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Stagnation cap: consecutive non-improving iterations before stopping.
    pub stop_iter: usize,
    /// Initial temperature (finite, > 0).
    pub initial_temp: f64,
    /// Geometric cooling factor in (0, 1), applied every iteration.
    pub cooling_rate: f64,
    /// Optional random seed for reproducibility.
    pub seed: Option<u64>,
    /// Print progress at each iteration.
    pub disp: bool,
    /// Optional per-iteration callback (may stop early).
    pub callback: Option<CallbackFn>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            max_iter: 20_000,
            stop_iter: 2_000,
            initial_temp: 10.0,
            cooling_rate: 0.995,
            seed: None,
            disp: false,
            callback: None,
        }
    }
}

/// Fluent builder for [`SaConfig`].
pub struct SaConfigBuilder {
    cfg: SaConfig,
}

impl Default for SaConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SaConfigBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            cfg: SaConfig::default(),
        }
    }
    /// Sets the maximum number of iterations.
    pub fn max_iter(mut self, v: usize) -> Self {
        self.cfg.max_iter = v;
        self
    }
    /// Sets the stagnation cap.
    pub fn stop_iter(mut self, v: usize) -> Self {
        self.cfg.stop_iter = v;
        self
    }
    /// Sets the initial temperature.
    pub fn initial_temp(mut self, v: f64) -> Self {
        self.cfg.initial_temp = v;
        self
    }
    /// Sets the cooling rate.
    pub fn cooling_rate(mut self, v: f64) -> Self {
        self.cfg.cooling_rate = v;
        self
    }
    /// Sets the random seed for reproducibility.
    pub fn seed(mut self, v: u64) -> Self {
        self.cfg.seed = Some(v);
        self
    }
    /// Enables/disables progress display.
    pub fn disp(mut self, v: bool) -> Self {
        self.cfg.disp = v;
        self
    }
    /// Sets a per-iteration callback function.
    pub fn callback(mut self, cb: CallbackFn) -> Self {
        self.cfg.callback = Some(cb);
        self
    }
    /// Builds and returns the configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for zero caps, a non-positive or
    /// non-finite initial temperature, or a cooling rate outside (0, 1).
    pub fn build(self) -> Result<SaConfig> {
        if self.cfg.max_iter == 0 || self.cfg.stop_iter == 0 {
            return Err(FitError::InvalidIterationCap { cap: 0 });
        }
        if !self.cfg.initial_temp.is_finite() || self.cfg.initial_temp <= 0.0 {
            return Err(FitError::InvalidTemperature {
                temperature: self.cfg.initial_temp,
            });
        }
        if !self.cfg.cooling_rate.is_finite()
            || self.cfg.cooling_rate <= 0.0
            || self.cfg.cooling_rate >= 1.0
        {
            return Err(FitError::InvalidCoolingRate {
                rate: self.cfg.cooling_rate,
            });
        }
        Ok(self.cfg)
    }
}

/// Configuration shared by the [`SingleGa`] and [`MultiPopGa`] drivers.
///
/// Crossover and mutation probabilities are given as ranges; each run draws
/// one concrete probability per population from its range, once, at the
/// start of the run.
pub struct GaConfig {
    /// Number of candidates per population (>= 4).
    pub population_size: usize,
    /// Maximum number of generations.
    pub max_gen: usize,
    /// Stagnation cap: consecutive non-improving generations before stopping.
    pub stop_gen: usize,
    /// Number of sub-populations (MPGA only; must be >= 2 there).
    pub num_populations: usize,
    /// `[lo, hi]` range the per-population crossover probability is drawn from.
    pub crossover_prob: (f64, f64),
    /// `[lo, hi]` range the per-population mutation probability is drawn from.
    pub mutation_prob: (f64, f64),
    /// Optional random seed for reproducibility.
    pub seed: Option<u64>,
    /// Parallel evaluation configuration.
    pub parallel: ParallelConfig,
    /// Print progress at each generation.
    pub disp: bool,
    /// Optional per-generation callback (may stop early).
    pub callback: Option<CallbackFn>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_gen: 500,
            stop_gen: 50,
            num_populations: 4,
            crossover_prob: (0.001, 0.05),
            mutation_prob: (0.001, 0.05),
            seed: None,
            parallel: ParallelConfig::default(),
            disp: false,
            callback: None,
        }
    }
}

/// Fluent builder for [`GaConfig`].
pub struct GaConfigBuilder {
    cfg: GaConfig,
}

impl Default for GaConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GaConfigBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            cfg: GaConfig::default(),
        }
    }
    /// Sets the population size.
    pub fn population_size(mut self, v: usize) -> Self {
        self.cfg.population_size = v;
        self
    }
    /// Sets the maximum number of generations.
    pub fn max_gen(mut self, v: usize) -> Self {
        self.cfg.max_gen = v;
        self
    }
    /// Sets the stagnation cap.
    pub fn stop_gen(mut self, v: usize) -> Self {
        self.cfg.stop_gen = v;
        self
    }
    /// Sets the number of sub-populations (MPGA).
    pub fn num_populations(mut self, v: usize) -> Self {
        self.cfg.num_populations = v;
        self
    }
    /// Sets the crossover probability range.
    pub fn crossover_prob(mut self, lo: f64, hi: f64) -> Self {
        self.cfg.crossover_prob = (lo, hi);
        self
    }
    /// Sets the mutation probability range.
    pub fn mutation_prob(mut self, lo: f64, hi: f64) -> Self {
        self.cfg.mutation_prob = (lo, hi);
        self
    }
    /// Sets the random seed for reproducibility.
    pub fn seed(mut self, v: u64) -> Self {
        self.cfg.seed = Some(v);
        self
    }
    /// Sets the parallel evaluation configuration.
    pub fn parallel(mut self, v: ParallelConfig) -> Self {
        self.cfg.parallel = v;
        self
    }
    /// Enables/disables progress display.
    pub fn disp(mut self, v: bool) -> Self {
        self.cfg.disp = v;
        self
    }
    /// Sets a per-generation callback function.
    pub fn callback(mut self, cb: CallbackFn) -> Self {
        self.cfg.callback = Some(cb);
        self
    }
    /// Builds and returns the configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a population below 4, zero caps,
    /// zero populations, or a malformed probability range.
    pub fn build(self) -> Result<GaConfig> {
        if self.cfg.population_size < 4 {
            return Err(FitError::PopulationTooSmall {
                pop_size: self.cfg.population_size,
            });
        }
        if self.cfg.max_gen == 0 || self.cfg.stop_gen == 0 {
            return Err(FitError::InvalidIterationCap { cap: 0 });
        }
        if self.cfg.num_populations == 0 {
            return Err(FitError::TooFewPopulations { num_populations: 0 });
        }
        for &(lo, hi) in [&self.cfg.crossover_prob, &self.cfg.mutation_prob] {
            if !lo.is_finite() || !hi.is_finite() || lo < 0.0 || hi > 1.0 || lo > hi {
                return Err(FitError::InvalidProbabilityRange { lo, hi });
            }
        }
        Ok(self.cfg)
    }
}

/// Configuration for the Particle Swarm Optimization driver.
pub struct PsoConfig {
    /// Number of particles in the swarm (>= 2).
    pub num_particles: usize,
    /// Iteration budget; the only termination primitive for PSO.
    pub max_iter: usize,
    /// Inertia coefficient `w`: how strongly a particle keeps its momentum.
    pub inertia: f64,
    /// Cognitive coefficient `c1`: pull toward the particle's own best.
    pub cognitive: f64,
    /// Social coefficient `c2`: pull toward the swarm's best.
    pub social: f64,
    /// Optional random seed for reproducibility.
    pub seed: Option<u64>,
    /// Parallel evaluation configuration.
    pub parallel: ParallelConfig,
    /// Print progress at each iteration.
    pub disp: bool,
    /// Optional per-iteration callback (may stop early).
    pub callback: Option<CallbackFn>,
}

impl Default for PsoConfig {
    fn default() -> Self {
        Self {
            num_particles: 40,
            max_iter: 500,
            inertia: 0.8,
            cognitive: 1.2,
            social: 1.2,
            seed: None,
            parallel: ParallelConfig::default(),
            disp: false,
            callback: None,
        }
    }
}

/// Fluent builder for [`PsoConfig`].
pub struct PsoConfigBuilder {
    cfg: PsoConfig,
}

impl Default for PsoConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PsoConfigBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            cfg: PsoConfig::default(),
        }
    }
    /// Sets the swarm size.
    pub fn num_particles(mut self, v: usize) -> Self {
        self.cfg.num_particles = v;
        self
    }
    /// Sets the iteration budget.
    pub fn max_iter(mut self, v: usize) -> Self {
        self.cfg.max_iter = v;
        self
    }
    /// Sets the inertia coefficient.
    pub fn inertia(mut self, v: f64) -> Self {
        self.cfg.inertia = v;
        self
    }
    /// Sets the cognitive coefficient.
    pub fn cognitive(mut self, v: f64) -> Self {
        self.cfg.cognitive = v;
        self
    }
    /// Sets the social coefficient.
    pub fn social(mut self, v: f64) -> Self {
        self.cfg.social = v;
        self
    }
    /// Sets the random seed for reproducibility.
    pub fn seed(mut self, v: u64) -> Self {
        self.cfg.seed = Some(v);
        self
    }
    /// Sets the parallel evaluation configuration.
    pub fn parallel(mut self, v: ParallelConfig) -> Self {
        self.cfg.parallel = v;
        self
    }
    /// Enables/disables progress display.
    pub fn disp(mut self, v: bool) -> Self {
        self.cfg.disp = v;
        self
    }
    /// Sets a per-iteration callback function.
    pub fn callback(mut self, cb: CallbackFn) -> Self {
        self.cfg.callback = Some(cb);
        self
    }
    /// Builds and returns the configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a swarm below 2, a zero iteration
    /// budget, or a negative/non-finite coefficient.
    pub fn build(self) -> Result<PsoConfig> {
        if self.cfg.num_particles < 2 {
            return Err(FitError::SwarmTooSmall {
                num_particles: self.cfg.num_particles,
            });
        }
        if self.cfg.max_iter == 0 {
            return Err(FitError::InvalidIterationCap { cap: 0 });
        }
        for (name, value) in [
            ("inertia", self.cfg.inertia),
            ("cognitive", self.cfg.cognitive),
            ("social", self.cfg.social),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FitError::InvalidCoefficient { name, value });
            }
        }
        Ok(self.cfg)
    }
}
