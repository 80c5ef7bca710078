//! Error types for the metaheuristic fitting engine.
//!
//! Configuration problems are surfaced at construction/build time and never
//! silently defaulted. Non-finite objective values are not errors; the
//! objective adapter sanitizes them to `+inf` so they can never win.

use thiserror::Error;

/// Errors that can occur while configuring or running an optimizer.
#[derive(Debug, Error)]
pub enum FitError {
    /// A lower bound exceeds its corresponding upper bound, or a bound is
    /// not finite.
    #[error("invalid bounds at index {index}: lower ({lower}) > upper ({upper})")]
    InvalidBounds {
        /// Index of the invalid bound pair
        index: usize,
        /// The lower bound value
        lower: f64,
        /// The upper bound value
        upper: f64,
    },

    /// Population size is too small (must be >= 4).
    #[error("population size ({pop_size}) must be >= 4")]
    PopulationTooSmall {
        /// The invalid population size
        pop_size: usize,
    },

    /// Swarm size is too small (must be >= 2).
    #[error("swarm size ({num_particles}) must be >= 2")]
    SwarmTooSmall {
        /// The invalid swarm size
        num_particles: usize,
    },

    /// The multi-population GA needs at least two populations to migrate
    /// between.
    #[error("multi-population GA needs >= 2 populations, got {num_populations}")]
    TooFewPopulations {
        /// The invalid population count
        num_populations: usize,
    },

    /// An iteration, generation, or stagnation cap is zero.
    #[error("iteration/stagnation cap must be positive, got {cap}")]
    InvalidIterationCap {
        /// The invalid cap value
        cap: usize,
    },

    /// Initial temperature must be finite and strictly positive so the
    /// acceptance formula stays defined.
    #[error("initial temperature must be finite and > 0, got {temperature}")]
    InvalidTemperature {
        /// The invalid temperature
        temperature: f64,
    },

    /// Cooling rate must lie strictly inside (0, 1).
    #[error("cooling rate must be in (0, 1), got {rate}")]
    InvalidCoolingRate {
        /// The invalid cooling rate
        rate: f64,
    },

    /// A crossover/mutation probability range is malformed.
    #[error("probability range [{lo}, {hi}] must satisfy 0 <= lo <= hi <= 1")]
    InvalidProbabilityRange {
        /// Lower end of the range
        lo: f64,
        /// Upper end of the range
        hi: f64,
    },

    /// A swarm coefficient (inertia/cognitive/social) is negative or
    /// non-finite.
    #[error("swarm coefficient {name} must be finite and >= 0, got {value}")]
    InvalidCoefficient {
        /// Name of the offending coefficient
        name: &'static str,
        /// The invalid value
        value: f64,
    },

    /// The data window has no rows.
    #[error("data window is empty")]
    EmptyWindow,

    /// The data window is not a two-column time/value table.
    #[error("data window must have 2 columns (time, value), got {ncols}")]
    WindowShape {
        /// Actual column count
        ncols: usize,
    },
}

/// A specialized `Result` type for fitting operations.
pub type Result<T> = std::result::Result<T, FitError>;

impl FitError {
    /// Returns `true` if this is a bounds-related error.
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, FitError::InvalidBounds { .. })
    }

    /// Returns `true` if this is a configuration error raised at build time.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            FitError::PopulationTooSmall { .. }
                | FitError::SwarmTooSmall { .. }
                | FitError::TooFewPopulations { .. }
                | FitError::InvalidIterationCap { .. }
                | FitError::InvalidTemperature { .. }
                | FitError::InvalidCoolingRate { .. }
                | FitError::InvalidProbabilityRange { .. }
                | FitError::InvalidCoefficient { .. }
        )
    }

    /// Returns `true` if this is a data-window error raised at fit time.
    pub fn is_window_error(&self) -> bool {
        matches!(self, FitError::EmptyWindow | FitError::WindowShape { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FitError::InvalidBounds {
            index: 2,
            lower: 5.0,
            upper: 3.0,
        };
        assert_eq!(
            err.to_string(),
            "invalid bounds at index 2: lower (5) > upper (3)"
        );
    }

    #[test]
    fn test_is_bounds_error() {
        let bounds_err = FitError::InvalidBounds {
            index: 0,
            lower: 1.0,
            upper: 0.0,
        };
        let config_err = FitError::PopulationTooSmall { pop_size: 2 };

        assert!(bounds_err.is_bounds_error());
        assert!(!config_err.is_bounds_error());
    }

    #[test]
    fn test_is_config_error() {
        let config_err = FitError::InvalidCoolingRate { rate: 1.5 };
        let window_err = FitError::EmptyWindow;

        assert!(config_err.is_config_error());
        assert!(!window_err.is_config_error());
    }

    #[test]
    fn test_is_window_error() {
        let window_err = FitError::WindowShape { ncols: 3 };
        let config_err = FitError::SwarmTooSmall { num_particles: 1 };

        assert!(window_err.is_window_error());
        assert!(!config_err.is_window_error());
    }
}
