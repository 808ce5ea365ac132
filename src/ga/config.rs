//! GA configuration.
//!
//! [`GaConfig`] holds every parameter of the evolutionary loop. Rule
//! weights live in [`RuleWeights`](super::RuleWeights) and the shape of the
//! school week in the [`Catalog`](crate::catalog::Catalog).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};

/// Configuration for the timetable GA.
///
/// # Defaults
///
/// ```
/// use u_timetable::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_generations, 700);
/// assert_eq!(config.tournament_size, 5);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_timetable::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(50)
///     .with_max_generations(500)
///     .with_mutation_rate(0.1)
///     .with_tournament_size(3)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GaConfig {
    /// Number of timetables in the population.
    pub population_size: usize,

    /// Generations to run before giving up on convergence.
    pub max_generations: usize,

    /// Per-lesson probability of perturbation (0.0–1.0).
    pub mutation_rate: f64,

    /// Individuals drawn per tournament. Larger = stronger selection pressure.
    pub tournament_size: usize,

    /// Whether offspring pass through the teacher-load repair step.
    pub repair: bool,

    /// Lessons a teacher may keep on one day when repair is enabled.
    pub teacher_daily_limit: usize,

    /// Whether to evaluate fitness in parallel (requires the `parallel` feature).
    pub parallel: bool,

    /// Random seed for reproducibility. `None` uses OS entropy.
    pub seed: Option<u64>,

    /// Independent fresh runs attempted by
    /// [`TimetableRunner::find_solution`](super::TimetableRunner::find_solution).
    pub max_attempts: usize,

    /// Progress is reported every this many generations.
    pub report_interval: usize,

    /// A conflict snapshot of the best timetable is taken every this many
    /// generations.
    pub snapshot_interval: usize,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 700,
            mutation_rate: 0.05,
            tournament_size: 5,
            repair: false,
            teacher_daily_limit: 3,
            parallel: true,
            seed: None,
            max_attempts: 1,
            report_interval: 100,
            snapshot_interval: 20,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the generation ceiling.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the per-lesson mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Enables or disables repair.
    pub fn with_repair(mut self, repair: bool) -> Self {
        self.repair = repair;
        self
    }

    /// Sets the per-teacher daily lesson limit used by repair.
    pub fn with_teacher_daily_limit(mut self, limit: usize) -> Self {
        self.teacher_daily_limit = limit;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the number of independent attempts.
    pub fn with_max_attempts(mut self, n: usize) -> Self {
        self.max_attempts = n;
        self
    }

    /// Sets the progress report cadence.
    pub fn with_report_interval(mut self, n: usize) -> Self {
        self.report_interval = n;
        self
    }

    /// Sets the conflict snapshot cadence.
    pub fn with_snapshot_interval(mut self, n: usize) -> Self {
        self.snapshot_interval = n;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// [`TimetableError::InvalidConfig`] naming the first bad parameter.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(TimetableError::InvalidConfig(msg.into()));
        if self.population_size < 2 {
            return invalid("population_size must be at least 2");
        }
        if self.max_generations == 0 {
            return invalid("max_generations must be at least 1");
        }
        if self.tournament_size == 0 {
            return invalid("tournament_size must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return invalid("mutation_rate must be within [0, 1]");
        }
        if self.repair && self.teacher_daily_limit == 0 {
            return invalid("teacher_daily_limit must be at least 1 when repair is enabled");
        }
        if self.max_attempts == 0 {
            return invalid("max_attempts must be at least 1");
        }
        if self.report_interval == 0 || self.snapshot_interval == 0 {
            return invalid("report and snapshot intervals must be at least 1");
        }
        Ok(())
    }
}
