//! Genetic algorithm over weekly timetables.
//!
//! Each individual is a [`Timetable`](crate::models::Timetable); genes are
//! lessons. The loop is the classic generational GA with single-elite
//! preservation, maximizing fitness toward [`BASE_SCORE`].
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population size, rates, cadences)
//! - [`PopulationGenerator`]: Random, structurally complete timetables
//! - [`FitnessEvaluator`]: Weighted conflict rules → scalar fitness
//! - [`Tournament`]: Parent selection
//! - [`GeneticOperators`]: Group-block crossover, mutation, repair
//! - [`TimetableRunner`]: Executes the evolutionary loop
//! - [`RunResult`]: Final timetable with history and snapshots
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Colorni, Dorigo & Maniezzo (1992), "A Genetic Algorithm to Solve the Timetable Problem"

mod config;
mod fitness;
mod operators;
mod population;
mod runner;
mod selection;

pub use config::GaConfig;
pub use fitness::{Diagnosis, FitnessEvaluator, RuleWeights, BASE_SCORE};
pub use operators::GeneticOperators;
pub use population::PopulationGenerator;
pub use runner::{find_best, RunResult, Termination, TimetableRunner};
pub use selection::Tournament;
