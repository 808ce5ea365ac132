//! Weekly school timetable optimization with a genetic algorithm.
//!
//! Searches for a timetable that satisfies every group's weekly subject
//! quotas without double-booking rooms, groups or teachers, without gaps,
//! and with Physical Culture closing the day.
//!
//! - **Models** ([`models`]): subjects, teachers, classrooms, groups, lessons
//!   and timetables.
//! - **Catalog** ([`catalog`]): validated, read-only reference data passed
//!   explicitly to every component.
//! - **Rules** ([`rules`]): pluggable conflict rules, each counting one kind
//!   of violation.
//! - **GA** ([`ga`]): fitness evaluation, tournament selection, group-block
//!   crossover, mutation, repair and the generational loop.
//! - **Report** ([`report`]): progress reporting, conflict snapshots and the
//!   persistence boundary.
//!
//! # Example
//!
//! ```
//! use u_timetable::catalog::Catalog;
//! use u_timetable::ga::{GaConfig, RuleWeights, TimetableRunner};
//! use u_timetable::report::LogReporter;
//!
//! let catalog = Catalog::school_default();
//! let config = GaConfig::default().with_max_generations(20).with_seed(42);
//! let result = TimetableRunner::find_solution(&catalog, &config, &RuleWeights::default(), LogReporter)
//!     .unwrap();
//! println!("best fitness {} after {} generations", result.best_fitness(), result.generations);
//! ```
//!
//! # Features
//!
//! - `parallel` (default): rayon-based fitness evaluation.
//! - `serde` (default): (de)serialization of configuration and results.
//! - `cli`: the `u-timetable` binary.

pub mod catalog;
pub mod error;
pub mod ga;
pub mod models;
pub mod random;
pub mod report;
pub mod rules;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{Result, TimetableError};
