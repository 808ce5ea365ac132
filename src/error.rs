//! Error types for the timetable engine.
//!
//! Only configuration-integrity failures are errors. Rule violations are
//! the quantity the GA minimizes and never surface here.

use thiserror::Error;

use crate::models::Subject;

/// Fatal, non-recoverable failures of a timetable run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimetableError {
    /// The catalog has no teacher for a subject that must be scheduled.
    #[error("no teacher found for subject: {0}")]
    NoTeacher(Subject),

    /// No classroom in the catalog can accommodate the subject.
    #[error("no classroom available for subject: {0}")]
    NoClassroom(Subject),

    /// A best individual was requested from an empty population.
    #[error("population is empty")]
    EmptyPopulation,

    /// A GA parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The reference data catalog is structurally broken.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TimetableError>;
