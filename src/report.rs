//! Observation and persistence boundaries of a run.
//!
//! - [`ProgressReporter`]: receives `(generation, best_fitness)` at the
//!   configured cadence, conflict snapshots, and the final timetable.
//!   Purely observational; nothing flows back into the GA.
//! - [`TimetableSink`]: where the caller persists the result. The kernel
//!   never calls a sink itself, so sink errors stay out of GA control flow.
//! - [`TimetableSummary`]: per-group weekly grid for console output.

use std::convert::Infallible;
use std::fmt;

use log::info;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::ga::Diagnosis;
use crate::models::Timetable;
use crate::rules::ConflictType;

/// Violations of one conflict type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConflictCount {
    pub conflict_type: ConflictType,
    pub count: u32,
}

/// Conflict breakdown of the best timetable at some generation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConflictSnapshot {
    pub generation: usize,
    pub fitness: f64,
    pub conflicts: Vec<ConflictCount>,
    /// Positions of the lessons some rule flagged.
    #[cfg_attr(feature = "serde", serde(default))]
    pub conflicted_lessons: Vec<usize>,
}

impl ConflictSnapshot {
    pub fn from_diagnosis(generation: usize, diagnosis: Diagnosis) -> Self {
        let conflicted_lessons = diagnosis.conflicted_lessons().collect();
        Self {
            generation,
            fitness: diagnosis.fitness,
            conflicts: diagnosis.conflicts,
            conflicted_lessons,
        }
    }

    /// Violations of `conflict_type` at this snapshot.
    pub fn count(&self, conflict_type: ConflictType) -> u32 {
        self.conflicts
            .iter()
            .filter(|c| c.conflict_type == conflict_type)
            .map(|c| c.count)
            .sum()
    }
}

/// Receives progress from [`TimetableRunner`](crate::ga::TimetableRunner).
///
/// Every method defaults to a no-op.
pub trait ProgressReporter {
    /// Best fitness after `generation` (0 is the initial population).
    fn on_generation(&mut self, generation: usize, best_fitness: f64) {
        let _ = (generation, best_fitness);
    }

    /// A conflict snapshot was taken.
    fn on_snapshot(&mut self, snapshot: &ConflictSnapshot) {
        let _ = snapshot;
    }

    /// The run ended with `best`.
    fn on_finish(&mut self, best: &Timetable) {
        let _ = best;
    }
}

/// Discards all progress.
impl ProgressReporter for () {}

impl<P: ProgressReporter + ?Sized> ProgressReporter for &mut P {
    fn on_generation(&mut self, generation: usize, best_fitness: f64) {
        (**self).on_generation(generation, best_fitness);
    }

    fn on_snapshot(&mut self, snapshot: &ConflictSnapshot) {
        (**self).on_snapshot(snapshot);
    }

    fn on_finish(&mut self, best: &Timetable) {
        (**self).on_finish(best);
    }
}

/// Writes progress through the `log` facade at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn on_generation(&mut self, generation: usize, best_fitness: f64) {
        info!("generation {generation}: best fitness {best_fitness:.1}");
    }

    fn on_finish(&mut self, best: &Timetable) {
        info!(
            "final timetable: {} lessons, fitness {:.1}, reached at generation {}",
            best.len(),
            best.fitness,
            best.generation
        );
    }
}

/// Persistence boundary for finished runs.
pub trait TimetableSink {
    type Error;

    /// Stores the chosen timetable.
    fn store_timetable(&mut self, timetable: &Timetable) -> Result<(), Self::Error>;

    /// Stores the conflict history of a run.
    fn store_snapshots(&mut self, snapshots: &[ConflictSnapshot]) -> Result<(), Self::Error>;
}

/// Keeps everything in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub timetables: Vec<Timetable>,
    pub snapshots: Vec<ConflictSnapshot>,
}

impl TimetableSink for MemorySink {
    type Error = Infallible;

    fn store_timetable(&mut self, timetable: &Timetable) -> Result<(), Infallible> {
        self.timetables.push(timetable.clone());
        Ok(())
    }

    fn store_snapshots(&mut self, snapshots: &[ConflictSnapshot]) -> Result<(), Infallible> {
        self.snapshots.extend_from_slice(snapshots);
        Ok(())
    }
}

/// Per-group weekly listing of a timetable.
///
/// ```
/// use u_timetable::catalog::Catalog;
/// use u_timetable::models::Timetable;
/// use u_timetable::report::TimetableSummary;
///
/// let catalog = Catalog::school_default();
/// let text = TimetableSummary::new(&catalog, &Timetable::default()).to_string();
/// assert!(text.contains("Group 1"));
/// ```
pub struct TimetableSummary<'a> {
    catalog: &'a Catalog,
    timetable: &'a Timetable,
}

impl<'a> TimetableSummary<'a> {
    pub fn new(catalog: &'a Catalog, timetable: &'a Timetable) -> Self {
        Self { catalog, timetable }
    }
}

impl fmt::Display for TimetableSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "fitness {:.1} at generation {}",
            self.timetable.fitness, self.timetable.generation
        )?;
        for group in self.catalog.groups() {
            writeln!(f, "== {group} ==")?;
            for day in self.catalog.calendar().days() {
                let lessons = self.timetable.lessons_on_day_for_group(group, day);
                if lessons.is_empty() {
                    continue;
                }
                writeln!(f, "  Day {}", day + 1)?;
                for (_, lesson) in lessons {
                    writeln!(f, "    {}. {lesson}", lesson.period() + 1)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{FitnessEvaluator, RuleWeights};
    use crate::models::Subject;
    use crate::test_support::{feasible_timetable, lesson, small_catalog};

    #[derive(Default)]
    struct Recorder {
        generations: Vec<(usize, f64)>,
        finished: usize,
    }

    impl ProgressReporter for Recorder {
        fn on_generation(&mut self, generation: usize, best_fitness: f64) {
            self.generations.push((generation, best_fitness));
        }

        fn on_finish(&mut self, _: &Timetable) {
            self.finished += 1;
        }
    }

    fn drive(mut reporter: impl ProgressReporter) {
        reporter.on_generation(0, 10.0);
        reporter.on_generation(1, 20.0);
        reporter.on_snapshot(&ConflictSnapshot {
            generation: 1,
            fitness: 20.0,
            conflicts: Vec::new(),
            conflicted_lessons: Vec::new(),
        });
        reporter.on_finish(&Timetable::default());
    }

    #[test]
    fn test_reporter_through_mut_ref() {
        let mut recorder = Recorder::default();
        drive(&mut recorder);
        assert_eq!(recorder.generations, vec![(0, 10.0), (1, 20.0)]);
        assert_eq!(recorder.finished, 1);

        drive(());
        drive(LogReporter);
    }

    #[test]
    fn test_snapshot_from_diagnosis() {
        let catalog = small_catalog();
        let evaluator = FitnessEvaluator::standard(&catalog, &RuleWeights::default());
        let snapshot = ConflictSnapshot::from_diagnosis(20, evaluator.diagnose(&Timetable::default()));
        assert_eq!(snapshot.generation, 20);
        assert_eq!(snapshot.count(ConflictType::Adjustment), 4);
        assert_eq!(snapshot.count(ConflictType::RoomConflicts), 0);
        assert_eq!(snapshot.conflicts.len(), 10);
        assert!(snapshot.conflicted_lessons.is_empty());
    }

    #[test]
    fn test_snapshot_keeps_flagged_lessons() {
        let catalog = small_catalog();
        let evaluator = FitnessEvaluator::standard(&catalog, &RuleWeights::default());
        // Math and Physics share room 1 in the same slot
        let timetable = Timetable::new(vec![
            lesson(&catalog, Subject::Informatics, 1, 5, 0, 0),
            lesson(&catalog, Subject::Math, 1, 1, 0, 1),
            lesson(&catalog, Subject::Physics, 1, 1, 0, 1),
        ]);
        let diagnosis = evaluator.diagnose(&timetable);
        let expected: Vec<usize> = diagnosis.conflicted_lessons().collect();
        let snapshot = ConflictSnapshot::from_diagnosis(3, diagnosis);
        assert_eq!(snapshot.conflicted_lessons, expected);
        assert!(snapshot.conflicted_lessons.contains(&1));
        assert!(snapshot.conflicted_lessons.contains(&2));
    }

    #[test]
    fn test_memory_sink() {
        let catalog = small_catalog();
        let mut sink = MemorySink::default();
        sink.store_timetable(&feasible_timetable(&catalog)).unwrap();
        sink.store_snapshots(&[ConflictSnapshot {
            generation: 0,
            fitness: 1.0,
            conflicts: Vec::new(),
            conflicted_lessons: Vec::new(),
        }])
        .unwrap();
        assert_eq!(sink.timetables.len(), 1);
        assert_eq!(sink.snapshots.len(), 1);
    }

    #[test]
    fn test_summary_lists_lessons_by_period() {
        let catalog = small_catalog();
        let text = TimetableSummary::new(&catalog, &feasible_timetable(&catalog)).to_string();
        assert!(text.contains("== Group 1 =="));
        assert!(text.contains("Day 1"));
        assert!(!text.contains("Day 2"));
        let math = text.find("1. Mathematics").unwrap();
        let pe = text.find("4. Physical Culture").unwrap();
        assert!(math < pe);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_snapshot_json() {
        let snapshot = ConflictSnapshot {
            generation: 40,
            fitness: 1850.0,
            conflicts: vec![ConflictCount {
                conflict_type: ConflictType::RoomConflicts,
                count: 5,
            }],
            conflicted_lessons: vec![2, 7],
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("RoomConflicts"));
        let back: ConflictSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
