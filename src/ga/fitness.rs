//! Fitness evaluation.
//!
//! Fitness starts at [`BASE_SCORE`] and loses `count × weight` for every
//! registered rule. Higher is better; a timetable scoring at least the base
//! score has no measured violations.

use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::models::Timetable;
use crate::report::ConflictCount;
use crate::rules::{ConflictMarks, ConflictRule, ConflictType};

/// Score of a timetable with zero violations.
pub const BASE_SCORE: f64 = 2000.0;

/// Penalty per violation for each conflict type.
///
/// Types without an explicit entry use [`RuleWeights::default_weight`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RuleWeights(BTreeMap<ConflictType, f64>);

impl RuleWeights {
    /// Built-in weight of a conflict type.
    pub fn default_weight(conflict_type: ConflictType) -> f64 {
        match conflict_type {
            ConflictType::RoomConflicts => 30.0,
            ConflictType::RoomAccommodate => 50.0,
            ConflictType::GroupGaps => 50.0,
            ConflictType::TeacherGaps => 50.0,
            ConflictType::MaxLessonsPerDay => 40.0,
            ConflictType::InvalidAssignments => 100.0,
            ConflictType::GroupCollisions => 50.0,
            ConflictType::TeacherCollisions => 50.0,
            ConflictType::LastLesson => 30.0,
            ConflictType::Adjustment => 100.0,
        }
    }

    /// Effective weight of a conflict type.
    pub fn weight(&self, conflict_type: ConflictType) -> f64 {
        self.0
            .get(&conflict_type)
            .copied()
            .unwrap_or_else(|| Self::default_weight(conflict_type))
    }

    /// Overrides the weight of one conflict type.
    pub fn with(mut self, conflict_type: ConflictType, weight: f64) -> Self {
        self.0.insert(conflict_type, weight);
        self
    }
}

struct WeightedRule {
    rule: Box<dyn ConflictRule>,
    weight: f64,
}

/// Combines weighted conflict rules into a scalar fitness.
///
/// # Usage
///
/// ```
/// use u_timetable::catalog::Catalog;
/// use u_timetable::ga::{FitnessEvaluator, RuleWeights, BASE_SCORE};
/// use u_timetable::models::Timetable;
///
/// let catalog = Catalog::school_default();
/// let evaluator = FitnessEvaluator::standard(&catalog, &RuleWeights::default());
/// // an empty week owes every quota: 56 missing lessons × 100
/// let fitness = evaluator.calculate_fitness(&Timetable::default());
/// assert_eq!(fitness, BASE_SCORE - 5600.0);
/// ```
pub struct FitnessEvaluator<'c> {
    catalog: &'c Catalog,
    rules: Vec<WeightedRule>,
    base_score: f64,
}

impl<'c> FitnessEvaluator<'c> {
    /// An evaluator with no rules: every timetable scores the base score.
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            rules: Vec::new(),
            base_score: BASE_SCORE,
        }
    }

    /// All ten standard rules with the given weights.
    pub fn standard(catalog: &'c Catalog, weights: &RuleWeights) -> Self {
        ConflictType::ALL
            .into_iter()
            .fold(Self::new(catalog), |evaluator, conflict_type| {
                evaluator.with_boxed_rule(conflict_type.rule(), weights.weight(conflict_type))
            })
    }

    /// Registers a rule.
    pub fn with_rule(self, rule: impl ConflictRule + 'static, weight: f64) -> Self {
        self.with_boxed_rule(Box::new(rule), weight)
    }

    /// Registers an already boxed rule.
    pub fn with_boxed_rule(mut self, rule: Box<dyn ConflictRule>, weight: f64) -> Self {
        self.rules.push(WeightedRule { rule, weight });
        self
    }

    /// Sets the base score.
    pub fn with_base_score(mut self, base_score: f64) -> Self {
        self.base_score = base_score;
        self
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Registered `(conflict type, weight)` pairs in evaluation order.
    pub fn weights(&self) -> impl Iterator<Item = (ConflictType, f64)> + '_ {
        self.rules
            .iter()
            .map(|w| (w.rule.conflict_type(), w.weight))
    }

    /// Base score minus the weighted violations of every rule.
    pub fn calculate_fitness(&self, timetable: &Timetable) -> f64 {
        self.rules.iter().fold(self.base_score, |fitness, w| {
            fitness - w.rule.calculate_conflicts(self.catalog, timetable) as f64 * w.weight
        })
    }

    /// Writes fitness onto every timetable.
    ///
    /// With `parallel` and the `parallel` feature, individuals are evaluated
    /// on the rayon pool; the call returns once all are done.
    pub fn evaluate_population(&self, population: &mut [Timetable], parallel: bool) {
        #[cfg(feature = "parallel")]
        {
            if parallel {
                population.par_iter_mut().for_each(|timetable| {
                    timetable.fitness = self.calculate_fitness(timetable);
                });
                return;
            }
        }
        #[cfg(not(feature = "parallel"))]
        let _ = parallel;

        for timetable in population.iter_mut() {
            timetable.fitness = self.calculate_fitness(timetable);
        }
    }

    /// Whether `timetable`'s stored fitness marks it as conflict-free.
    pub fn is_solution(&self, timetable: &Timetable) -> bool {
        timetable.fitness >= self.base_score
    }

    /// Runs every rule with marking enabled.
    pub fn diagnose(&self, timetable: &Timetable) -> Diagnosis {
        let mut marks = ConflictMarks::for_timetable(timetable);
        let mut fitness = self.base_score;
        let mut conflicts = Vec::with_capacity(self.rules.len());
        for w in &self.rules {
            let count = w.rule.evaluate(self.catalog, timetable, &mut marks);
            fitness -= count as f64 * w.weight;
            conflicts.push(ConflictCount {
                conflict_type: w.rule.conflict_type(),
                count,
            });
        }
        Diagnosis {
            fitness,
            conflicts,
            conflicted: marks.into_flags(),
        }
    }
}

/// Per-rule breakdown of one timetable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Diagnosis {
    pub fitness: f64,
    /// One entry per registered rule, in evaluation order.
    pub conflicts: Vec<ConflictCount>,
    /// `conflicted[i]` is set when some rule flagged lesson `i`.
    pub conflicted: Vec<bool>,
}

impl Diagnosis {
    /// Violation count of one conflict type (summed if registered twice).
    pub fn count(&self, conflict_type: ConflictType) -> u32 {
        self.conflicts
            .iter()
            .filter(|c| c.conflict_type == conflict_type)
            .map(|c| c.count)
            .sum()
    }

    /// Violations across all rules, unweighted.
    pub fn total_violations(&self) -> u32 {
        self.conflicts.iter().map(|c| c.count).sum()
    }

    /// Positions of flagged lessons.
    pub fn conflicted_lessons(&self) -> impl Iterator<Item = usize> + '_ {
        self.conflicted
            .iter()
            .enumerate()
            .filter_map(|(i, &flag)| flag.then_some(i))
    }
}
