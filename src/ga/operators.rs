//! Timetable recombination, perturbation and repair.
//!
//! # Operators
//!
//! - [`GeneticOperators::crossover`]: group-level block crossover. Each
//!   group's whole lesson set comes from one parent, so per-group gap and
//!   collision structure survives recombination.
//! - [`GeneticOperators::mutate`]: per-lesson perturbation of the time
//!   slot, the classroom, or both.
//! - [`GeneticOperators::repair`]: optional trim of a teacher's lessons
//!   beyond a daily limit.
//! - [`GeneticOperators::create_new_generation`]: elitism followed by
//!   select → crossover → mutate → repair until the population is full.
//!
//! Mutation and repair return [`Cow::Borrowed`] when they change nothing,
//! so callers can detect a no-op without comparing lessons.

use std::borrow::Cow;
use std::collections::HashMap;

use rand::Rng;

use super::config::GaConfig;
use super::population::PopulationGenerator;
use super::runner::find_best;
use super::selection::Tournament;
use crate::catalog::Catalog;
use crate::error::Result;
use crate::models::{Lesson, Timetable};

/// Crossover, mutation and repair bound to one catalog.
///
/// # Usage
///
/// ```
/// use std::borrow::Cow;
/// use u_timetable::catalog::Catalog;
/// use u_timetable::ga::{GeneticOperators, PopulationGenerator};
/// use u_timetable::random::create_rng;
///
/// let catalog = Catalog::school_default();
/// let mut rng = create_rng(42);
/// let timetable = PopulationGenerator::new(&catalog).random_timetable(&mut rng).unwrap();
///
/// let frozen = GeneticOperators::new(&catalog, 0.0);
/// assert!(matches!(frozen.mutate(&timetable, &mut rng).unwrap(), Cow::Borrowed(_)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GeneticOperators<'c> {
    catalog: &'c Catalog,
    generator: PopulationGenerator<'c>,
    mutation_rate: f64,
    teacher_daily_limit: Option<usize>,
}

impl<'c> GeneticOperators<'c> {
    /// Operators with the given per-lesson mutation rate and repair off.
    ///
    /// The rate is clamped to `[0, 1]`; a non-finite rate disables mutation.
    pub fn new(catalog: &'c Catalog, mutation_rate: f64) -> Self {
        let mutation_rate = if mutation_rate.is_finite() {
            mutation_rate.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            catalog,
            generator: PopulationGenerator::new(catalog),
            mutation_rate,
            teacher_daily_limit: None,
        }
    }

    /// Operators configured from `config`.
    pub fn from_config(catalog: &'c Catalog, config: &GaConfig) -> Self {
        let operators = Self::new(catalog, config.mutation_rate);
        if config.repair {
            operators.with_repair(config.teacher_daily_limit)
        } else {
            operators
        }
    }

    /// Enables repair: a teacher keeps at most `limit` lessons per day.
    pub fn with_repair(mut self, limit: usize) -> Self {
        self.teacher_daily_limit = Some(limit);
        self
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Daily lesson limit per teacher, if repair is enabled.
    pub fn repair_limit(&self) -> Option<usize> {
        self.teacher_daily_limit
    }

    // ========================================================================
    // Crossover
    // ========================================================================

    /// For every catalog group, takes all of that group's lessons from
    /// `parent1` or from `parent2` with equal probability.
    ///
    /// Lessons of groups outside the catalog are not inherited.
    ///
    /// # Complexity
    /// O(groups × lessons)
    pub fn crossover<R: Rng>(&self, parent1: &Timetable, parent2: &Timetable, rng: &mut R) -> Timetable {
        let mut lessons = Vec::with_capacity(parent1.len().max(parent2.len()));
        for group in self.catalog.groups() {
            let donor = if rng.random_bool(0.5) { parent1 } else { parent2 };
            lessons.extend(donor.lessons_for_group(group).map(|(_, l)| l.clone()));
        }
        Timetable::new(lessons)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Replaces each lesson, with probability `mutation_rate`, by a
    /// perturbed copy.
    ///
    /// The perturbation resamples the time slot, the classroom (among
    /// rooms that can host the subject), or both, with equal probability.
    ///
    /// Returns `Cow::Borrowed(timetable)` when no lesson was touched.
    ///
    /// # Errors
    /// [`TimetableError::NoClassroom`](crate::error::TimetableError::NoClassroom)
    /// if a lesson's subject has no capable classroom.
    pub fn mutate<'a, R: Rng>(&self, timetable: &'a Timetable, rng: &mut R) -> Result<Cow<'a, Timetable>> {
        let mut mutated: Option<Vec<Lesson>> = None;
        for (i, lesson) in timetable.lessons().iter().enumerate() {
            if !rng.random_bool(self.mutation_rate) {
                continue;
            }
            let replacement = self.perturb(lesson, rng)?;
            mutated.get_or_insert_with(|| timetable.lessons().to_vec())[i] = replacement;
        }
        Ok(match mutated {
            Some(lessons) => Cow::Owned(Timetable::new(lessons)),
            None => Cow::Borrowed(timetable),
        })
    }

    fn perturb<R: Rng>(&self, lesson: &Lesson, rng: &mut R) -> Result<Lesson> {
        let perturbed = match rng.random_range(0..3) {
            0 => lesson.with_time_slot(self.generator.random_time_slot(rng)),
            1 => lesson.with_classroom(self.generator.random_classroom(lesson.subject(), rng)?),
            _ => lesson
                .with_time_slot(self.generator.random_time_slot(rng))
                .with_classroom(self.generator.random_classroom(lesson.subject(), rng)?),
        };
        Ok(perturbed)
    }

    // ========================================================================
    // Repair
    // ========================================================================

    /// Drops every lesson beyond the daily limit of its teacher, keeping the
    /// earliest in lesson order.
    ///
    /// Best effort only: room conflicts, gaps and the quota shortfall this
    /// creates are left to selection. Returns `Cow::Borrowed` when repair is
    /// off or nothing exceeds the limit.
    pub fn repair<'a>(&self, timetable: &'a Timetable) -> Cow<'a, Timetable> {
        let Some(limit) = self.teacher_daily_limit else {
            return Cow::Borrowed(timetable);
        };

        let mut per_day: HashMap<(u32, u8), usize> = HashMap::new();
        let keep: Vec<bool> = timetable
            .lessons()
            .iter()
            .map(|lesson| {
                let seen = per_day.entry((lesson.teacher().id, lesson.day())).or_insert(0);
                *seen += 1;
                *seen <= limit
            })
            .collect();

        if keep.iter().all(|&k| k) {
            return Cow::Borrowed(timetable);
        }
        let lessons = timetable
            .lessons()
            .iter()
            .zip(keep)
            .filter_map(|(lesson, k)| k.then(|| lesson.clone()))
            .collect();
        Cow::Owned(Timetable::new(lessons))
    }

    // ========================================================================
    // Generation
    // ========================================================================

    /// The next population, the same size as `population`.
    ///
    /// Index 0 is an unchanged copy of the current fittest timetable
    /// (fitness included). Every other member is an offspring of two
    /// tournament-selected parents.
    ///
    /// # Errors
    /// [`TimetableError::EmptyPopulation`](crate::error::TimetableError::EmptyPopulation)
    /// for an empty `population`; classroom lookup failures from mutation.
    pub fn create_new_generation<R: Rng>(
        &self,
        population: &[Timetable],
        selection: &Tournament,
        rng: &mut R,
    ) -> Result<Vec<Timetable>> {
        let mut next = Vec::with_capacity(population.len());
        next.push(find_best(population)?.clone());

        while next.len() < population.len() {
            let (a, b) = selection.select_parents(population, rng)?;
            let child = self.crossover(&population[a], &population[b], rng);
            let child = changed(self.mutate(&child, rng)?).unwrap_or(child);
            let child = changed(self.repair(&child)).unwrap_or(child);
            next.push(child);
        }
        Ok(next)
    }
}

/// The new timetable, if the operator produced one.
fn changed(result: Cow<'_, Timetable>) -> Option<Timetable> {
    match result {
        Cow::Owned(timetable) => Some(timetable),
        Cow::Borrowed(_) => None,
    }
}
