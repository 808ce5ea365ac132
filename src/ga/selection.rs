//! Tournament selection.
//!
//! Fitness is maximized: the highest fitness in the sample wins.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use rand::Rng;

use crate::error::{Result, TimetableError};
use crate::models::Timetable;

/// Tournament selection over a population.
///
/// Draws `size` individuals uniformly with replacement and returns the
/// fittest; ties go to the first drawn.
///
/// - size 1: uniform random choice
/// - size 2–5: moderate pressure
/// - larger: strong pressure, risk of premature convergence
///
/// # Complexity
/// O(size) per selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tournament {
    size: usize,
}

impl Default for Tournament {
    fn default() -> Self {
        Self::new(5)
    }
}

impl Tournament {
    /// A tournament of `size` draws (at least 1).
    pub fn new(size: usize) -> Self {
        Self { size: size.max(1) }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Index of the tournament winner.
    ///
    /// # Errors
    /// [`TimetableError::EmptyPopulation`] if `population` is empty.
    pub fn select<R: Rng>(&self, population: &[Timetable], rng: &mut R) -> Result<usize> {
        if population.is_empty() {
            return Err(TimetableError::EmptyPopulation);
        }
        let n = population.len();

        let mut best = rng.random_range(0..n);
        for _ in 1..self.size {
            let idx = rng.random_range(0..n);
            if population[idx].fitness > population[best].fitness {
                best = idx;
            }
        }
        Ok(best)
    }

    /// The tournament winner itself.
    pub fn select_parent<'p, R: Rng>(
        &self,
        population: &'p [Timetable],
        rng: &mut R,
    ) -> Result<&'p Timetable> {
        self.select(population, rng).map(|i| &population[i])
    }

    /// Two parent indices, distinct whenever the population has more than
    /// one member. The second draw is repeated until it differs.
    pub fn select_parents<R: Rng>(
        &self,
        population: &[Timetable],
        rng: &mut R,
    ) -> Result<(usize, usize)> {
        let first = self.select(population, rng)?;
        let mut second = self.select(population, rng)?;
        while second == first && population.len() > 1 {
            second = self.select(population, rng)?;
        }
        Ok((first, second))
    }

    /// `n` independent draws, for higher-arity recombination.
    pub fn select_many<R: Rng>(
        &self,
        population: &[Timetable],
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>> {
        (0..n).map(|_| self.select(population, rng)).collect()
    }
}
