//! GA evolutionary loop execution.
//!
//! [`TimetableRunner`] orchestrates the complete evolutionary process:
//! initialization → evaluation → (elitism + selection + crossover +
//! mutation + repair) → evaluation → repeat, until the best timetable
//! reaches the base score or the generation ceiling is hit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::config::GaConfig;
use super::fitness::{FitnessEvaluator, RuleWeights};
use super::operators::GeneticOperators;
use super::population::PopulationGenerator;
use super::selection::Tournament;
use crate::catalog::Catalog;
use crate::error::{Result, TimetableError};
use crate::models::Timetable;
use crate::random::rng_from;
use crate::report::{ConflictSnapshot, ProgressReporter};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Termination {
    /// The best timetable reached the base score.
    Converged,
    /// The generation ceiling was hit first. `best` is best effort only.
    MaxGenerationsReached,
    /// The cancellation flag was raised.
    Cancelled,
}

/// Result of a timetable GA run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// The best timetable found. `best.generation` is the generation in
    /// which its fitness was first reached.
    pub best: Timetable,

    /// Generations executed after the initial population.
    pub generations: usize,

    pub termination: Termination,

    /// Best fitness after the initial population and after each generation.
    pub fitness_history: Vec<f64>,

    /// Fittest member of the initial population and of each generation.
    /// Elitism keeps it non-decreasing.
    pub population_best_history: Vec<f64>,

    /// Conflict breakdowns of the best timetable at the snapshot cadence,
    /// plus one for the final state.
    pub snapshots: Vec<ConflictSnapshot>,

    /// Fresh runs made to produce this result.
    pub attempts: usize,
}

impl RunResult {
    pub fn best_fitness(&self) -> f64 {
        self.best.fitness
    }

    /// Whether the best timetable is free of measured violations.
    pub fn is_solution(&self) -> bool {
        self.termination == Termination::Converged
    }
}

/// Executes the timetable GA.
///
/// # Usage
///
/// ```
/// use u_timetable::catalog::Catalog;
/// use u_timetable::ga::{GaConfig, RuleWeights, TimetableRunner};
///
/// let catalog = Catalog::school_default();
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_max_generations(10)
///     .with_seed(42);
/// let result = TimetableRunner::run(&catalog, &config, &RuleWeights::default(), ()).unwrap();
/// assert_eq!(result.fitness_history.len(), result.generations + 1);
/// ```
pub struct TimetableRunner;

impl TimetableRunner {
    /// Runs the GA once.
    ///
    /// # Errors
    /// [`TimetableError::InvalidConfig`] for a configuration that fails
    /// [`GaConfig::validate`]; catalog lookup failures from population
    /// generation or mutation.
    pub fn run<P: ProgressReporter>(
        catalog: &Catalog,
        config: &GaConfig,
        weights: &RuleWeights,
        reporter: P,
    ) -> Result<RunResult> {
        Self::run_with_cancel(catalog, config, weights, reporter, None)
    }

    /// Runs the GA once with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the GA stops
    /// before the next generation and returns the best timetable so far.
    pub fn run_with_cancel<P: ProgressReporter>(
        catalog: &Catalog,
        config: &GaConfig,
        weights: &RuleWeights,
        mut reporter: P,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<RunResult> {
        config.validate()?;

        let mut rng = rng_from(config.seed);
        let evaluator = FitnessEvaluator::standard(catalog, weights);
        let operators = GeneticOperators::from_config(catalog, config);
        let tournament = Tournament::new(config.tournament_size);

        // 1. Initialize and evaluate
        let mut population = PopulationGenerator::new(catalog)
            .initialize_population(config.population_size, &mut rng)?;
        evaluator.evaluate_population(&mut population, config.parallel);

        // 2. Track best
        let mut best = find_best(&population)?.clone();
        best.generation = 0;
        let mut fitness_history = Vec::with_capacity(config.max_generations + 1);
        fitness_history.push(best.fitness);
        let mut population_best_history = fitness_history.clone();
        let mut snapshots = Vec::new();
        reporter.on_generation(0, best.fitness);

        let mut generations = 0;
        let mut termination = if evaluator.is_solution(&best) {
            Termination::Converged
        } else {
            Termination::MaxGenerationsReached
        };

        // 3. Evolutionary loop
        while termination == Termination::MaxGenerationsReached
            && generations < config.max_generations
        {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    termination = Termination::Cancelled;
                    break;
                }
            }
            let generation = generations + 1;

            population = operators.create_new_generation(&population, &tournament, &mut rng)?;
            // index 0 is the elite, already evaluated
            evaluator.evaluate_population(&mut population[1..], config.parallel);
            generations = generation;

            let gen_best = find_best(&population)?;
            population_best_history.push(gen_best.fitness);
            if gen_best.fitness > best.fitness {
                best = gen_best.clone();
                best.generation = generation;
            }
            fitness_history.push(best.fitness);
            debug!("generation {generation}: best fitness {:.1}", best.fitness);

            if generation % config.report_interval == 0 {
                reporter.on_generation(generation, best.fitness);
            }
            if generation % config.snapshot_interval == 0 {
                let snapshot = ConflictSnapshot::from_diagnosis(generation, evaluator.diagnose(&best));
                reporter.on_snapshot(&snapshot);
                snapshots.push(snapshot);
            }
            if evaluator.is_solution(&best) {
                termination = Termination::Converged;
            }
        }

        if snapshots.last().map(|s| s.generation) != Some(generations) {
            let snapshot = ConflictSnapshot::from_diagnosis(generations, evaluator.diagnose(&best));
            reporter.on_snapshot(&snapshot);
            snapshots.push(snapshot);
        }

        match termination {
            Termination::Converged => info!(
                "converged at generation {} with fitness {:.1}",
                best.generation, best.fitness
            ),
            Termination::MaxGenerationsReached => warn!(
                "no solution after {generations} generations; best fitness {:.1}",
                best.fitness
            ),
            Termination::Cancelled => info!(
                "cancelled after {generations} generations; best fitness {:.1}",
                best.fitness
            ),
        }
        reporter.on_finish(&best);

        Ok(RunResult {
            best,
            generations,
            termination,
            fitness_history,
            population_best_history,
            snapshots,
            attempts: 1,
        })
    }

    /// Runs up to `config.max_attempts` fresh GAs.
    ///
    /// Returns the first converged run, or the best-effort run with the
    /// highest fitness if none converges. With a seed, attempt `k` (from 0)
    /// uses `seed + k`.
    pub fn find_solution<P: ProgressReporter>(
        catalog: &Catalog,
        config: &GaConfig,
        weights: &RuleWeights,
        mut reporter: P,
    ) -> Result<RunResult> {
        config.validate()?;

        let mut best_effort: Option<RunResult> = None;
        for attempt in 1..=config.max_attempts {
            info!("attempt {attempt}/{}", config.max_attempts);
            let mut attempt_config = config.clone();
            if let Some(seed) = config.seed {
                attempt_config.seed = Some(seed.wrapping_add(attempt as u64 - 1));
            }

            let mut result = Self::run(catalog, &attempt_config, weights, &mut reporter)?;
            result.attempts = attempt;
            if result.termination == Termination::Converged {
                return Ok(result);
            }
            if best_effort
                .as_ref()
                .map_or(true, |b| result.best.fitness > b.best.fitness)
            {
                best_effort = Some(result);
            }
        }

        let mut result = best_effort.ok_or_else(|| {
            TimetableError::InvalidConfig("max_attempts must be at least 1".into())
        })?;
        result.attempts = config.max_attempts;
        Ok(result)
    }
}

/// The fittest member of `population` (highest fitness).
///
/// # Errors
/// [`TimetableError::EmptyPopulation`] if `population` is empty.
pub fn find_best(population: &[Timetable]) -> Result<&Timetable> {
    population
        .iter()
        .max_by(|a, b| {
            a.fitness
                .partial_cmp(&b.fitness)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .ok_or(TimetableError::EmptyPopulation)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::BASE_SCORE;
    use crate::test_support::small_catalog;

    #[derive(Default)]
    struct Recorder {
        generations: Vec<usize>,
        snapshots: Vec<usize>,
        finished: Option<f64>,
    }

    impl ProgressReporter for Recorder {
        fn on_generation(&mut self, generation: usize, _: f64) {
            self.generations.push(generation);
        }

        fn on_snapshot(&mut self, snapshot: &ConflictSnapshot) {
            self.snapshots.push(snapshot.generation);
        }

        fn on_finish(&mut self, best: &Timetable) {
            self.finished = Some(best.fitness);
        }
    }

    fn assert_non_decreasing(history: &[f64]) {
        for window in history.windows(2) {
            assert!(
                window[1] >= window[0],
                "fitness should be monotonically non-decreasing with elitism: {} < {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_small_catalog_converges() {
        let catalog = small_catalog();
        let config = GaConfig::default()
            .with_population_size(50)
            .with_max_generations(500)
            .with_seed(42)
            .with_parallel(false);

        let result = TimetableRunner::run(&catalog, &config, &RuleWeights::default(), ()).unwrap();

        assert_eq!(result.termination, Termination::Converged);
        assert!(result.is_solution());
        assert!(result.best_fitness() >= BASE_SCORE);
        assert!(result.best.generation <= result.generations);
        assert_eq!(result.fitness_history.len(), result.generations + 1);
        assert_eq!(result.population_best_history.len(), result.generations + 1);
        assert_non_decreasing(&result.population_best_history);
    }

    #[test]
    fn test_default_school_end_to_end() {
        let catalog = Catalog::school_default();
        let config = GaConfig::default()
            .with_population_size(50)
            .with_max_generations(500)
            .with_seed(42);

        let result = TimetableRunner::run(&catalog, &config, &RuleWeights::default(), ()).unwrap();

        assert!(result.generations <= 500);
        assert_eq!(result.fitness_history.len(), result.generations + 1);
        assert_eq!(result.population_best_history.len(), result.generations + 1);
        assert_non_decreasing(&result.population_best_history);
        assert_eq!(result.fitness_history.last().copied(), Some(result.best_fitness()));
        assert_eq!(result.population_best_history, result.fitness_history);
        assert!(result.best.generation <= result.generations);
        assert!(result.best_fitness() > result.fitness_history[0] || result.is_solution());
        assert_eq!(result.best.len(), catalog.lessons_per_timetable());
    }

    #[test]
    fn test_best_generation_marks_first_reach() {
        let catalog = Catalog::school_default();
        let config = GaConfig::default()
            .with_population_size(30)
            .with_max_generations(60)
            .with_seed(7)
            .with_parallel(false);

        let result = TimetableRunner::run(&catalog, &config, &RuleWeights::default(), ()).unwrap();
        let reached = result.best.generation;
        assert_eq!(result.fitness_history[reached], result.best_fitness());
        if reached > 0 {
            assert!(result.fitness_history[reached - 1] < result.best_fitness());
        }
    }

    #[test]
    fn test_reporter_cadence_and_snapshots() {
        let catalog = Catalog::school_default();
        let config = GaConfig::default()
            .with_population_size(20)
            .with_max_generations(20)
            .with_report_interval(10)
            .with_snapshot_interval(5)
            .with_seed(42)
            .with_parallel(false);

        let mut recorder = Recorder::default();
        let result =
            TimetableRunner::run(&catalog, &config, &RuleWeights::default(), &mut recorder).unwrap();

        assert_eq!(result.termination, Termination::MaxGenerationsReached);
        assert_eq!(recorder.generations, vec![0, 10, 20]);
        assert_eq!(recorder.snapshots, vec![5, 10, 15, 20]);
        assert_eq!(
            result.snapshots.iter().map(|s| s.generation).collect::<Vec<_>>(),
            vec![5, 10, 15, 20]
        );
        assert_eq!(recorder.finished, Some(result.best_fitness()));
        let last = result.snapshots.last().unwrap();
        assert_eq!(last.fitness, result.best_fitness());
    }

    #[test]
    fn test_final_snapshot_off_cadence() {
        let catalog = Catalog::school_default();
        let config = GaConfig::default()
            .with_population_size(10)
            .with_max_generations(7)
            .with_snapshot_interval(5)
            .with_seed(1)
            .with_parallel(false);

        let result = TimetableRunner::run(&catalog, &config, &RuleWeights::default(), ()).unwrap();
        assert_eq!(
            result.snapshots.iter().map(|s| s.generation).collect::<Vec<_>>(),
            vec![5, 7]
        );
    }

    #[test]
    fn test_same_seed_same_result() {
        let catalog = Catalog::school_default();
        let config = GaConfig::default()
            .with_population_size(20)
            .with_max_generations(15)
            .with_seed(3);

        let a = TimetableRunner::run(&catalog, &config, &RuleWeights::default(), ()).unwrap();
        let b = TimetableRunner::run(&catalog, &config, &RuleWeights::default(), ()).unwrap();
        assert_eq!(a.fitness_history, b.fitness_history);
        assert_eq!(a.best.lessons(), b.best.lessons());
    }

    #[test]
    fn test_cancellation() {
        let catalog = Catalog::school_default();
        let config = GaConfig::default()
            .with_population_size(20)
            .with_max_generations(10000)
            .with_seed(42)
            .with_parallel(false);

        let cancel = Arc::new(AtomicBool::new(false));

        // Cancel after a few generations
        let cancel_clone = cancel.clone();
        std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(10));
            cancel_clone.store(true, Ordering::Relaxed);
        });

        let result = TimetableRunner::run_with_cancel(
            &catalog,
            &config,
            &RuleWeights::default(),
            (),
            Some(cancel),
        )
        .unwrap();

        assert_eq!(result.termination, Termination::Cancelled);
        assert!(result.generations < 10000, "should have stopped early");
        assert_eq!(result.fitness_history.len(), result.generations + 1);
    }

    #[test]
    fn test_cancelled_before_start() {
        let catalog = Catalog::school_default();
        let config = GaConfig::default().with_population_size(10).with_seed(42);
        let cancel = Arc::new(AtomicBool::new(true));

        let result = TimetableRunner::run_with_cancel(
            &catalog,
            &config,
            &RuleWeights::default(),
            (),
            Some(cancel),
        )
        .unwrap();
        assert_eq!(result.termination, Termination::Cancelled);
        assert_eq!(result.generations, 0);
        assert_eq!(result.snapshots.len(), 1);
    }

    #[test]
    fn test_find_solution_best_effort() {
        let catalog = Catalog::school_default();
        let config = GaConfig::default()
            .with_population_size(10)
            .with_max_generations(2)
            .with_max_attempts(3)
            .with_seed(42)
            .with_parallel(false);

        let mut recorder = Recorder::default();
        let result =
            TimetableRunner::find_solution(&catalog, &config, &RuleWeights::default(), &mut recorder)
                .unwrap();
        assert_eq!(result.termination, Termination::MaxGenerationsReached);
        assert_eq!(result.attempts, 3);
        // initial report of each attempt
        assert_eq!(recorder.generations.iter().filter(|&&g| g == 0).count(), 3);

        let single = TimetableRunner::run(&catalog, &config, &RuleWeights::default(), ()).unwrap();
        assert!(result.best_fitness() >= single.best_fitness());
    }

    #[test]
    fn test_find_solution_stops_at_first_success() {
        let catalog = small_catalog();
        let config = GaConfig::default()
            .with_population_size(50)
            .with_max_generations(500)
            .with_max_attempts(5)
            .with_seed(42)
            .with_parallel(false);

        let result =
            TimetableRunner::find_solution(&catalog, &config, &RuleWeights::default(), ()).unwrap();
        assert!(result.is_solution());
        assert_eq!(result.attempts, 1);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let catalog = small_catalog();
        let config = GaConfig::default().with_population_size(1);
        let err = TimetableRunner::run(&catalog, &config, &RuleWeights::default(), ()).unwrap_err();
        assert!(matches!(err, TimetableError::InvalidConfig(_)));
    }

    #[test]
    fn test_find_best() {
        let population: Vec<Timetable> = [3.0, 9.0, -1.0]
            .into_iter()
            .map(|fitness| Timetable::default().with_fitness(fitness))
            .collect();
        assert_eq!(find_best(&population).unwrap().fitness, 9.0);
        assert_eq!(find_best(&[]).unwrap_err(), TimetableError::EmptyPopulation);
    }
}
