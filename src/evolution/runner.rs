//! Generation loop execution.
//!
//! [`EvolutionRunner`] drives one generation at a time:
//! evaluate → check for a solution → report → select → breed → adapt the
//! mutation rate → mutate the offspring → rebuild the population.

use super::config::{ConfigError, EvolutionConfig};
use super::control::{ControlState, Reshuffle};
use super::operators::{crossover_pool, mutate_pool};
use super::selection::{best_index, select_best_half};
use super::types::Individual;
use crate::fitness::evaluate_population;
use crate::random::{create_entropy_rng, create_rng};
use crate::square::Square;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// State of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunState {
    /// Still iterating.
    Running,
    /// A square with fitness 0 was found.
    Solved,
    /// The finite generation budget ran out.
    Exhausted,
    /// The cancellation flag was set.
    Cancelled,
}

/// Snapshot handed to a [`GenerationObserver`] for every unsolved generation.
#[derive(Debug)]
pub struct GenerationReport<'a, const N: usize> {
    /// 1-based generation index.
    pub generation: usize,
    /// The best square of this generation.
    pub best: &'a Square<N>,
    /// Its fitness.
    pub best_fitness: u32,
    /// The lowest fitness values of this generation, best first.
    pub preview: &'a [u32],
    /// Mutation probability in effect before this generation's adaptation.
    pub mutation_probability: f64,
    /// Stagnation counter before this generation's adaptation.
    pub unchanged_count: usize,
}

/// Receives progress from the runner.
///
/// Both methods default to no-ops; `()` is the silent observer.
pub trait GenerationObserver<const N: usize> {
    /// Called once per generation that did not produce a solution.
    fn on_generation(&mut self, _report: &GenerationReport<'_, N>) {}

    /// Called once when a perfect square is found.
    fn on_solved(&mut self, _generation: usize, _square: &Square<N>) {}
}

impl<const N: usize> GenerationObserver<N> for () {}

/// Result of a run.
#[derive(Debug, Clone)]
pub struct EvolutionResult<const N: usize> {
    /// The best square seen during the run.
    pub best: Square<N>,

    /// Fitness of `best`.
    pub best_fitness: u32,

    /// Number of generations evaluated.
    pub generations: usize,

    /// Terminal state.
    pub state: RunState,

    /// Best fitness of each evaluated generation.
    ///
    /// Not monotonic: the perturbation and replacement steps may discard the
    /// previous best.
    pub fitness_history: Vec<u32>,
}

impl<const N: usize> EvolutionResult<N> {
    /// Returns `true` if the run found a magic square.
    pub fn is_solved(&self) -> bool {
        self.state == RunState::Solved
    }
}

/// Executes the magic-square search.
///
/// # Usage
///
/// ```no_run
/// use magic_square_ga::evolution::{EvolutionConfig, EvolutionRunner};
///
/// let config = EvolutionConfig::default().with_seed(42);
/// let result = EvolutionRunner::run::<5>(&config);
/// println!("{}fitness {}", result.best, result.best_fitness);
/// ```
pub struct EvolutionRunner;

impl EvolutionRunner {
    /// Runs the search silently.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (use [`EvolutionRunner::try_run`]
    /// to get the error instead).
    pub fn run<const N: usize>(config: &EvolutionConfig) -> EvolutionResult<N> {
        Self::try_run(config).expect("invalid EvolutionConfig")
    }

    /// Runs the search silently, returning the validation error instead of
    /// panicking.
    pub fn try_run<const N: usize>(
        config: &EvolutionConfig,
    ) -> Result<EvolutionResult<N>, ConfigError> {
        Self::run_with_observer(config, &mut ())
    }

    /// Runs the search, reporting each generation to `observer`.
    pub fn run_with_observer<const N: usize, O: GenerationObserver<N>>(
        config: &EvolutionConfig,
        observer: &mut O,
    ) -> Result<EvolutionResult<N>, ConfigError> {
        Self::run_with_cancel(config, observer, None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the run stops
    /// before the next generation and returns the best square seen so far.
    pub fn run_with_cancel<const N: usize, O: GenerationObserver<N>>(
        config: &EvolutionConfig,
        observer: &mut O,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<EvolutionResult<N>, ConfigError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_entropy_rng(),
        };
        let population = (0..config.population_size)
            .map(|_| Square::random(&mut rng))
            .collect();

        Ok(evolve(config, population, observer, cancel, &mut rng))
    }

    /// Runs the search starting from a given population.
    ///
    /// # Errors
    /// Returns [`ConfigError::PopulationMismatch`] if `population` does not
    /// have `config.population_size` squares, or any other validation error.
    pub fn run_from<const N: usize, O: GenerationObserver<N>>(
        config: &EvolutionConfig,
        population: Vec<Square<N>>,
        observer: &mut O,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<EvolutionResult<N>, ConfigError> {
        config.validate()?;
        if population.len() != config.population_size {
            return Err(ConfigError::PopulationMismatch {
                expected: config.population_size,
                actual: population.len(),
            });
        }

        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_entropy_rng(),
        };
        Ok(evolve(config, population, observer, cancel, &mut rng))
    }
}

/// The generation loop. `config` is already validated.
fn evolve<const N: usize, O: GenerationObserver<N>, R: Rng>(
    config: &EvolutionConfig,
    mut population: Vec<Square<N>>,
    observer: &mut O,
    cancel: Option<Arc<AtomicBool>>,
    rng: &mut R,
) -> EvolutionResult<N> {
    let repair_attempts = config.effective_repair_attempts(N);
    let mut control = ControlState::new(config.base_mutation_probability, config.mutation_step);
    let mut best: Option<Square<N>> = None;
    let mut fitness_history = Vec::new();
    let mut generation = 0usize;

    log::info!(
        "searching {n}x{n} magic square (M = {}), population {}, budget {}",
        Square::<N>::magic_constant(),
        population.len(),
        config
            .max_iterations
            .map_or_else(|| "unbounded".to_string(), |max| max.to_string()),
        n = N,
    );

    let state = loop {
        if config.max_iterations.is_some_and(|max| generation >= max) {
            break RunState::Exhausted;
        }
        if let Some(ref flag) = cancel {
            if flag.load(Ordering::Relaxed) {
                break RunState::Cancelled;
            }
        }

        // 1. Evaluate
        evaluate_population(&mut population);
        generation += 1;

        // 2. Check for a solution
        let gen_best = find_best(&population);
        let best_fitness = gen_best.rank_key();
        fitness_history.push(best_fitness);
        if best.as_ref().map_or(true, |b| best_fitness < b.rank_key()) {
            best = Some(gen_best.clone());
        }
        if best_fitness == 0 {
            observer.on_solved(generation, gen_best);
            break RunState::Solved;
        }

        // 3. Select; the population is now sorted, best first
        let parents = select_best_half(&mut population);

        // 4. Report. Sorting only reordered the squares, so the best and the
        // control state are the same as before selection.
        let preview: Vec<u32> = population
            .iter()
            .take(config.preview_count)
            .map(Individual::rank_key)
            .collect();
        observer.on_generation(&GenerationReport {
            generation,
            best: &population[0],
            best_fitness,
            preview: &preview,
            mutation_probability: control.mutation_probability,
            unchanged_count: control.unchanged_count,
        });

        // 5. Breed
        let mut offspring = crossover_pool(&population[..parents], &population, repair_attempts, rng);

        // 6. Adapt and mutate
        control.adapt(best_fitness);
        let mutated = mutate_pool(&mut offspring, control.mutation_probability, rng);
        control.record(best_fitness);

        // 7. Rebuild
        let stagnation = control.unchanged_count;
        let action = control.reshuffle();
        log::debug!(
            "generation {generation}: best {best_fitness}, p_mut {:.2}, unchanged {stagnation} -> {}, mutated {mutated}, {action:?}",
            control.mutation_probability,
            control.unchanged_count,
        );
        rebuild(&mut population, offspring, action, rng);
    };

    let best = match best {
        Some(b) => b,
        None => {
            // Stopped before the first generation.
            evaluate_population(&mut population);
            find_best(&population).clone()
        }
    };
    let best_fitness = best.rank_key();

    match state {
        RunState::Solved => log::info!("solved after {generation} generations"),
        _ => log::info!("{state:?} after {generation} generations, best fitness {best_fitness}"),
    }

    EvolutionResult {
        best,
        best_fitness,
        generations: generation,
        state,
        fitness_history,
    }
}

/// Applies the reshuffle decision to the population.
fn rebuild<const N: usize, R: Rng>(
    population: &mut [Square<N>],
    offspring: Vec<Square<N>>,
    action: Reshuffle,
    rng: &mut R,
) {
    let n = population.len();
    match action {
        Reshuffle::PerturbAllButLast => {
            for square in &mut population[..n - 1] {
                square.random_swap(rng);
            }
        }
        Reshuffle::PerturbInterior => {
            for square in &mut population[1..n - 1] {
                square.random_swap(rng);
            }
        }
        Reshuffle::Replace => {
            for square in &mut population[n / 4..n / 2] {
                *square = Square::random(rng);
            }
            for (slot, child) in population[n / 2..].iter_mut().zip(offspring) {
                *slot = child;
            }
        }
    }
}

/// Find the square with the lowest fitness.
fn find_best<const N: usize>(population: &[Square<N>]) -> &Square<N> {
    let idx = best_index(population).expect("population must not be empty");
    &population[idx]
}

// ============================================================================
// Tests
// ============================================================================
