//! Evolution configuration.
//!
//! [`EvolutionConfig`] holds all parameters that control the generation loop.

/// Errors returned by [`EvolutionConfig::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("population_size must be at least 4, got {0}")]
    PopulationTooSmall(usize),
    #[error("population_size must be even, got {0}")]
    PopulationOdd(usize),
    #[error("max_iterations must be at least 1 or unbounded")]
    ZeroIterations,
    #[error("base_mutation_probability must be within [0, 1], got {0}")]
    InvalidBaseProbability(f64),
    #[error("mutation_step must be positive and finite, got {0}")]
    InvalidMutationStep(f64),
    #[error("preview_count must be at least 1")]
    ZeroPreview,
    #[error("initial population has {actual} squares, expected {expected}")]
    PopulationMismatch { expected: usize, actual: usize },
}

/// Configuration for the magic-square search.
///
/// # Defaults
///
/// ```
/// use magic_square_ga::evolution::EvolutionConfig;
///
/// let config = EvolutionConfig::default();
/// assert_eq!(config.population_size, 10_000);
/// assert_eq!(config.max_iterations, Some(10_000));
/// ```
///
/// # Builder Pattern
///
/// ```
/// use magic_square_ga::evolution::EvolutionConfig;
///
/// let config = EvolutionConfig::default()
///     .with_population_size(2_000)
///     .unbounded()
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionConfig {
    /// Number of squares in the population. Must be even.
    pub population_size: usize,

    /// Generation budget. `None` runs until a solution is found or the run
    /// is cancelled.
    pub max_iterations: Option<usize>,

    /// Mutation probability when the search is improving (0.0–1.0).
    pub base_mutation_probability: f64,

    /// Amount the mutation probability rises per stagnant generation and
    /// falls per improving one.
    pub mutation_step: f64,

    /// Number of fitness values included in each generation report.
    pub preview_count: usize,

    /// Random draws per empty cell during crossover repair before falling
    /// back to the smallest unused value.
    ///
    /// `0` selects `4·N²`.
    pub repair_attempts: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` seeds from the operating system's entropy source.
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 10_000,
            max_iterations: Some(10_000),
            base_mutation_probability: 0.1,
            mutation_step: 0.1,
            preview_count: 5,
            repair_attempts: 0,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets a finite generation budget.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = Some(n);
        self
    }

    /// Removes the generation budget.
    pub fn unbounded(mut self) -> Self {
        self.max_iterations = None;
        self
    }

    /// Sets the base mutation probability.
    pub fn with_base_mutation_probability(mut self, p: f64) -> Self {
        self.base_mutation_probability = p;
        self
    }

    /// Sets the mutation probability step.
    pub fn with_mutation_step(mut self, step: f64) -> Self {
        self.mutation_step = step;
        self
    }

    /// Sets how many fitness values each report previews.
    pub fn with_preview_count(mut self, n: usize) -> Self {
        self.preview_count = n;
        self
    }

    /// Sets the crossover repair sampling budget per cell.
    pub fn with_repair_attempts(mut self, n: usize) -> Self {
        self.repair_attempts = n;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Population of 10 000 squares and 10 000 generations.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Population of 50 000 squares and 10 000 generations.
    ///
    /// Slower per generation, but escapes local optima more often on 5×5.
    pub fn large() -> Self {
        Self {
            population_size: 50_000,
            ..Self::default()
        }
    }

    /// Repair sampling budget for squares of side `n`.
    pub fn effective_repair_attempts(&self, n: usize) -> usize {
        if self.repair_attempts == 0 {
            4 * n * n
        } else {
            self.repair_attempts
        }
    }

    /// Validates the configuration.
    ///
    /// The population must split into two equal halves: one for parents and
    /// one overwritten by their offspring.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 4 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }
        if self.population_size % 2 != 0 {
            return Err(ConfigError::PopulationOdd(self.population_size));
        }
        if self.max_iterations == Some(0) {
            return Err(ConfigError::ZeroIterations);
        }
        if !(0.0..=1.0).contains(&self.base_mutation_probability) {
            return Err(ConfigError::InvalidBaseProbability(
                self.base_mutation_probability,
            ));
        }
        if !self.mutation_step.is_finite() || self.mutation_step <= 0.0 {
            return Err(ConfigError::InvalidMutationStep(self.mutation_step));
        }
        if self.preview_count == 0 {
            return Err(ConfigError::ZeroPreview);
        }
        Ok(())
    }
}
