//! Evolutionary search for magic squares.
//!
//! A generational loop over a fixed-size population of [`Square`]s:
//! truncation selection of the better half, row/column-inheriting
//! crossover, swap mutation with an adaptive rate, and stagnation-driven
//! perturbation or partial regeneration of the population.
//!
//! # Key Types
//!
//! - [`EvolutionConfig`]: Algorithm parameters (population size, budget, rates)
//! - [`EvolutionRunner`]: Executes the generation loop
//! - [`EvolutionResult`]: Final result with terminal [`RunState`] and history
//! - [`GenerationObserver`]: Per-generation progress callback
//!
//! # Submodules
//!
//! - [`operators`]: Crossover with random repair, swap mutation
//! - [`selection`]: Ranking and best-half selection
//! - [`control`]: Mutation-rate adaptation and reshuffle decisions
//!
//! [`Square`]: crate::square::Square

mod config;
pub mod control;
pub mod operators;
mod runner;
pub mod selection;
mod types;

pub use config::{ConfigError, EvolutionConfig};
pub use runner::{
    EvolutionResult, EvolutionRunner, GenerationObserver, GenerationReport, RunState,
};
pub use types::{Fitness, Individual};
