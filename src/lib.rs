//! Evolutionary search for N×N magic squares.
//!
//! A magic square holds each of `1..=N²` once, with every row, column and
//! both main diagonals summing to `M = N·(N²+1)/2`. This crate searches for
//! one with a generational genetic algorithm:
//!
//! - **[`square`]**: The candidate representation with a cached fitness
//! - **[`fitness`]**: Total deviation of all lines from `M`; `0` is solved
//! - **[`evolution`]**: Selection, crossover, adaptive mutation and the
//!   generation loop
//! - **[`random`]**: Explicitly threaded random number generators
//!
//! The square side is a compile-time constant (`Square<const N: usize>`).
//! The `magic-square` binary searches `N = `[`square::SIZE`].
//!
//! ```
//! use magic_square_ga::evolution::{EvolutionConfig, EvolutionRunner};
//!
//! let config = EvolutionConfig::default()
//!     .with_population_size(200)
//!     .with_max_iterations(20)
//!     .with_seed(42);
//! let result = EvolutionRunner::run::<3>(&config);
//! assert!(result.best.is_permutation());
//! ```

pub mod evolution;
pub mod fitness;
pub mod random;
pub mod square;

pub use square::{MagicSquare, Square, SquareError, SIZE};
