//! Core trait definitions for the evolutionary loop.
//!
//! [`Individual`] is the contract the selector relies on: anything carrying
//! an optional cached [`Fitness`] can be ranked.

use crate::square::Square;

/// Marker trait for fitness values.
///
/// Lower fitness is considered better (minimization).
pub trait Fitness: PartialOrd + Copy + std::fmt::Debug + 'static {
    /// Returns a value representing the worst possible fitness.
    ///
    /// Unevaluated individuals rank as if they had this fitness.
    fn worst() -> Self;
}

impl Fitness for u32 {
    fn worst() -> Self {
        u32::MAX
    }
}

/// A candidate solution in the population.
///
/// The fitness is cached on the individual and is `None` whenever the
/// individual changed after its last evaluation.
pub trait Individual: Clone {
    /// The fitness type. Must implement [`Fitness`].
    type Fitness: Fitness;

    /// Returns the cached fitness, if still valid.
    fn fitness(&self) -> Option<Self::Fitness>;

    /// Returns the cached fitness, or [`Fitness::worst`] when stale.
    fn rank_key(&self) -> Self::Fitness {
        self.fitness().unwrap_or_else(Self::Fitness::worst)
    }
}

impl<const N: usize> Individual for Square<N> {
    type Fitness = u32;

    fn fitness(&self) -> Option<u32> {
        Square::fitness(self)
    }
}
