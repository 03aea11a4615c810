//! Random number generation helpers.
//!
//! Every stochastic operation in this crate takes an explicit `&mut R: Rng`.
//! There is no process-wide generator: the runner owns a single instance
//! created here and threads it through each call.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Creates a deterministic generator from a seed.
///
/// The same seed always produces the same sequence, so a seeded
/// [`EvolutionRunner`](crate::evolution::EvolutionRunner) run is reproducible.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator seeded from the operating system's entropy source.
pub fn create_entropy_rng() -> StdRng {
    create_rng(rand::random())
}

/// Shuffles a slice uniformly at random (Fisher–Yates).
pub fn shuffle<T, R: Rng + ?Sized>(slice: &mut [T], rng: &mut R) {
    slice.shuffle(rng);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = create_rng(42);
        let mut b = create_rng(42);
        for _ in 0..100 {
            assert_eq!(a.random_range(0..1000u32), b.random_range(0..1000u32));
        }
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = create_rng(7);
        let mut values: Vec<u32> = (1..=25).collect();
        shuffle(&mut values, &mut rng);
        let mut sorted = values.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (1..=25).collect::<Vec<_>>());
    }
}
