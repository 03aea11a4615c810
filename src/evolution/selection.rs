//! Parent selection.
//!
//! Truncation selection: the population is ranked by fitness and the
//! better half becomes the parent pool.

use super::types::Individual;

/// Sorts the population ascending by fitness, best first.
///
/// Ties are broken arbitrarily. Unevaluated individuals sort last.
pub fn sort_by_fitness<I: Individual>(population: &mut [I]) {
    population.sort_unstable_by(|a, b| {
        a.rank_key()
            .partial_cmp(&b.rank_key())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Ranks the population in place and returns the size of the parent pool.
///
/// After the call, `population[..n]` (with `n = population.len() / 2`) holds
/// the selected parents, and every selected fitness is `<=` every fitness
/// outside the pool. Fitness values are not modified.
pub fn select_best_half<I: Individual>(population: &mut [I]) -> usize {
    sort_by_fitness(population);
    population.len() / 2
}

/// Index of the individual with the lowest fitness.
///
/// Returns `None` for an empty population.
pub fn best_index<I: Individual>(population: &[I]) -> Option<usize> {
    population
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            a.rank_key()
                .partial_cmp(&b.rank_key())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
}
