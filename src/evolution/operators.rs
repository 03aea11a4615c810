//! Crossover and mutation operators for magic-square candidates.
//!
//! # Crossover
//!
//! [`crossover`] builds a child from two parents in four layers:
//!
//! 1. Every row of parent1 that already sums to the magic constant is copied
//! 2. Every such column of parent1 is copied (after rows, so columns win at
//!    intersections, although both copy the same parent1 value there)
//! 3. Each still-empty cell takes parent2's value at that position, unless
//!    that value is already in the child
//! 4. Remaining empty cells are filled with random unused values
//!
//! Step 4 samples `1..=N²` until it hits an unused value. After
//! `repair_attempts` misses for one cell it falls back to the smallest
//! unused value, so the operator always terminates.
//!
//! # Mutation
//!
//! [`mutate_pool`] applies at most one random swap per individual, with the
//! given probability. Swaps preserve the permutation invariant.

use crate::square::Square;
use rand::Rng;

const EMPTY: u32 = 0;

/// Child grid under construction, tracking which values are already used.
struct ChildBuilder<const N: usize> {
    cells: [[u32; N]; N],
    used: Vec<bool>,
}

impl<const N: usize> ChildBuilder<N> {
    fn new() -> Self {
        Self {
            cells: [[EMPTY; N]; N],
            used: vec![false; N * N + 1],
        }
    }

    fn is_empty(&self, row: usize, col: usize) -> bool {
        self.cells[row][col] == EMPTY
    }

    fn contains(&self, value: u32) -> bool {
        self.used[value as usize]
    }

    /// Places `value`, releasing whatever the cell held before.
    fn place(&mut self, row: usize, col: usize, value: u32) {
        let old = self.cells[row][col];
        if old != EMPTY {
            self.used[old as usize] = false;
        }
        self.cells[row][col] = value;
        self.used[value as usize] = true;
    }

    fn first_unused(&self) -> Option<u32> {
        (1..=(N * N) as u32).find(|&v| !self.used[v as usize])
    }

    fn finish(self) -> Square<N> {
        Square::from_cells_unchecked(self.cells)
    }
}

/// Builds one child from `parent1` and `parent2`.
///
/// The child is always a complete permutation of `1..=N²`, even when
/// parent1 has no line summing to the magic constant.
pub fn crossover<const N: usize, R: Rng + ?Sized>(
    parent1: &Square<N>,
    parent2: &Square<N>,
    repair_attempts: usize,
    rng: &mut R,
) -> Square<N> {
    let magic = Square::<N>::magic_constant();
    let mut child = ChildBuilder::<N>::new();

    for row in 0..N {
        if parent1.row_sum(row) == magic {
            for col in 0..N {
                child.place(row, col, parent1.get(row, col));
            }
        }
    }

    for col in 0..N {
        if parent1.column_sum(col) == magic {
            for row in 0..N {
                child.place(row, col, parent1.get(row, col));
            }
        }
    }

    for row in 0..N {
        for col in 0..N {
            let value = parent2.get(row, col);
            if child.is_empty(row, col) && !child.contains(value) {
                child.place(row, col, value);
            }
        }
    }

    let max = (N * N) as u32;
    for row in 0..N {
        for col in 0..N {
            if !child.is_empty(row, col) {
                continue;
            }
            let sampled = (0..repair_attempts)
                .map(|_| rng.random_range(1..=max))
                .find(|&v| !child.contains(v));
            let value = match sampled {
                Some(v) => v,
                None => {
                    log::trace!("repair fell back to scan at ({row}, {col})");
                    // An incomplete child always has an unused value.
                    match child.first_unused() {
                        Some(v) => v,
                        None => continue,
                    }
                }
            };
            child.place(row, col, value);
        }
    }

    child.finish()
}

/// Breeds one child per selected parent.
///
/// For each entry of `selected`, in order, parent2 is drawn uniformly from
/// the whole `population`. The result has `selected.len()` children.
///
/// # Panics
/// Panics if `population` is empty while `selected` is not.
pub fn crossover_pool<const N: usize, R: Rng + ?Sized>(
    selected: &[Square<N>],
    population: &[Square<N>],
    repair_attempts: usize,
    rng: &mut R,
) -> Vec<Square<N>> {
    if selected.is_empty() {
        return Vec::new();
    }
    assert!(!population.is_empty(), "cannot draw parent2 from empty population");

    selected
        .iter()
        .map(|parent1| {
            let parent2 = &population[rng.random_range(0..population.len())];
            crossover(parent1, parent2, repair_attempts, rng)
        })
        .collect()
}

/// Applies one random swap to each individual with probability `probability`.
///
/// A uniform draw in `[0, 1]` is compared with `<=`, so any probability
/// `>= 1.0` mutates every individual exactly once. Returns the number of
/// individuals mutated.
pub fn mutate_pool<const N: usize, R: Rng + ?Sized>(
    pool: &mut [Square<N>],
    probability: f64,
    rng: &mut R,
) -> usize {
    let mut mutated = 0;
    for square in pool.iter_mut() {
        if rng.random_range(0.0..=1.0) <= probability {
            square.random_swap(rng);
            mutated += 1;
        }
    }
    mutated
}
