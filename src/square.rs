//! Square representation.
//!
//! A [`Square`] is an N×N grid holding every value `1..=N²` exactly once,
//! paired with a cached fitness score. The score is `None` until the square
//! is evaluated and is cleared again by any change to the grid, so a stale
//! score can never be read.

use crate::random::shuffle;
use rand::Rng;
use std::fmt;

/// Side length of the squares searched by the `magic-square` binary.
pub const SIZE: usize = 5;

/// The square type used by the binary.
pub type MagicSquare = Square<SIZE>;

/// Errors from constructing a square out of explicit values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SquareError {
    #[error("value {value} at ({row}, {col}) is outside 1..={max}")]
    OutOfRange {
        row: usize,
        col: usize,
        value: u32,
        max: u32,
    },
    #[error("value {value} appears more than once")]
    Duplicate { value: u32 },
}

/// An N×N candidate magic square.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Square<const N: usize> {
    cells: [[u32; N]; N],
    fitness: Option<u32>,
}

impl<const N: usize> Square<N> {
    /// Number of cells, `N²`.
    pub const CELLS: usize = N * N;

    /// The target sum for every row, column and diagonal: `N·(N²+1)/2`.
    pub const fn magic_constant() -> u32 {
        (N * (N * N + 1) / 2) as u32
    }

    /// Creates a uniformly random permutation of `1..=N²`.
    ///
    /// The returned square is unevaluated.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut values: Vec<u32> = (1..=Self::CELLS as u32).collect();
        shuffle(&mut values, rng);

        let mut cells = [[0; N]; N];
        for (cell, value) in cells.iter_mut().flatten().zip(values) {
            *cell = value;
        }
        Self {
            cells,
            fitness: None,
        }
    }

    /// Builds a square from explicit rows.
    ///
    /// # Errors
    /// Returns [`SquareError`] unless the rows hold each of `1..=N²` once.
    pub fn from_rows(rows: [[u32; N]; N]) -> Result<Self, SquareError> {
        let max = Self::CELLS as u32;
        let mut seen = vec![false; Self::CELLS + 1];
        for (row, values) in rows.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if value == 0 || value > max {
                    return Err(SquareError::OutOfRange {
                        row,
                        col,
                        value,
                        max,
                    });
                }
                if seen[value as usize] {
                    return Err(SquareError::Duplicate { value });
                }
                seen[value as usize] = true;
            }
        }
        Ok(Self {
            cells: rows,
            fitness: None,
        })
    }

    /// Wraps a grid produced by an operator that already guarantees the
    /// permutation invariant.
    pub(crate) fn from_cells_unchecked(cells: [[u32; N]; N]) -> Self {
        debug_assert!(is_permutation(&cells));
        Self {
            cells,
            fitness: None,
        }
    }

    /// The grid, row-major.
    pub fn rows(&self) -> &[[u32; N]; N] {
        &self.cells
    }

    /// Value at `(row, col)`.
    ///
    /// # Panics
    /// Panics if either index is `>= N`.
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row][col]
    }

    /// Sum of row `row`.
    pub fn row_sum(&self, row: usize) -> u32 {
        self.cells[row].iter().sum()
    }

    /// Sum of column `col`.
    pub fn column_sum(&self, col: usize) -> u32 {
        self.cells.iter().map(|r| r[col]).sum()
    }

    /// Cached fitness, `None` if the grid changed since the last evaluation.
    pub fn fitness(&self) -> Option<u32> {
        self.fitness
    }

    pub(crate) fn set_fitness(&mut self, fitness: u32) {
        self.fitness = Some(fitness);
    }

    /// Exchanges the values at two cells and invalidates the cached fitness.
    ///
    /// Swapping a cell with itself leaves the grid unchanged.
    pub fn swap_cells(&mut self, a: (usize, usize), b: (usize, usize)) {
        let tmp = self.cells[a.0][a.1];
        self.cells[a.0][a.1] = self.cells[b.0][b.1];
        self.cells[b.0][b.1] = tmp;
        self.fitness = None;
    }

    /// Swaps two independently chosen random cells.
    ///
    /// The two cells may coincide, in which case nothing moves.
    pub fn random_swap<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let from = (rng.random_range(0..N), rng.random_range(0..N));
        let to = (rng.random_range(0..N), rng.random_range(0..N));
        self.swap_cells(from, to);
    }

    /// Returns `true` if the grid holds each of `1..=N²` exactly once.
    pub fn is_permutation(&self) -> bool {
        is_permutation(&self.cells)
    }
}

fn is_permutation<const N: usize>(cells: &[[u32; N]; N]) -> bool {
    let max = (N * N) as u32;
    let mut seen = vec![false; N * N + 1];
    for &value in cells.iter().flatten() {
        if value == 0 || value > max || seen[value as usize] {
            return false;
        }
        seen[value as usize] = true;
    }
    true
}

impl<const N: usize> fmt::Display for Square<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = Self::CELLS.to_string().len();
        for row in &self.cells {
            let line = row
                .iter()
                .map(|v| format!("{v:>width$}"))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    #[test]
    fn test_magic_constant() {
        assert_eq!(Square::<3>::magic_constant(), 15);
        assert_eq!(Square::<4>::magic_constant(), 34);
        assert_eq!(Square::<5>::magic_constant(), 65);
    }

    #[test]
    fn test_random_is_unevaluated() {
        let mut rng = create_rng(42);
        let sq = Square::<5>::random(&mut rng);
        assert!(sq.is_permutation());
        assert_eq!(sq.fitness(), None);
    }

    #[test]
    fn test_from_rows_rejects_duplicate() {
        let err = Square::<3>::from_rows([[1, 2, 3], [4, 5, 6], [7, 8, 8]]).unwrap_err();
        assert_eq!(err, SquareError::Duplicate { value: 8 });
    }

    #[test]
    fn test_from_rows_rejects_out_of_range() {
        let err = Square::<3>::from_rows([[0, 2, 3], [4, 5, 6], [7, 8, 9]]).unwrap_err();
        assert!(matches!(err, SquareError::OutOfRange { row: 0, col: 0, .. }));

        let err = Square::<3>::from_rows([[1, 2, 3], [4, 5, 6], [7, 8, 10]]).unwrap_err();
        assert!(matches!(err, SquareError::OutOfRange { value: 10, .. }));
    }

    #[test]
    fn test_swap_invalidates_fitness() {
        let mut sq = Square::<3>::from_rows([[2, 7, 6], [9, 5, 1], [4, 3, 8]]).unwrap();
        sq.set_fitness(0);
        sq.swap_cells((0, 0), (2, 2));
        assert_eq!(sq.fitness(), None);
        assert_eq!(sq.get(0, 0), 8);
        assert_eq!(sq.get(2, 2), 2);
    }

    #[test]
    fn test_swap_with_itself() {
        let mut sq = Square::<3>::from_rows([[2, 7, 6], [9, 5, 1], [4, 3, 8]]).unwrap();
        let before = *sq.rows();
        sq.swap_cells((1, 1), (1, 1));
        assert_eq!(*sq.rows(), before);
        assert!(sq.is_permutation());
    }

    #[test]
    fn test_sums() {
        let sq = Square::<3>::from_rows([[1, 2, 3], [4, 5, 6], [7, 8, 9]]).unwrap();
        assert_eq!(sq.row_sum(0), 6);
        assert_eq!(sq.row_sum(2), 24);
        assert_eq!(sq.column_sum(0), 12);
        assert_eq!(sq.column_sum(2), 18);
    }

    #[test]
    fn test_display() {
        let sq = Square::<3>::from_rows([[2, 7, 6], [9, 5, 1], [4, 3, 8]]).unwrap();
        assert_eq!(sq.to_string(), "2 7 6\n9 5 1\n4 3 8\n");

        let sq = Square::<4>::from_rows([
            [16, 2, 3, 13],
            [5, 11, 10, 8],
            [9, 7, 6, 12],
            [4, 14, 15, 1],
        ])
        .unwrap();
        assert_eq!(sq.to_string().lines().next(), Some("16  2  3 13"));
    }

    proptest! {
        #[test]
        fn prop_random_square_is_permutation(seed in any::<u64>()) {
            let mut rng = create_rng(seed);
            prop_assert!(Square::<5>::random(&mut rng).is_permutation());
            prop_assert!(Square::<3>::random(&mut rng).is_permutation());
        }

        #[test]
        fn prop_random_swaps_keep_permutation(seed in any::<u64>(), swaps in 1usize..50) {
            let mut rng = create_rng(seed);
            let mut sq = Square::<4>::random(&mut rng);
            for _ in 0..swaps {
                sq.random_swap(&mut rng);
            }
            prop_assert!(sq.is_permutation());
        }
    }
}
