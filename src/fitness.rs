//! Fitness evaluation.
//!
//! Fitness is the total absolute deviation of every row, column and both
//! main diagonals from the magic constant. Lower is better; `0` means the
//! square is magic. Given the permutation invariant, `0` is both necessary
//! and sufficient.

use crate::square::Square;

/// Sum over rows of `|row_sum - magic|`.
pub fn row_deviation<const N: usize>(square: &Square<N>, magic: u32) -> u32 {
    (0..N).map(|r| square.row_sum(r).abs_diff(magic)).sum()
}

/// Sum over columns of `|column_sum - magic|`.
pub fn column_deviation<const N: usize>(square: &Square<N>, magic: u32) -> u32 {
    (0..N).map(|c| square.column_sum(c).abs_diff(magic)).sum()
}

/// Deviation of the main diagonal (top-left to bottom-right).
pub fn main_diagonal_deviation<const N: usize>(square: &Square<N>, magic: u32) -> u32 {
    let sum: u32 = (0..N).map(|i| square.get(i, i)).sum();
    sum.abs_diff(magic)
}

/// Deviation of the anti-diagonal (bottom-left to top-right).
pub fn anti_diagonal_deviation<const N: usize>(square: &Square<N>, magic: u32) -> u32 {
    let sum: u32 = (0..N).map(|i| square.get(N - 1 - i, i)).sum();
    sum.abs_diff(magic)
}

/// Computes the fitness of a square without touching its cache.
pub fn fitness<const N: usize>(square: &Square<N>) -> u32 {
    let magic = Square::<N>::magic_constant();
    row_deviation(square, magic)
        + column_deviation(square, magic)
        + main_diagonal_deviation(square, magic)
        + anti_diagonal_deviation(square, magic)
}

/// Computes the fitness and stores it in the square's cache.
pub fn evaluate<const N: usize>(square: &mut Square<N>) -> u32 {
    let f = fitness(square);
    square.set_fitness(f);
    f
}

/// Evaluates every square in the population.
pub fn evaluate_population<const N: usize>(population: &mut [Square<N>]) {
    for square in population.iter_mut() {
        evaluate(square);
    }
}

/// Returns `true` if every line sums to the magic constant.
///
/// Checked line by line, independently of [`fitness`].
pub fn is_magic<const N: usize>(square: &Square<N>) -> bool {
    let magic = Square::<N>::magic_constant();
    (0..N).all(|i| square.row_sum(i) == magic && square.column_sum(i) == magic)
        && (0..N).map(|i| square.get(i, i)).sum::<u32>() == magic
        && (0..N).map(|i| square.get(N - 1 - i, i)).sum::<u32>() == magic
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn lo_shu() -> Square<3> {
        Square::from_rows([[2, 7, 6], [9, 5, 1], [4, 3, 8]]).unwrap()
    }

    #[test]
    fn test_lo_shu_is_perfect() {
        let mut sq = lo_shu();
        assert_eq!(evaluate(&mut sq), 0);
        assert_eq!(sq.fitness(), Some(0));
        assert!(is_magic(&sq));
    }

    #[test]
    fn test_ascending_square() {
        // rows 6/15/24 -> 9+0+9, columns 12/15/18 -> 3+0+3, both diagonals 15
        let sq = Square::<3>::from_rows([[1, 2, 3], [4, 5, 6], [7, 8, 9]]).unwrap();
        assert_eq!(row_deviation(&sq, 15), 18);
        assert_eq!(column_deviation(&sq, 15), 6);
        assert_eq!(main_diagonal_deviation(&sq, 15), 0);
        assert_eq!(anti_diagonal_deviation(&sq, 15), 0);
        assert_eq!(fitness(&sq), 24);
        assert!(!is_magic(&sq));
    }

    #[test]
    fn test_diagonals_counted() {
        let sq = Square::<3>::from_rows([[6, 7, 2], [1, 5, 9], [8, 3, 4]]).unwrap();
        assert_eq!(fitness(&sq), 0);

        let sq = Square::<3>::from_rows([[7, 6, 2], [5, 1, 9], [3, 8, 4]]).unwrap();
        assert_eq!(row_deviation(&sq, 15), 0);
        assert_eq!(column_deviation(&sq, 15), 0);
        assert_eq!(main_diagonal_deviation(&sq, 15), 3);
        assert_eq!(anti_diagonal_deviation(&sq, 15), 9);
        assert_eq!(fitness(&sq), 12);
    }

    #[test]
    fn test_order_four() {
        let sq = Square::<4>::from_rows([
            [16, 2, 3, 13],
            [5, 11, 10, 8],
            [9, 7, 6, 12],
            [4, 14, 15, 1],
        ])
        .unwrap();
        assert_eq!(fitness(&sq), 0);
    }

    #[test]
    fn test_evaluate_population() {
        let mut rng = create_rng(1);
        let mut pop: Vec<Square<5>> = (0..20).map(|_| Square::random(&mut rng)).collect();
        evaluate_population(&mut pop);
        assert!(pop.iter().all(|s| s.fitness() == Some(fitness(s))));
    }

    proptest! {
        #[test]
        fn prop_zero_iff_magic(seed in any::<u64>()) {
            let mut rng = create_rng(seed);
            let sq = Square::<3>::random(&mut rng);
            prop_assert_eq!(fitness(&sq) == 0, is_magic(&sq));
        }

        #[test]
        fn prop_fitness_is_pure(seed in any::<u64>()) {
            let mut rng = create_rng(seed);
            let mut sq = Square::<5>::random(&mut rng);
            let first = fitness(&sq);
            prop_assert_eq!(evaluate(&mut sq), first);
            prop_assert_eq!(fitness(&sq), first);
        }
    }
}
