//! Bimatrix game definition.
//!
//! A bimatrix game is given by two n×n payoff matrices: `A` for the row
//! player and `B` for the column player, both indexed by the joint action
//! `(i, j)`. The game is validated once on construction and read-only after.

use serde::{Deserialize, Serialize};

/// A two-player game in normal form with square payoff matrices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BimatrixGame {
    n: usize,
    a: Vec<Vec<f64>>,
    b: Vec<Vec<f64>>,
}

/// Errors raised when building a game from raw matrices.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    /// The row player's matrix has no rows.
    #[error("payoff matrices must have at least one action")]
    Empty,
    /// A row does not have `n` entries.
    #[error("matrix {matrix} row {row} has {actual} entries, expected {expected}")]
    NotSquare {
        /// `'A'` or `'B'`.
        matrix: char,
        /// Zero-based row index.
        row: usize,
        /// Entries found.
        actual: usize,
        /// Entries required.
        expected: usize,
    },
    /// A and B disagree on the number of actions.
    #[error("matrix A is {a}x{a} but matrix B has {b} rows")]
    SizeMismatch {
        /// Rows of A.
        a: usize,
        /// Rows of B.
        b: usize,
    },
    /// A payoff is NaN or infinite.
    #[error("matrix {matrix} entry ({row}, {col}) is not finite")]
    NonFinite {
        /// `'A'` or `'B'`.
        matrix: char,
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
    },
}

impl BimatrixGame {
    /// Build a game from the row player's matrix `a` and column player's matrix `b`.
    pub fn new(a: Vec<Vec<f64>>, b: Vec<Vec<f64>>) -> Result<Self, GameError> {
        let n = a.len();
        if n == 0 {
            return Err(GameError::Empty);
        }
        if b.len() != n {
            return Err(GameError::SizeMismatch { a: n, b: b.len() });
        }
        check_matrix('A', &a, n)?;
        check_matrix('B', &b, n)?;
        Ok(Self { n, a, b })
    }

    /// Build a zero-sum game where the column player receives `-A`.
    pub fn zero_sum(a: Vec<Vec<f64>>) -> Result<Self, GameError> {
        let b = a
            .iter()
            .map(|row| row.iter().map(|x| -x).collect())
            .collect();
        Self::new(a, b)
    }

    /// Number of actions available to each player.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Row player's payoff matrix `A`.
    pub fn row_payoffs(&self) -> &[Vec<f64>] {
        &self.a
    }

    /// Column player's payoff matrix `B`.
    pub fn column_payoffs(&self) -> &[Vec<f64>] {
        &self.b
    }

    /// Expected payoff to the row player for action `i` against `q`: `Σ_j A[i][j]·q_j`.
    pub fn row_action_payoff(&self, i: usize, q: &[f64]) -> f64 {
        self.a[i].iter().zip(q).map(|(a, q)| a * q).sum()
    }

    /// Expected payoff to the column player for action `j` against `p`: `Σ_i B[i][j]·p_i`.
    pub fn column_action_payoff(&self, j: usize, p: &[f64]) -> f64 {
        self.b.iter().zip(p).map(|(row, p)| row[j] * p).sum()
    }

    /// Expected payoff `pᵀ·A·q` to the row player.
    pub fn row_value(&self, p: &[f64], q: &[f64]) -> f64 {
        (0..self.n).map(|i| p[i] * self.row_action_payoff(i, q)).sum()
    }

    /// Expected payoff `pᵀ·B·q` to the column player.
    pub fn column_value(&self, p: &[f64], q: &[f64]) -> f64 {
        (0..self.n).map(|j| q[j] * self.column_action_payoff(j, p)).sum()
    }

    /// The same game seen from the other side of the table: `(Bᵀ, Aᵀ)`.
    ///
    /// An equilibrium `(p, q)` of this game corresponds to `(q, p)` here.
    pub fn transpose_roles(&self) -> Self {
        Self {
            n: self.n,
            a: transpose(&self.b),
            b: transpose(&self.a),
        }
    }
}

fn check_matrix(name: char, matrix: &[Vec<f64>], n: usize) -> Result<(), GameError> {
    for (row, values) in matrix.iter().enumerate() {
        if values.len() != n {
            return Err(GameError::NotSquare {
                matrix: name,
                row,
                actual: values.len(),
                expected: n,
            });
        }
        if let Some(col) = values.iter().position(|x| !x.is_finite()) {
            return Err(GameError::NonFinite { matrix: name, row, col });
        }
    }
    Ok(())
}

fn transpose(matrix: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = matrix.len();
    (0..n).map(|j| (0..n).map(|i| matrix[i][j]).collect()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_malformed_matrices() {
        assert_eq!(BimatrixGame::new(vec![], vec![]), Err(GameError::Empty));
        assert_eq!(
            BimatrixGame::new(vec![vec![1.0, 2.0]], vec![vec![1.0]]),
            Err(GameError::NotSquare { matrix: 'A', row: 0, actual: 2, expected: 1 })
        );
        assert_eq!(
            BimatrixGame::new(vec![vec![1.0]], vec![vec![1.0], vec![2.0]]),
            Err(GameError::SizeMismatch { a: 1, b: 2 })
        );
        assert_eq!(
            BimatrixGame::new(vec![vec![1.0]], vec![vec![f64::NAN]]),
            Err(GameError::NonFinite { matrix: 'B', row: 0, col: 0 })
        );
    }

    #[test]
    fn test_expected_payoffs() {
        let game = BimatrixGame::new(
            vec![vec![3.0, 0.0], vec![5.0, 1.0]],
            vec![vec![3.0, 5.0], vec![0.0, 1.0]],
        )
        .unwrap();
        let p = [0.5, 0.5];
        let q = [0.25, 0.75];
        assert!((game.row_action_payoff(0, &q) - 0.75).abs() < 1e-12);
        assert!((game.row_action_payoff(1, &q) - 2.0).abs() < 1e-12);
        assert!((game.column_action_payoff(0, &p) - 1.5).abs() < 1e-12);
        assert!((game.column_action_payoff(1, &p) - 3.0).abs() < 1e-12);
        assert!((game.row_value(&p, &q) - 1.375).abs() < 1e-12);
        assert!((game.column_value(&p, &q) - 2.625).abs() < 1e-12);
    }

    #[test]
    fn test_transpose_roles_swaps_players() {
        let game = BimatrixGame::new(
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            vec![vec![5.0, 6.0], vec![7.0, 8.0]],
        )
        .unwrap();
        let swapped = game.transpose_roles();
        assert_eq!(swapped.row_payoffs(), &[vec![5.0, 7.0], vec![6.0, 8.0]]);
        assert_eq!(swapped.column_payoffs(), &[vec![1.0, 3.0], vec![2.0, 4.0]]);
        assert_eq!(swapped.transpose_roles(), game);
    }

    #[test]
    fn test_zero_sum() {
        let game = BimatrixGame::zero_sum(vec![vec![1.0, -1.0], vec![-1.0, 1.0]]).unwrap();
        assert_eq!(game.column_payoffs(), &[vec![-1.0, 1.0], vec![1.0, -1.0]]);
    }
}
