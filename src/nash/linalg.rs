//! Dense linear solves for the support systems.
//!
//! Systems here are tiny (`k + 1` unknowns for a support of size `k`), so a
//! Gauss-Jordan reduction over an augmented copy is all that is needed.

/// Outcome of solving a square linear system.
#[derive(Debug, Clone, PartialEq)]
pub enum LinearSolution {
    /// The unique solution, in the original variable order.
    Solved(Vec<f64>),
    /// No usable pivot was found for `column`.
    Singular {
        /// Elimination column whose best pivot fell below the threshold.
        column: usize,
    },
}

impl LinearSolution {
    /// The solution vector, if the system was solvable.
    pub fn solution(self) -> Option<Vec<f64>> {
        match self {
            LinearSolution::Solved(x) => Some(x),
            LinearSolution::Singular { .. } => None,
        }
    }

    /// Whether elimination hit a near-zero pivot.
    pub fn is_singular(&self) -> bool {
        matches!(self, LinearSolution::Singular { .. })
    }
}

/// A square system `M·x = rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    matrix: Vec<Vec<f64>>,
    rhs: Vec<f64>,
}

impl LinearSystem {
    /// Create an all-zero system with `m` equations and `m` unknowns.
    pub fn zeros(m: usize) -> Self {
        Self {
            matrix: vec![vec![0.0; m]; m],
            rhs: vec![0.0; m],
        }
    }

    /// Build a system from an explicit matrix and right-hand side.
    ///
    /// # Panics
    /// Panics if the matrix is not square or `rhs` has the wrong length.
    pub fn from_parts(matrix: Vec<Vec<f64>>, rhs: Vec<f64>) -> Self {
        let m = rhs.len();
        assert_eq!(matrix.len(), m, "matrix must have one row per rhs entry");
        assert!(matrix.iter().all(|row| row.len() == m), "matrix must be square");
        Self { matrix, rhs }
    }

    /// Number of unknowns.
    pub fn size(&self) -> usize {
        self.rhs.len()
    }

    /// Set coefficient `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.matrix[row][col] = value;
    }

    /// Set the right-hand side of `row`.
    pub fn set_rhs(&mut self, row: usize, value: f64) {
        self.rhs[row] = value;
    }

    /// Solve with Gauss-Jordan elimination and partial pivoting.
    ///
    /// At each step the row with the largest magnitude in the pivot column is
    /// swapped into place; if that magnitude is below `epsilon` the system is
    /// reported as singular. The pivot row is normalized and the column is
    /// cleared from every other row, so no back-substitution is needed.
    pub fn solve(&self, epsilon: f64) -> LinearSolution {
        let m = self.size();
        let mut augmented: Vec<Vec<f64>> = self
            .matrix
            .iter()
            .zip(&self.rhs)
            .map(|(row, &b)| {
                let mut row = row.clone();
                row.push(b);
                row
            })
            .collect();

        for col in 0..m {
            let mut pivot = col;
            let mut max_val = augmented[col][col].abs();
            for r in col + 1..m {
                let val = augmented[r][col].abs();
                if val > max_val {
                    pivot = r;
                    max_val = val;
                }
            }

            if max_val < epsilon {
                return LinearSolution::Singular { column: col };
            }
            augmented.swap(col, pivot);

            let pivot_val = augmented[col][col];
            for value in &mut augmented[col][col..] {
                *value /= pivot_val;
            }

            let pivot_row = augmented[col].clone();
            for (r, row) in augmented.iter_mut().enumerate() {
                if r == col {
                    continue;
                }
                let factor = row[col];
                if factor.abs() < epsilon {
                    continue;
                }
                for (value, p) in row[col..].iter_mut().zip(&pivot_row[col..]) {
                    *value -= factor * p;
                }
            }
        }

        LinearSolution::Solved(augmented.into_iter().map(|row| row[m]).collect())
    }
}

/// Solve `matrix · x = rhs`; see [`LinearSystem::solve`].
pub fn solve(matrix: &[Vec<f64>], rhs: &[f64], epsilon: f64) -> LinearSolution {
    LinearSystem::from_parts(matrix.to_vec(), rhs.to_vec()).solve(epsilon)
}
