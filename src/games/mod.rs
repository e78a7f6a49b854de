//! Classic bimatrix games.
//!
//! These serve as:
//!
//! 1. **Validation**: Games with known equilibria verify that the support
//!    enumeration finds the right strategies in the right order.
//!
//! 2. **Benchmarks**: [`random_game`] provides seeded games of any size for
//!    performance testing.
//!
//! ## Available Games
//!
//! | Game                     | Pure equilibria | Mixed equilibrium          |
//! |--------------------------|-----------------|----------------------------|
//! | [`matching_pennies`]     | none            | (½, ½), (½, ½)             |
//! | [`prisoners_dilemma`]    | (D, D)          | none                       |
//! | [`battle_of_the_sexes`]  | (0, 0), (1, 1)  | (⅔, ⅓), (⅓, ⅔)             |
//! | [`rock_paper_scissors`]  | none            | uniform                    |
//! | [`coordination`]         | every diagonal  | uniform over any subset    |

mod random;

pub use random::random_game;

use crate::nash::BimatrixGame;

fn build(a: Vec<Vec<f64>>, b: Vec<Vec<f64>>) -> BimatrixGame {
    // Only called with literal square matrices of matching size.
    BimatrixGame::new(a, b).unwrap_or_else(|e| panic!("invalid built-in game: {}", e))
}

/// Matching Pennies: the row player wins on a match, the column player on a mismatch.
pub fn matching_pennies() -> BimatrixGame {
    build(
        vec![vec![1.0, -1.0], vec![-1.0, 1.0]],
        vec![vec![-1.0, 1.0], vec![1.0, -1.0]],
    )
}

/// Prisoner's Dilemma with actions (Cooperate, Defect).
///
/// Mutual defection `(1, 1)` is the only equilibrium.
pub fn prisoners_dilemma() -> BimatrixGame {
    build(
        vec![vec![3.0, 0.0], vec![5.0, 1.0]],
        vec![vec![3.0, 5.0], vec![0.0, 1.0]],
    )
}

/// Battle of the Sexes: both prefer to coordinate but disagree on where.
pub fn battle_of_the_sexes() -> BimatrixGame {
    build(
        vec![vec![2.0, 0.0], vec![0.0, 1.0]],
        vec![vec![1.0, 0.0], vec![0.0, 2.0]],
    )
}

/// Rock-Paper-Scissors as a zero-sum game with actions (Rock, Paper, Scissors).
pub fn rock_paper_scissors() -> BimatrixGame {
    let a = vec![
        vec![0.0, -1.0, 1.0],
        vec![1.0, 0.0, -1.0],
        vec![-1.0, 1.0, 0.0],
    ];
    BimatrixGame::zero_sum(a).unwrap_or_else(|e| panic!("invalid built-in game: {}", e))
}

/// Pure coordination on `n` actions: both players get 1 on a match, 0 otherwise.
///
/// # Panics
/// Panics if `n` is zero.
pub fn coordination(n: usize) -> BimatrixGame {
    let identity: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();
    build(identity.clone(), identity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_games_are_square() {
        assert_eq!(matching_pennies().n(), 2);
        assert_eq!(prisoners_dilemma().n(), 2);
        assert_eq!(battle_of_the_sexes().n(), 2);
        assert_eq!(rock_paper_scissors().n(), 3);
        assert_eq!(coordination(5).n(), 5);
    }

    #[test]
    fn test_rock_paper_scissors_is_zero_sum() {
        let game = rock_paper_scissors();
        for i in 0..3 {
            for j in 0..3 {
                let total = game.row_payoffs()[i][j] + game.column_payoffs()[i][j];
                assert_eq!(total, 0.0);
            }
        }
    }
}
