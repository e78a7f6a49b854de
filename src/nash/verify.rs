//! Equilibrium verification.
//!
//! The support solver and the strategy assembler can both hand back
//! candidates that are numerically off. This is the gate that decides.

use crate::nash::game::BimatrixGame;
use crate::nash::support::{Support, SupportPair};

/// Check that `(p, q)` is a Nash equilibrium on `supports`.
///
/// For the row player, every action in S1 must earn the same payoff against
/// `q` within `tolerance`, and no action outside S1 may beat that payoff by
/// more than `tolerance`. The column player is checked the same way against
/// `p` using `B` and S2.
pub fn verify(
    game: &BimatrixGame,
    p: &[f64],
    q: &[f64],
    supports: &SupportPair,
    tolerance: f64,
) -> bool {
    let n = game.n();
    let row = |i| game.row_action_payoff(i, q);
    let column = |j| game.column_action_payoff(j, p);

    no_profitable_deviation(n, &supports.row, row, tolerance)
        && no_profitable_deviation(n, &supports.column, column, tolerance)
}

fn no_profitable_deviation(
    n: usize,
    support: &Support,
    payoff: impl Fn(usize) -> f64,
    tolerance: f64,
) -> bool {
    let mut actions = support.iter();
    let Some(first) = actions.next() else {
        return false;
    };
    let value = payoff(first);

    // Indifference across the support.
    if actions.any(|i| (payoff(i) - value).abs() > tolerance) {
        return false;
    }

    (0..n)
        .filter(|&i| !support.contains(i))
        .all(|i| payoff(i) <= value + tolerance)
}

/// How much each player could gain by switching to their best pure action.
///
/// Returns `(row_gain, column_gain)`; both are at most zero (up to rounding)
/// exactly when `(p, q)` is an equilibrium.
pub fn deviation_gain(game: &BimatrixGame, p: &[f64], q: &[f64]) -> (f64, f64) {
    let n = game.n();
    let best_row = (0..n)
        .map(|i| game.row_action_payoff(i, q))
        .fold(f64::NEG_INFINITY, f64::max);
    let best_column = (0..n)
        .map(|j| game.column_action_payoff(j, p))
        .fold(f64::NEG_INFINITY, f64::max);

    (
        best_row - game.row_value(p, q),
        best_column - game.column_value(p, q),
    )
}
