//! Seeded random games.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::nash::BimatrixGame;

/// Payoffs are drawn uniformly from `[-PAYOFF_RANGE, PAYOFF_RANGE)`.
pub const PAYOFF_RANGE: f64 = 10.0;

/// A game with `n` actions whose payoffs are drawn from a `StdRng` seeded with `seed`.
///
/// The same `(n, seed)` always yields the same game.
///
/// # Panics
/// Panics if `n` is zero.
pub fn random_game(n: usize, seed: u64) -> BimatrixGame {
    assert!(n > 0, "a game needs at least one action");
    let mut rng = StdRng::seed_from_u64(seed);
    let matrix = |rng: &mut StdRng| -> Vec<Vec<f64>> {
        (0..n)
            .map(|_| (0..n).map(|_| rng.gen_range(-PAYOFF_RANGE..PAYOFF_RANGE)).collect())
            .collect()
    };
    let a = matrix(&mut rng);
    let b = matrix(&mut rng);
    BimatrixGame::new(a, b).unwrap_or_else(|e| panic!("random game is malformed: {}", e))
}
