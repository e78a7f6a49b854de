//! Support-enumeration Nash solver for bimatrix games.
//!
//! This module computes one Nash equilibrium of a two-player game given its
//! n×n payoff matrices `A` (row player) and `B` (column player).
//!
//! # Overview
//!
//! An equilibrium with supports `(S1, S2)` of equal size `k` makes each player
//! indifferent among the actions in their own support. For a fixed pair of
//! supports that is a linear system, so the search is:
//!
//! 1. For `k = 2..=n`, for each `S1`, for each `S2` (lexicographic order)
//! 2. Solve the indifference systems for `q` (from `A`) and `p` (from `B`)
//! 3. Reject negative, degenerate or near-pure results
//! 4. Verify that no action outside the supports does better
//!
//! The first verified candidate wins. If there is none the solver looks for a
//! pure equilibrium, and as a last resort returns uniform strategies.
//!
//! # Example
//!
//! ```
//! use bimatrix_solver::nash::{BimatrixGame, NashConfig, NashSolver};
//!
//! let game = BimatrixGame::new(
//!     vec![vec![1.0, -1.0], vec![-1.0, 1.0]],
//!     vec![vec![-1.0, 1.0], vec![1.0, -1.0]],
//! )
//! .unwrap();
//! let mut solver = NashSolver::new(game, NashConfig::default());
//! let eq = solver.solve();
//! println!("p = {}, q = {}", eq.p, eq.q);
//! ```
//!
//! # Cost
//!
//! The search visits `Σ_k C(n, k)²` support pairs, each needing two
//! `O(k³)` solves, so it is exponential in `n`. Candidates of one size can be
//! evaluated in parallel ([`NashConfig::parallel`]) without changing which
//! equilibrium is returned.

pub mod config;
pub mod game;
pub mod linalg;
pub mod solver;
pub mod strategy;
pub mod support;
pub mod verify;

pub use config::{
    ConfigError, NashConfig, Rejection, SingularFallback, SolveStats, DEFAULT_NEGATIVITY_EPSILON,
    DEFAULT_PIVOT_EPSILON, DEFAULT_SUPPORT_THRESHOLD, DEFAULT_VERIFY_TOLERANCE,
};
pub use game::{BimatrixGame, GameError};
pub use linalg::{LinearSolution, LinearSystem};
pub use solver::{find_mixed_equilibrium, find_pure_equilibrium, solve, NashSolver, SearchProgress};
pub use strategy::{extract_full_strategy, Equilibrium, EquilibriumKind, Strategy};
pub use support::{Support, SupportPair, SupportPairs, SupportSolution, SupportStrategy};
pub use verify::{deviation_gain, verify};
