//! # Bimatrix Solver
//!
//! Computes a Nash equilibrium of a two-player game given its two n×n payoff
//! matrices, by support enumeration.
//!
//! ## Features
//!
//! - **Mixed First**: Searches supports of size two and up before settling
//!   for a pure equilibrium
//! - **Deterministic**: The first equilibrium in a fixed enumeration order is
//!   returned, sequentially or in parallel
//! - **Never Fails**: Falls back to a pure equilibrium, then to uniform play
//! - **Configurable Tolerances**: Pivot, negativity and verification thresholds
//!
//! ## Quick Start
//!
//! ```
//! use bimatrix_solver::games;
//! use bimatrix_solver::nash::{NashConfig, NashSolver};
//!
//! let mut solver = NashSolver::new(games::battle_of_the_sexes(), NashConfig::default());
//! let eq = solver.solve();
//! assert_eq!(eq.p.to_string(), "0.6667 0.3333");
//! assert_eq!(eq.q.to_string(), "0.3333 0.6667");
//! ```
//!
//! ## Modules
//!
//! - [`nash`]: Support enumeration, linear solves and verification
//! - [`io`]: Text input and text/JSON output
//! - [`games`]: Classic games and seeded random games
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                  NashSolver::solve (driver)                   │
//! │        mixed search  →  pure scan  →  uniform fallback        │
//! └───────────────────────────────────────────────────────────────┘
//!                               │
//!            for each (S1, S2) in SupportPairs order
//!                               ▼
//!   ┌────────────────┐   ┌─────────────────┐   ┌────────────────┐
//!   │ solve_for_q/p  │ → │ extract_full_   │ → │ verify         │
//!   │ (Gauss-Jordan) │   │ strategy        │   │ (no deviation) │
//!   └────────────────┘   └─────────────────┘   └────────────────┘
//! ```

#![warn(missing_docs)]

/// Nash equilibrium solver module.
///
/// This is the core module containing the support enumeration.
pub mod nash;

/// Reading games and writing equilibria.
pub mod io;

/// Classic and random games for tests and benchmarks.
pub mod games;

// Re-export commonly used types at crate root for convenience
pub use nash::{BimatrixGame, Equilibrium, EquilibriumKind, NashConfig, NashSolver, Strategy};
