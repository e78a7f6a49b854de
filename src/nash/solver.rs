//! Support-enumeration Nash solver.
//!
//! The solver walks candidate support pairs in a fixed order (ascending size,
//! then S1, then S2), solves the indifference systems for each, and returns the
//! first candidate that survives verification. If no mixed equilibrium is
//! found it scans for a pure one, and failing that returns uniform strategies.

use std::time::Instant;

use rayon::prelude::*;

use crate::nash::config::{NashConfig, Rejection, SingularFallback, SolveStats};
use crate::nash::game::BimatrixGame;
use crate::nash::strategy::{extract_full_strategy, Equilibrium, Strategy};
use crate::nash::support::{
    solve_for_p, solve_for_q, uniform_guess_for_p, uniform_guess_for_q, SupportPair, SupportPairs,
};
use crate::nash::verify::verify;

/// Candidates handed to rayon at a time in parallel mode.
const PARALLEL_CHUNK: usize = 1024;

/// Progress report emitted once per completed support size.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchProgress {
    /// Support size just finished.
    pub support_size: usize,
    /// Largest support size the search will reach.
    pub max_support_size: usize,
    /// Candidates evaluated at this size.
    pub size_candidates: u64,
    /// Candidates evaluated so far in total.
    pub candidates: u64,
    /// Elapsed time in seconds.
    pub elapsed_seconds: f64,
}

/// The Nash solver for one game.
///
/// # Example
/// ```
/// use bimatrix_solver::games;
/// use bimatrix_solver::nash::{EquilibriumKind, NashConfig, NashSolver};
///
/// let mut solver = NashSolver::new(games::matching_pennies(), NashConfig::default());
/// let eq = solver.solve();
/// assert_eq!(eq.kind, EquilibriumKind::Mixed);
/// assert!((eq.p[0] - 0.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct NashSolver {
    game: BimatrixGame,
    config: NashConfig,
    stats: SolveStats,
}

/// What happened to a single candidate.
struct Evaluation {
    singular_systems: u64,
    outcome: Result<(Strategy, Strategy), Rejection>,
}

impl NashSolver {
    /// Create a solver for `game`.
    pub fn new(game: BimatrixGame, config: NashConfig) -> Self {
        Self {
            game,
            config,
            stats: SolveStats::new(),
        }
    }

    /// The game being solved.
    pub fn game(&self) -> &BimatrixGame {
        &self.game
    }

    /// The solver configuration.
    pub fn config(&self) -> &NashConfig {
        &self.config
    }

    /// Statistics accumulated since construction or the last [`reset`](Self::reset).
    pub fn stats(&self) -> &SolveStats {
        &self.stats
    }

    /// Clear accumulated statistics.
    pub fn reset(&mut self) {
        self.stats = SolveStats::new();
    }

    /// Find an equilibrium: mixed first, then pure, then the uniform fallback.
    ///
    /// Never fails. The uniform fallback is not verified.
    pub fn solve(&mut self) -> Equilibrium {
        self.solve_with_callback(|_| {})
    }

    /// [`solve`](Self::solve) with a progress callback per support size.
    pub fn solve_with_callback<F>(&mut self, callback: F) -> Equilibrium
    where
        F: FnMut(&SearchProgress),
    {
        let start_time = Instant::now();
        let n = self.game.n();

        let equilibrium = self
            .find_mixed_equilibrium_with_callback(callback)
            .or_else(|| self.find_pure_equilibrium())
            .unwrap_or_else(|| {
                log::warn!("no equilibrium found, falling back to uniform strategies");
                Equilibrium::uniform(n)
            });

        self.stats.kind = Some(equilibrium.kind);
        self.stats.elapsed_seconds = start_time.elapsed().as_secs_f64();
        log::info!(
            "{} equilibrium after {} candidates ({} rejected) in {:.3}s",
            equilibrium.kind,
            self.stats.candidates,
            self.stats.rejected(),
            self.stats.elapsed_seconds
        );
        equilibrium
    }

    /// Search for an equilibrium over supports of size two or more.
    pub fn find_mixed_equilibrium(&mut self) -> Option<Equilibrium> {
        self.find_mixed_equilibrium_with_callback(|_| {})
    }

    /// [`find_mixed_equilibrium`](Self::find_mixed_equilibrium) with a
    /// progress callback after each support size.
    pub fn find_mixed_equilibrium_with_callback<F>(
        &mut self,
        mut callback: F,
    ) -> Option<Equilibrium>
    where
        F: FnMut(&SearchProgress),
    {
        let start_time = Instant::now();
        let n = self.game.n();
        // Supports below two are never mixed.
        let pairs = SupportPairs::new(
            n,
            self.config.min_support_size.max(2),
            self.config.max_support_for(n),
        );

        for k in pairs.sizes() {
            let before = self.stats.candidates;
            let found = if self.config.parallel {
                self.search_size_parallel(pairs.of_size(k))
            } else {
                self.search_size(pairs.of_size(k))
            };

            log::debug!(
                "support size {}: {} candidates, {} rejected so far",
                k,
                self.stats.candidates - before,
                self.stats.rejected()
            );
            callback(&SearchProgress {
                support_size: k,
                max_support_size: *pairs.sizes().end(),
                size_candidates: self.stats.candidates - before,
                candidates: self.stats.candidates,
                elapsed_seconds: start_time.elapsed().as_secs_f64(),
            });

            if found.is_some() {
                return found;
            }
        }
        None
    }

    /// Scan cells in row-major order for a pure equilibrium.
    ///
    /// Cell `(i, j)` qualifies when `A[i][j]` is a best response in column `j`
    /// and `B[i][j]` is a best response in row `i`, each with
    /// `negativity_epsilon` slack.
    pub fn find_pure_equilibrium(&self) -> Option<Equilibrium> {
        let n = self.game.n();
        let a = self.game.row_payoffs();
        let b = self.game.column_payoffs();
        let eps = self.config.negativity_epsilon;

        for i in 0..n {
            for j in 0..n {
                let row_best = (0..n).all(|ii| a[i][j] >= a[ii][j] - eps);
                let column_best = (0..n).all(|jj| b[i][j] >= b[i][jj] - eps);
                if row_best && column_best {
                    log::debug!("pure equilibrium at ({}, {})", i, j);
                    return Some(Equilibrium::pure(n, i, j));
                }
            }
        }
        None
    }

    fn search_size(&mut self, pairs: impl Iterator<Item = SupportPair>) -> Option<Equilibrium> {
        for pair in pairs {
            let evaluation = evaluate(&self.game, &self.config, &pair);
            if let Some(eq) = self.record(evaluation, pair) {
                return Some(eq);
            }
        }
        None
    }

    /// Evaluate chunks concurrently, then consume the results in order so the
    /// winner and the statistics match the sequential search exactly.
    fn search_size_parallel(
        &mut self,
        mut pairs: impl Iterator<Item = SupportPair>,
    ) -> Option<Equilibrium> {
        loop {
            let chunk: Vec<SupportPair> = pairs.by_ref().take(PARALLEL_CHUNK).collect();
            if chunk.is_empty() {
                return None;
            }

            let (game, config) = (&self.game, &self.config);
            let evaluations: Vec<Evaluation> = chunk
                .par_iter()
                .map(|pair| evaluate(game, config, pair))
                .collect();

            for (evaluation, pair) in evaluations.into_iter().zip(chunk) {
                if let Some(eq) = self.record(evaluation, pair) {
                    return Some(eq);
                }
            }
        }
    }

    fn record(&mut self, evaluation: Evaluation, pair: SupportPair) -> Option<Equilibrium> {
        self.stats.candidates += 1;
        self.stats.singular_systems += evaluation.singular_systems;
        match evaluation.outcome {
            Ok((p, q)) => {
                log::debug!(
                    "mixed equilibrium on supports {:?} x {:?}",
                    pair.row.indices(),
                    pair.column.indices()
                );
                Some(Equilibrium::mixed(p, q, pair))
            }
            Err(reason) => {
                log::trace!(
                    "rejected {:?} x {:?}: {:?}",
                    pair.row.indices(),
                    pair.column.indices(),
                    reason
                );
                self.stats.record_rejection(reason);
                None
            }
        }
    }
}

fn evaluate(game: &BimatrixGame, config: &NashConfig, pair: &SupportPair) -> Evaluation {
    let q_solution = solve_for_q(game, pair, config.pivot_epsilon);
    let p_solution = solve_for_p(game, pair, config.pivot_epsilon);
    let singular_systems = q_solution.is_singular() as u64 + p_solution.is_singular() as u64;

    let outcome = if singular_systems > 0 && config.singular_fallback == SingularFallback::Skip {
        Err(Rejection::Singular)
    } else {
        let q_sub = q_solution.or_else(|| uniform_guess_for_q(game, pair));
        let p_sub = p_solution.or_else(|| uniform_guess_for_p(game, pair));
        assess(game, config, pair, &p_sub.probabilities, &q_sub.probabilities)
    };

    Evaluation {
        singular_systems,
        outcome,
    }
}

/// Turn solved sub-vectors into full strategies and accept or reject them.
fn assess(
    game: &BimatrixGame,
    config: &NashConfig,
    pair: &SupportPair,
    p_sub: &[f64],
    q_sub: &[f64],
) -> Result<(Strategy, Strategy), Rejection> {
    let bound = -config.negativity_epsilon;
    if p_sub.iter().chain(q_sub).any(|&x| x < bound) {
        return Err(Rejection::NegativeProbability);
    }

    let (p, q) =
        extract_full_strategy(game.n(), p_sub, q_sub, pair).ok_or(Rejection::Degenerate)?;

    if p.effective_support(config.support_threshold) < 2
        || q.effective_support(config.support_threshold) < 2
    {
        return Err(Rejection::ThinSupport);
    }

    if !verify(game, &p, &q, pair, config.verify_tolerance) {
        return Err(Rejection::NotEquilibrium);
    }
    Ok((p, q))
}

/// Search for a mixed equilibrium with the default configuration.
pub fn find_mixed_equilibrium(game: &BimatrixGame) -> Option<Equilibrium> {
    NashSolver::new(game.clone(), NashConfig::default()).find_mixed_equilibrium()
}

/// Scan for a pure equilibrium with the default configuration.
pub fn find_pure_equilibrium(game: &BimatrixGame) -> Option<Equilibrium> {
    NashSolver::new(game.clone(), NashConfig::default()).find_pure_equilibrium()
}

/// Solve with the default configuration: mixed, else pure, else uniform.
pub fn solve(game: &BimatrixGame) -> Equilibrium {
    NashSolver::new(game.clone(), NashConfig::default()).solve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games;
    use crate::nash::strategy::EquilibriumKind;
    use crate::nash::support::Support;
    use crate::nash::verify::deviation_gain;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_matching_pennies_mixed() {
        let eq = find_mixed_equilibrium(&games::matching_pennies()).unwrap();
        assert_close(&eq.p, &[0.5, 0.5]);
        assert_close(&eq.q, &[0.5, 0.5]);
        assert_eq!(eq.kind, EquilibriumKind::Mixed);
    }

    #[test]
    fn test_matching_pennies_has_no_pure() {
        assert!(find_pure_equilibrium(&games::matching_pennies()).is_none());
    }

    #[test]
    fn test_prisoners_dilemma() {
        let game = games::prisoners_dilemma();
        assert!(find_mixed_equilibrium(&game).is_none());

        let eq = find_pure_equilibrium(&game).unwrap();
        assert_eq!(eq.p.probabilities(), &[0.0, 1.0]);
        assert_eq!(eq.q.probabilities(), &[0.0, 1.0]);

        let eq = solve(&game);
        assert_eq!(eq.kind, EquilibriumKind::Pure);
        assert_eq!(eq.p.probabilities(), &[0.0, 1.0]);
    }

    #[test]
    fn test_pure_scan_is_row_major() {
        // Both diagonal cells are equilibria; (0, 0) comes first.
        let eq = find_pure_equilibrium(&games::coordination(3)).unwrap();
        assert_eq!(eq.p.probabilities(), &[1.0, 0.0, 0.0]);
        assert_eq!(eq.q.probabilities(), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_mixed_preferred_over_pure() {
        // Battle of the sexes has two pure equilibria and one mixed one.
        let eq = solve(&games::battle_of_the_sexes());
        assert_eq!(eq.kind, EquilibriumKind::Mixed);
        assert_close(&eq.p, &[2.0 / 3.0, 1.0 / 3.0]);
        assert_close(&eq.q, &[1.0 / 3.0, 2.0 / 3.0]);
    }

    #[test]
    fn test_rock_paper_scissors_full_support() {
        let eq = solve(&games::rock_paper_scissors());
        assert_eq!(eq.kind, EquilibriumKind::Mixed);
        assert_close(&eq.p, &[1.0 / 3.0; 3]);
        assert_close(&eq.q, &[1.0 / 3.0; 3]);
        assert_eq!(eq.supports.unwrap().size(), 3);
    }

    #[test]
    fn test_smallest_support_found_first() {
        // Coordination on 3 actions: the first size-2 pair (0,1)x(0,1) verifies.
        let eq = solve(&games::coordination(3));
        assert_eq!(eq.kind, EquilibriumKind::Mixed);
        assert_close(&eq.p, &[0.5, 0.5, 0.0]);
        assert_close(&eq.q, &[0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_single_action_game() {
        let game = BimatrixGame::new(vec![vec![2.5]], vec![vec![-1.0]]).unwrap();
        let eq = solve(&game);
        assert_eq!(eq.kind, EquilibriumKind::Pure);
        assert_eq!(eq.p.probabilities(), &[1.0]);
        assert_eq!(eq.q.probabilities(), &[1.0]);
    }

    #[test]
    fn test_uniform_fallback() {
        // Restricting the search to sizes that do not exist, on a game with
        // no pure equilibrium, leaves only the uniform fallback.
        let config = NashConfig::new().with_support_sizes(3, None);
        let mut solver = NashSolver::new(games::matching_pennies(), config);
        let eq = solver.solve();
        assert_eq!(eq.kind, EquilibriumKind::Uniform);
        assert_eq!(eq.p.probabilities(), &[0.5, 0.5]);
        assert_eq!(solver.stats().candidates, 0);
        assert_eq!(solver.stats().kind, Some(EquilibriumKind::Uniform));
    }

    #[test]
    fn test_singular_fallback_modes() {
        // Identical payoff rows make every size-2 system for q singular.
        let game = BimatrixGame::new(
            vec![vec![1.0, 1.0], vec![1.0, 1.0]],
            vec![vec![1.0, 1.0], vec![1.0, 1.0]],
        )
        .unwrap();

        let mut guess = NashSolver::new(game.clone(), NashConfig::default());
        let eq = guess.find_mixed_equilibrium().unwrap();
        assert_close(&eq.p, &[0.5, 0.5]);
        assert!(guess.stats().singular_systems > 0);

        let config = NashConfig::new().with_singular_fallback(SingularFallback::Skip);
        let mut skip = NashSolver::new(game, config);
        assert!(skip.find_mixed_equilibrium().is_none());
        assert_eq!(skip.stats().skipped_singular, 1);

        let eq = skip.solve();
        assert_eq!(eq.kind, EquilibriumKind::Pure);
    }

    #[test]
    fn test_near_pure_mix_is_thin_support() {
        // On (0,1)x(0,1) the row indifference forces q = (1, 0), which is
        // really the pure cell (0, 0).
        let game = BimatrixGame::new(
            vec![vec![1.0, 0.0], vec![1.0, 2.0]],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        )
        .unwrap();
        let mut solver = NashSolver::new(game, NashConfig::default());
        let eq = solver.solve();

        assert_eq!(eq.kind, EquilibriumKind::Pure);
        assert_eq!(eq.p.probabilities(), &[1.0, 0.0]);
        assert_eq!(eq.q.probabilities(), &[1.0, 0.0]);
        assert_eq!(solver.stats().candidates, 1);
        assert_eq!(solver.stats().thin_support, 1);
    }

    #[test]
    fn test_negativity_bound() {
        // Every profile is an equilibrium of the all-zero game, so only the
        // sign check can reject.
        let zeros = vec![vec![0.0; 3]; 3];
        let game = BimatrixGame::new(zeros.clone(), zeros).unwrap();
        let config = NashConfig::default();
        let full = Support::new(vec![0, 1, 2]);
        let pair = SupportPair::new(full.clone(), full);
        let q_sub = [1.0 / 3.0; 3];

        let (p, _) = assess(&game, &config, &pair, &[0.5, 0.5, -5e-9], &q_sub).unwrap();
        assert!(p[2] < 0.0);

        assert_eq!(
            assess(&game, &config, &pair, &[0.5, 0.5, -2e-8], &q_sub),
            Err(Rejection::NegativeProbability)
        );
        assert_eq!(
            assess(&game, &config, &pair, &q_sub, &[0.5, -2e-8, 0.5]),
            Err(Rejection::NegativeProbability)
        );
    }

    #[test]
    fn test_pure_scan_slack() {
        // A[0][0] sits 5e-9 below the column maximum and still counts as a
        // best response; without slack the scan would move on to (1, 0).
        let game = BimatrixGame::new(
            vec![vec![1.0 - 5e-9, 0.0], vec![1.0, 0.0]],
            vec![vec![1.0, 0.0], vec![0.0, 0.0]],
        )
        .unwrap();
        let eq = find_pure_equilibrium(&game).unwrap();
        assert_eq!(eq.p.probabilities(), &[1.0, 0.0]);
        assert_eq!(eq.q.probabilities(), &[1.0, 0.0]);

        let gap = BimatrixGame::new(
            vec![vec![1.0 - 5e-8, 0.0], vec![1.0, 0.0]],
            vec![vec![1.0, 0.0], vec![0.0, 0.0]],
        )
        .unwrap();
        let eq = find_pure_equilibrium(&gap).unwrap();
        assert_eq!(eq.p.probabilities(), &[0.0, 1.0]);
        assert_eq!(eq.q.probabilities(), &[1.0, 0.0]);
    }

    #[test]
    fn test_stats_account_for_every_candidate() {
        let mut solver = NashSolver::new(games::random_game(4, 11), NashConfig::default());
        let eq = solver.solve();
        let stats = solver.stats();
        let accepted = (eq.kind == EquilibriumKind::Mixed) as u64;
        assert_eq!(stats.candidates, stats.rejected() + accepted);
    }

    #[test]
    fn test_progress_callback() {
        let mut sizes = Vec::new();
        let mut solver = NashSolver::new(games::rock_paper_scissors(), NashConfig::default());
        solver.solve_with_callback(|progress| {
            sizes.push((progress.support_size, progress.size_candidates))
        });
        assert_eq!(sizes, vec![(2, 9), (3, 1)]);
    }

    #[test]
    fn test_deterministic() {
        for seed in 0..10 {
            let game = games::random_game(4, seed);
            let first = solve(&game);
            let second = solve(&game);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        for seed in 0..10 {
            let game = games::random_game(5, seed);
            let mut sequential = NashSolver::new(game.clone(), NashConfig::default());
            let mut parallel = NashSolver::new(game, NashConfig::default().with_parallel(true));
            assert_eq!(sequential.solve(), parallel.solve());

            let mut a = sequential.stats().clone();
            let mut b = parallel.stats().clone();
            a.elapsed_seconds = 0.0;
            b.elapsed_seconds = 0.0;
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_random_games_return_valid_strategies() {
        for seed in 0..25 {
            let n = 2 + (seed as usize % 4);
            let game = games::random_game(n, seed);
            let eq = solve(&game);

            assert!(eq.p.is_probability_vector(1e-6), "seed {}: {:?}", seed, eq.p);
            assert!(eq.q.is_probability_vector(1e-6), "seed {}: {:?}", seed, eq.q);
            assert!(eq.p.iter().chain(eq.q.iter()).all(|&x| x >= -1e-7));

            if eq.kind != EquilibriumKind::Uniform {
                let (row, column) = deviation_gain(&game, &eq.p, &eq.q);
                assert!(row <= 1e-5, "seed {}: row gain {}", seed, row);
                assert!(column <= 1e-5, "seed {}: column gain {}", seed, column);
            }
        }
    }
}
