//! Candidate supports and the per-support indifference systems.
//!
//! A support pair `(S1, S2)` fixes which actions each player mixes over.
//! Given a pair, the opponent's probabilities are pinned down by requiring
//! every action in the player's own support to earn the same payoff, plus the
//! normalization `Σ q = 1`. That is a `(k + 1) × (k + 1)` linear system in
//! the `k` probabilities and the common payoff value.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::nash::game::BimatrixGame;
use crate::nash::linalg::{LinearSolution, LinearSystem};

/// A strictly increasing set of action indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Support(Vec<usize>);

impl Support {
    /// Build a support from arbitrary indices; they are sorted and deduplicated.
    pub fn new(mut indices: Vec<usize>) -> Self {
        indices.sort_unstable();
        indices.dedup();
        Self(indices)
    }

    /// Wrap indices already in strictly increasing order.
    fn from_sorted(indices: Vec<usize>) -> Self {
        debug_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        Self(indices)
    }

    /// The indices, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Number of actions in the support.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the support is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether action `i` is in the support.
    pub fn contains(&self, i: usize) -> bool {
        self.0.binary_search(&i).is_ok()
    }

    /// Iterate over the indices, ascending.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

/// Supports for the row player (`row`, S1) and column player (`column`, S2).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SupportPair {
    /// S1: actions of the row player.
    pub row: Support,
    /// S2: actions of the column player.
    pub column: Support,
}

impl SupportPair {
    /// Pair two supports of equal size.
    pub fn new(row: Support, column: Support) -> Self {
        debug_assert_eq!(row.len(), column.len());
        Self { row, column }
    }

    /// Support size `k`.
    pub fn size(&self) -> usize {
        self.row.len()
    }
}

/// The ordered, lazily generated sequence of candidate support pairs.
///
/// Sizes ascend from `min_size` to `max_size`; within a size, S1 is the outer
/// and S2 the inner loop, each walking `k`-combinations of `0..n` in
/// lexicographic order. The first verified candidate in this order is the
/// one the solver returns, so the order must not change.
///
/// Nothing is materialized: [`SupportPairs::iter`] can be called any number
/// of times and each call restarts the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportPairs {
    n: usize,
    min_size: usize,
    max_size: usize,
}

impl SupportPairs {
    /// Pairs over `n` actions with support sizes in `min_size..=max_size`.
    pub fn new(n: usize, min_size: usize, max_size: usize) -> Self {
        Self {
            n,
            min_size,
            max_size: max_size.min(n),
        }
    }

    /// Support sizes covered, ascending.
    pub fn sizes(&self) -> std::ops::RangeInclusive<usize> {
        self.min_size..=self.max_size
    }

    /// Every candidate pair, in search order.
    pub fn iter(&self) -> impl Iterator<Item = SupportPair> {
        let n = self.n;
        self.sizes().flat_map(move |k| Self::pairs_of_size(n, k))
    }

    /// Candidate pairs with support size `k`, in search order.
    pub fn of_size(&self, k: usize) -> impl Iterator<Item = SupportPair> {
        Self::pairs_of_size(self.n, k)
    }

    /// Number of candidate pairs of size `k` over `n` actions: `C(n, k)²`.
    pub fn count_for_size(n: usize, k: usize) -> u64 {
        let c = binomial(n, k);
        c.saturating_mul(c)
    }

    /// Total number of candidate pairs.
    pub fn total(&self) -> u64 {
        self.sizes()
            .map(|k| Self::count_for_size(self.n, k))
            .fold(0u64, u64::saturating_add)
    }

    fn pairs_of_size(n: usize, k: usize) -> impl Iterator<Item = SupportPair> {
        (0..n).combinations(k).flat_map(move |s1| {
            let row = Support::from_sorted(s1);
            (0..n)
                .combinations(k)
                .map(move |s2| SupportPair::new(row.clone(), Support::from_sorted(s2)))
        })
    }
}

fn binomial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u64 = 1;
    for i in 0..k {
        // Exact at every step: the running product is C(n, i + 1).
        result = result.saturating_mul((n - i) as u64) / (i as u64 + 1);
    }
    result
}

/// A probability vector restricted to a support, plus the common payoff the
/// opponent earns on each action of their own support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportStrategy {
    /// One probability per support action, in support order.
    pub probabilities: Vec<f64>,
    /// Common payoff value of the indifferent actions.
    pub value: f64,
}

/// Outcome of solving one player's indifference system.
#[derive(Debug, Clone, PartialEq)]
pub enum SupportSolution {
    /// The system had a unique solution. Probabilities may still be
    /// negative; that is for the caller to judge.
    Solved(SupportStrategy),
    /// Elimination hit a near-zero pivot.
    Singular,
}

impl SupportSolution {
    /// The solved strategy, or `guess()` if the system was singular.
    pub fn or_else(self, guess: impl FnOnce() -> SupportStrategy) -> SupportStrategy {
        match self {
            SupportSolution::Solved(strategy) => strategy,
            SupportSolution::Singular => guess(),
        }
    }

    /// Whether the system was singular.
    pub fn is_singular(&self) -> bool {
        matches!(self, SupportSolution::Singular)
    }
}

/// Solve for the column player's mix `q` over S2 that makes every row in S1
/// earn the same payoff `u` under `A`.
///
/// Row `t` of the system is `Σ_c A[S1[t]][S2[c]]·q_c − u = 0`; the final row
/// is `Σ_c q_c = 1`.
pub fn solve_for_q(game: &BimatrixGame, pair: &SupportPair, epsilon: f64) -> SupportSolution {
    let a = game.row_payoffs();
    let (s1, s2) = (pair.row.indices(), pair.column.indices());
    solve_indifference(pair.size(), |t, c| a[s1[t]][s2[c]], epsilon)
}

/// Solve for the row player's mix `p` over S1 that makes every column in S2
/// earn the same payoff `v` under `B`.
///
/// Row `t` of the system is `Σ_c B[S1[c]][S2[t]]·p_c − v = 0`; the final row
/// is `Σ_c p_c = 1`.
pub fn solve_for_p(game: &BimatrixGame, pair: &SupportPair, epsilon: f64) -> SupportSolution {
    let b = game.column_payoffs();
    let (s1, s2) = (pair.row.indices(), pair.column.indices());
    solve_indifference(pair.size(), |t, c| b[s1[c]][s2[t]], epsilon)
}

/// Uniform `q` over S2, valued by the first row of S1 alone.
///
/// This is a placeholder for singular systems, not an equilibrium value.
pub fn uniform_guess_for_q(game: &BimatrixGame, pair: &SupportPair) -> SupportStrategy {
    let a = game.row_payoffs();
    let k = pair.size();
    let share = 1.0 / k as f64;
    let first = pair.row.indices()[0];
    SupportStrategy {
        probabilities: vec![share; k],
        value: pair.column.iter().map(|j| a[first][j] * share).sum(),
    }
}

/// Uniform `p` over S1, valued by the first column of S2 alone.
pub fn uniform_guess_for_p(game: &BimatrixGame, pair: &SupportPair) -> SupportStrategy {
    let b = game.column_payoffs();
    let k = pair.size();
    let share = 1.0 / k as f64;
    let first = pair.column.indices()[0];
    SupportStrategy {
        probabilities: vec![share; k],
        value: pair.row.iter().map(|i| b[i][first] * share).sum(),
    }
}

fn solve_indifference(
    k: usize,
    coefficient: impl Fn(usize, usize) -> f64,
    epsilon: f64,
) -> SupportSolution {
    let mut system = LinearSystem::zeros(k + 1);
    for t in 0..k {
        for c in 0..k {
            system.set(t, c, coefficient(t, c));
        }
        system.set(t, k, -1.0);
    }
    for c in 0..k {
        system.set(k, c, 1.0);
    }
    system.set_rhs(k, 1.0);

    match system.solve(epsilon) {
        LinearSolution::Solved(mut x) => {
            let value = x[k];
            x.truncate(k);
            SupportSolution::Solved(SupportStrategy {
                probabilities: x,
                value,
            })
        }
        LinearSolution::Singular { column } => {
            log::trace!("singular support system of size {} at column {}", k, column);
            SupportSolution::Singular
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games;

    fn pair(row: &[usize], column: &[usize]) -> SupportPair {
        SupportPair::new(Support::new(row.to_vec()), Support::new(column.to_vec()))
    }

    #[test]
    fn test_support_normalizes_indices() {
        let support = Support::new(vec![3, 1, 3, 0]);
        assert_eq!(support.indices(), &[0, 1, 3]);
        assert!(support.contains(1));
        assert!(!support.contains(2));
        assert_eq!(support.len(), 3);
    }

    #[test]
    fn test_enumeration_order() {
        let pairs: Vec<(Vec<usize>, Vec<usize>)> = SupportPairs::new(3, 2, 3)
            .iter()
            .map(|p| (p.row.indices().to_vec(), p.column.indices().to_vec()))
            .collect();

        assert_eq!(pairs.len(), 10);
        assert_eq!(pairs[0], (vec![0, 1], vec![0, 1]));
        assert_eq!(pairs[1], (vec![0, 1], vec![0, 2]));
        assert_eq!(pairs[2], (vec![0, 1], vec![1, 2]));
        assert_eq!(pairs[3], (vec![0, 2], vec![0, 1]));
        assert_eq!(pairs[8], (vec![1, 2], vec![1, 2]));
        assert_eq!(pairs[9], (vec![0, 1, 2], vec![0, 1, 2]));
    }

    #[test]
    fn test_enumeration_is_restartable() {
        let pairs = SupportPairs::new(4, 2, 4);
        let first: Vec<SupportPair> = pairs.iter().collect();
        let second: Vec<SupportPair> = pairs.iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len() as u64, pairs.total());
    }

    #[test]
    fn test_counts() {
        assert_eq!(SupportPairs::count_for_size(4, 2), 36);
        assert_eq!(SupportPairs::count_for_size(5, 5), 1);
        assert_eq!(SupportPairs::count_for_size(3, 4), 0);
        assert_eq!(SupportPairs::new(1, 2, 1).total(), 0);
        assert_eq!(SupportPairs::new(1, 2, 1).iter().count(), 0);
        assert_eq!(SupportPairs::new(5, 2, 3).of_size(3).count(), 100);
    }

    #[test]
    fn test_matching_pennies_indifference() {
        let game = games::matching_pennies();
        let pair = pair(&[0, 1], &[0, 1]);

        let SupportSolution::Solved(q) = solve_for_q(&game, &pair, 1e-8) else {
            panic!("expected a solution");
        };
        assert!((q.probabilities[0] - 0.5).abs() < 1e-12);
        assert!((q.probabilities[1] - 0.5).abs() < 1e-12);
        assert!(q.value.abs() < 1e-12);

        let SupportSolution::Solved(p) = solve_for_p(&game, &pair, 1e-8) else {
            panic!("expected a solution");
        };
        assert!((p.probabilities[0] - 0.5).abs() < 1e-12);
        assert!(p.value.abs() < 1e-12);
    }

    #[test]
    fn test_battle_of_the_sexes_mix() {
        // A = [[2,0],[0,1]], B = [[1,0],[0,2]]: q = (1/3, 2/3), p = (2/3, 1/3).
        let game = games::battle_of_the_sexes();
        let pair = pair(&[0, 1], &[0, 1]);

        let q = solve_for_q(&game, &pair, 1e-8).or_else(|| unreachable!());
        assert!((q.probabilities[0] - 1.0 / 3.0).abs() < 1e-9);
        assert!((q.value - 2.0 / 3.0).abs() < 1e-9);

        let p = solve_for_p(&game, &pair, 1e-8).or_else(|| unreachable!());
        assert!((p.probabilities[0] - 2.0 / 3.0).abs() < 1e-9);
        assert!((p.value - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_singular_system_and_guess() {
        // Identical rows make the indifference equations dependent.
        let game = BimatrixGame::new(
            vec![vec![1.0, 2.0], vec![1.0, 2.0]],
            vec![vec![4.0, 0.0], vec![0.0, 4.0]],
        )
        .unwrap();
        let pair = pair(&[0, 1], &[0, 1]);

        let solution = solve_for_q(&game, &pair, 1e-8);
        assert!(solution.is_singular());

        let guess = solution.or_else(|| uniform_guess_for_q(&game, &pair));
        assert_eq!(guess.probabilities, vec![0.5, 0.5]);
        assert!((guess.value - 1.5).abs() < 1e-12);

        let guess = uniform_guess_for_p(&game, &pair);
        assert_eq!(guess.probabilities, vec![0.5, 0.5]);
        assert!((guess.value - 2.0).abs() < 1e-12);
    }
}
