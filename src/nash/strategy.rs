//! Mixed strategies and equilibria.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::nash::game::BimatrixGame;
use crate::nash::support::{Support, SupportPair};

/// A probability distribution over all `n` actions of one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Strategy(Vec<f64>);

impl Strategy {
    /// Wrap raw probabilities without checking them.
    pub fn from_vec(probabilities: Vec<f64>) -> Self {
        Self(probabilities)
    }

    /// `1/n` on every action.
    pub fn uniform(n: usize) -> Self {
        Self(vec![1.0 / n as f64; n])
    }

    /// All weight on action `i`.
    pub fn pure(n: usize, i: usize) -> Self {
        let mut probabilities = vec![0.0; n];
        probabilities[i] = 1.0;
        Self(probabilities)
    }

    /// Scatter `sub` (one weight per support action) into an `n`-vector,
    /// normalized to sum to one. Returns `None` if `sub` sums to zero.
    pub fn from_support(n: usize, support: &Support, sub: &[f64]) -> Option<Self> {
        let total: f64 = sub.iter().sum();
        if !total.is_finite() || total.abs() <= f64::EPSILON {
            return None;
        }
        let mut probabilities = vec![0.0; n];
        for (i, x) in support.iter().zip(sub) {
            probabilities[i] = x / total;
        }
        Some(Self(probabilities))
    }

    /// The probabilities.
    pub fn probabilities(&self) -> &[f64] {
        &self.0
    }

    /// Number of actions played with probability above `threshold`.
    pub fn effective_support(&self, threshold: f64) -> usize {
        self.0.iter().filter(|&&x| x > threshold).count()
    }

    /// Actions played with probability above `threshold`.
    pub fn support(&self, threshold: f64) -> Support {
        Support::new(
            self.0
                .iter()
                .enumerate()
                .filter(|(_, x)| **x > threshold)
                .map(|(i, _)| i)
                .collect(),
        )
    }

    /// All entries at least `-tolerance` and the total within `tolerance` of one.
    pub fn is_probability_vector(&self, tolerance: f64) -> bool {
        let total: f64 = self.0.iter().sum();
        self.0.iter().all(|&x| x >= -tolerance) && (total - 1.0).abs() <= tolerance
    }
}

impl Deref for Strategy {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl fmt::Display for Strategy {
    /// Space separated, four decimal places.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, x) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:.4}", x)?;
        }
        Ok(())
    }
}

/// Expand solved sub-vectors for both players into full strategies.
///
/// Each sub-vector is normalized to sum to one before being scattered into
/// its support positions. Fails if either sums to zero.
pub fn extract_full_strategy(
    n: usize,
    p_sub: &[f64],
    q_sub: &[f64],
    supports: &SupportPair,
) -> Option<(Strategy, Strategy)> {
    let p = Strategy::from_support(n, &supports.row, p_sub)?;
    let q = Strategy::from_support(n, &supports.column, q_sub)?;
    Some((p, q))
}

/// Which stage of the solver produced a strategy pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquilibriumKind {
    /// Verified equilibrium over supports of size two or more.
    Mixed,
    /// Pure strategy equilibrium.
    Pure,
    /// Unverified uniform fallback.
    Uniform,
}

impl fmt::Display for EquilibriumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EquilibriumKind::Mixed => "mixed",
            EquilibriumKind::Pure => "pure",
            EquilibriumKind::Uniform => "uniform",
        };
        f.write_str(name)
    }
}

/// A strategy pair returned by the solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equilibrium {
    /// Row player's strategy.
    pub p: Strategy,
    /// Column player's strategy.
    pub q: Strategy,
    /// Stage that produced it.
    pub kind: EquilibriumKind,
    /// Supports that produced a mixed equilibrium, or the pure cell.
    pub supports: Option<SupportPair>,
}

impl Equilibrium {
    /// Mixed equilibrium found on `supports`.
    pub fn mixed(p: Strategy, q: Strategy, supports: SupportPair) -> Self {
        Self {
            p,
            q,
            kind: EquilibriumKind::Mixed,
            supports: Some(supports),
        }
    }

    /// Pure equilibrium at cell `(i, j)`.
    pub fn pure(n: usize, i: usize, j: usize) -> Self {
        Self {
            p: Strategy::pure(n, i),
            q: Strategy::pure(n, j),
            kind: EquilibriumKind::Pure,
            supports: Some(SupportPair::new(Support::new(vec![i]), Support::new(vec![j]))),
        }
    }

    /// Uniform strategies for both players.
    pub fn uniform(n: usize) -> Self {
        Self {
            p: Strategy::uniform(n),
            q: Strategy::uniform(n),
            kind: EquilibriumKind::Uniform,
            supports: None,
        }
    }

    /// Expected payoff to the row player.
    pub fn row_payoff(&self, game: &BimatrixGame) -> f64 {
        game.row_value(&self.p, &self.q)
    }

    /// Expected payoff to the column player.
    pub fn column_payoff(&self, game: &BimatrixGame) -> f64 {
        game.column_value(&self.p, &self.q)
    }
}
