//! Equilibrium output and export utilities.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::nash::{BimatrixGame, Equilibrium, EquilibriumKind, SolveStats, SupportPair};

/// Render probabilities with four decimals, separated by single spaces.
pub fn format_strategy(probabilities: &[f64]) -> String {
    probabilities
        .iter()
        .map(|x| format!("{:.4}", x))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write `p` and `q` on two lines.
pub fn write_equilibrium<W: Write>(mut writer: W, equilibrium: &Equilibrium) -> io::Result<()> {
    writeln!(writer, "{}", format_strategy(&equilibrium.p))?;
    writeln!(writer, "{}", format_strategy(&equilibrium.q))
}

/// Machine-readable solve result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumReport {
    /// Number of actions per player.
    pub n: usize,
    /// Stage that produced the strategies.
    pub kind: EquilibriumKind,
    /// Row player's strategy.
    pub p: Vec<f64>,
    /// Column player's strategy.
    pub q: Vec<f64>,
    /// Expected payoff to the row player.
    pub row_payoff: f64,
    /// Expected payoff to the column player.
    pub column_payoff: f64,
    /// Supports of the equilibrium, if known.
    pub supports: Option<SupportPair>,
    /// Solver statistics, if collected.
    pub stats: Option<SolveStats>,
}

impl EquilibriumReport {
    /// Build a report for `equilibrium` in `game`.
    pub fn new(game: &BimatrixGame, equilibrium: &Equilibrium) -> Self {
        Self {
            n: game.n(),
            kind: equilibrium.kind,
            p: equilibrium.p.to_vec(),
            q: equilibrium.q.to_vec(),
            row_payoff: equilibrium.row_payoff(game),
            column_payoff: equilibrium.column_payoff(game),
            supports: equilibrium.supports.clone(),
            stats: None,
        }
    }

    /// Attach solver statistics.
    pub fn with_stats(mut self, stats: SolveStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Save to JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let json = self.to_json()?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())
    }
}
