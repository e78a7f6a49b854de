//! Configuration options for the Nash solver.
//!
//! This module exposes the numerical tolerances that govern the
//! precision/robustness trade-off of the support-enumeration search,
//! together with the statistics collected while solving.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::nash::strategy::EquilibriumKind;

/// Default threshold below which a pivot is treated as zero.
pub const DEFAULT_PIVOT_EPSILON: f64 = 1e-8;

/// Default bound below which a solved probability counts as negative.
pub const DEFAULT_NEGATIVITY_EPSILON: f64 = 1e-8;

/// Default absolute tolerance of the equilibrium verifier.
pub const DEFAULT_VERIFY_TOLERANCE: f64 = 1e-6;

/// Default probability a strategy entry must exceed to count as played.
pub const DEFAULT_SUPPORT_THRESHOLD: f64 = 1e-6;

/// What the support solver does when its linear system is singular.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingularFallback {
    /// Substitute a uniform guess over the support and let the verifier
    /// decide. This reproduces the classic behavior of the search.
    #[default]
    UniformGuess,
    /// Discard the candidate support pair outright.
    Skip,
}

/// Configuration for the Nash solver.
///
/// # Example
/// ```
/// use bimatrix_solver::nash::NashConfig;
///
/// let config = NashConfig::default();
/// assert_eq!(config.pivot_epsilon, 1e-8);
/// assert!(!config.parallel);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NashConfig {
    /// Largest pivot magnitude still considered singular during elimination.
    pub pivot_epsilon: f64,

    /// Solved probabilities below `-negativity_epsilon` reject a candidate.
    ///
    /// The same slack is granted to best-response comparisons when scanning
    /// for pure equilibria.
    pub negativity_epsilon: f64,

    /// Absolute tolerance used by the equilibrium verifier.
    pub verify_tolerance: f64,

    /// Probability an entry must exceed to count toward the effective support.
    pub support_threshold: f64,

    /// Smallest support size enumerated.
    pub min_support_size: usize,

    /// Largest support size enumerated. `None` means the number of actions.
    pub max_support_size: Option<usize>,

    /// Behavior when a support system is singular.
    pub singular_fallback: SingularFallback,

    /// Evaluate candidates of one support size in parallel.
    ///
    /// The first candidate in enumeration order still wins, so output is
    /// identical to the sequential search.
    pub parallel: bool,
}

impl Default for NashConfig {
    fn default() -> Self {
        Self {
            pivot_epsilon: DEFAULT_PIVOT_EPSILON,
            negativity_epsilon: DEFAULT_NEGATIVITY_EPSILON,
            verify_tolerance: DEFAULT_VERIFY_TOLERANCE,
            support_threshold: DEFAULT_SUPPORT_THRESHOLD,
            min_support_size: 2,
            max_support_size: None,
            singular_fallback: SingularFallback::UniformGuess,
            parallel: false,
        }
    }
}

impl NashConfig {
    /// Create a new NashConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the singular pivot threshold.
    pub fn with_pivot_epsilon(mut self, epsilon: f64) -> Self {
        self.pivot_epsilon = epsilon;
        self
    }

    /// Builder method: set the negativity bound.
    pub fn with_negativity_epsilon(mut self, epsilon: f64) -> Self {
        self.negativity_epsilon = epsilon;
        self
    }

    /// Builder method: set the verifier tolerance.
    pub fn with_verify_tolerance(mut self, tolerance: f64) -> Self {
        self.verify_tolerance = tolerance;
        self
    }

    /// Builder method: set the effective support threshold.
    pub fn with_support_threshold(mut self, threshold: f64) -> Self {
        self.support_threshold = threshold;
        self
    }

    /// Builder method: restrict the enumerated support sizes.
    pub fn with_support_sizes(mut self, min: usize, max: Option<usize>) -> Self {
        self.min_support_size = min;
        self.max_support_size = max;
        self
    }

    /// Builder method: set the singular system fallback.
    pub fn with_singular_fallback(mut self, fallback: SingularFallback) -> Self {
        self.singular_fallback = fallback;
        self
    }

    /// Builder method: enable parallel candidate evaluation.
    pub fn with_parallel(mut self, enable: bool) -> Self {
        self.parallel = enable;
        self
    }

    /// Largest support size to enumerate for a game with `n` actions.
    pub fn max_support_for(&self, n: usize) -> usize {
        self.max_support_size.map_or(n, |max| max.min(n))
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tolerances = [
            ("pivot_epsilon", self.pivot_epsilon),
            ("negativity_epsilon", self.negativity_epsilon),
            ("verify_tolerance", self.verify_tolerance),
            ("support_threshold", self.support_threshold),
        ];
        for (name, value) in tolerances {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidTolerance(name, value));
            }
        }

        if self.min_support_size < 2 {
            return Err(ConfigError::InvalidSupportBounds {
                min: self.min_support_size,
                max: self.max_support_size,
            });
        }
        if let Some(max) = self.max_support_size {
            if max < self.min_support_size {
                return Err(ConfigError::InvalidSupportBounds {
                    min: self.min_support_size,
                    max: self.max_support_size,
                });
            }
        }

        Ok(())
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A tolerance is not a finite positive number.
    #[error("{0} must be finite and positive, got {1}")]
    InvalidTolerance(&'static str, f64),
    /// Support size bounds are inconsistent.
    #[error("invalid support size bounds: min {min}, max {max:?}")]
    InvalidSupportBounds {
        /// Configured minimum.
        min: usize,
        /// Configured maximum.
        max: Option<usize>,
    },
    /// The configuration file could not be read.
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid JSON for this struct.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Why a candidate support pair was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// A linear system was singular and the fallback skips such pairs.
    Singular,
    /// A solved probability fell below the negativity bound.
    NegativeProbability,
    /// A solved sub-vector summed to zero.
    Degenerate,
    /// Fewer than two actions carry meaningful probability.
    ThinSupport,
    /// The equilibrium conditions do not hold.
    NotEquilibrium,
}

/// Statistics tracked during a solve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolveStats {
    /// Support pairs evaluated.
    pub candidates: u64,

    /// Linear systems that hit a singular pivot.
    pub singular_systems: u64,

    /// Candidates rejected for negative probabilities.
    pub negative: u64,

    /// Candidates rejected for zero-sum sub-vectors.
    pub degenerate: u64,

    /// Candidates rejected for an effective support below two.
    pub thin_support: u64,

    /// Candidates skipped because a system was singular.
    pub skipped_singular: u64,

    /// Candidates that failed verification.
    pub not_equilibrium: u64,

    /// Which stage produced the returned strategies.
    pub kind: Option<EquilibriumKind>,

    /// Total time spent solving (in seconds).
    pub elapsed_seconds: f64,
}

impl SolveStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one rejected candidate.
    pub fn record_rejection(&mut self, reason: Rejection) {
        match reason {
            Rejection::Singular => self.skipped_singular += 1,
            Rejection::NegativeProbability => self.negative += 1,
            Rejection::Degenerate => self.degenerate += 1,
            Rejection::ThinSupport => self.thin_support += 1,
            Rejection::NotEquilibrium => self.not_equilibrium += 1,
        }
    }

    /// Total rejected candidates across all reasons.
    pub fn rejected(&self) -> u64 {
        self.skipped_singular
            + self.negative
            + self.degenerate
            + self.thin_support
            + self.not_equilibrium
    }
}
