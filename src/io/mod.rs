//! Reading games and writing equilibria.
//!
//! The text format is the one the command line tool speaks:
//!
//! ```text
//! 2            <- number of actions n
//! 1 -1         <- n rows of A
//! -1 1
//! -1 1         <- n rows of B
//! 1 -1
//! ```
//!
//! and the answer is two lines, `p` then `q`, with four decimals per entry.

pub mod input;
pub mod output;

pub use input::{parse_game, read_game, InputError};
pub use output::{format_strategy, write_equilibrium, EquilibriumReport};
