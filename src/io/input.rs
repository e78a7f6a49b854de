//! Parsing games from text.

use std::io::{self, BufRead};

use crate::nash::{BimatrixGame, GameError};

/// Errors that can occur while reading a game.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The underlying reader failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// Input ended early.
    #[error("unexpected end of input, expected {0}")]
    UnexpectedEof(String),
    /// The first line is not a positive integer.
    #[error("line {line}: invalid number of actions {text:?}")]
    InvalidSize {
        /// 1-based line number.
        line: usize,
        /// Offending text.
        text: String,
    },
    /// A payoff could not be parsed.
    #[error("line {line}: invalid payoff {token:?}")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },
    /// A matrix row has the wrong number of entries.
    #[error("line {line}: expected {expected} payoffs, found {actual}")]
    RowLength {
        /// 1-based line number.
        line: usize,
        /// Entries required.
        expected: usize,
        /// Entries found.
        actual: usize,
    },
    /// The matrices were read but do not form a valid game.
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Non-blank lines with their 1-based line numbers.
struct Lines<R> {
    inner: std::iter::Enumerate<io::Lines<R>>,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Self {
            inner: reader.lines().enumerate(),
        }
    }

    fn next_line(
        &mut self,
        expected: impl FnOnce() -> String,
    ) -> Result<(usize, String), InputError> {
        for (index, line) in self.inner.by_ref() {
            let line = line?;
            if !line.trim().is_empty() {
                return Ok((index + 1, line));
            }
        }
        Err(InputError::UnexpectedEof(expected()))
    }

    fn matrix(&mut self, name: char, n: usize) -> Result<Vec<Vec<f64>>, InputError> {
        (0..n)
            .map(|row| {
                let (line, text) =
                    self.next_line(|| format!("row {} of matrix {}", row + 1, name))?;
                parse_row(line, &text, n)
            })
            .collect()
    }
}

fn parse_row(line: usize, text: &str, n: usize) -> Result<Vec<f64>, InputError> {
    let row = text
        .split_whitespace()
        .map(|token| {
            token.parse::<f64>().map_err(|_| InputError::InvalidNumber {
                line,
                token: token.to_string(),
            })
        })
        .collect::<Result<Vec<f64>, InputError>>()?;

    if row.len() != n {
        return Err(InputError::RowLength {
            line,
            expected: n,
            actual: row.len(),
        });
    }
    Ok(row)
}

/// Read `n`, then `n` rows of `A`, then `n` rows of `B`. Blank lines are skipped.
pub fn read_game<R: BufRead>(reader: R) -> Result<BimatrixGame, InputError> {
    let mut lines = Lines::new(reader);

    let (line, text) = lines.next_line(|| "the number of actions".to_string())?;
    let n = match text.trim().parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => {
            return Err(InputError::InvalidSize {
                line,
                text: text.trim().to_string(),
            })
        }
    };

    let a = lines.matrix('A', n)?;
    let b = lines.matrix('B', n)?;
    Ok(BimatrixGame::new(a, b)?)
}

/// Parse a game from a string; see [`read_game`].
pub fn parse_game(text: &str) -> Result<BimatrixGame, InputError> {
    read_game(text.as_bytes())
}
