//! Bimatrix game solver binary.
//!
//! Reads `n`, then the n×n matrices A and B, from stdin (or `--input`) and
//! prints one Nash equilibrium as two lines, `p` then `q`.
//!
//! Usage:
//!   cargo run --release --bin solve_bimatrix -- [OPTIONS] < game.txt
//!
//! Logs go to stderr; set `RUST_LOG` or pass `-v` to see them.

use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use bimatrix_solver::io::{read_game, write_equilibrium, EquilibriumReport};
use bimatrix_solver::nash::{NashConfig, NashSolver, SingularFallback, SupportPairs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Two lines of four-decimal probabilities.
    Text,
    /// Pretty JSON report with payoffs and statistics.
    Json,
}

#[derive(Parser)]
#[command(name = "solve_bimatrix")]
#[command(about = "Find a Nash equilibrium of a two-player bimatrix game")]
struct Cli {
    /// Read the game from this file instead of stdin.
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// Also save the JSON report to this file.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Solver configuration JSON file; missing fields take defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Evaluate candidate supports in parallel.
    #[arg(long)]
    parallel: bool,
    /// Discard supports whose linear systems are singular instead of guessing.
    #[arg(long)]
    skip_singular: bool,
    /// Show a progress bar on stderr.
    #[arg(long)]
    progress: bool,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .target(env_logger::Target::Stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => NashConfig::from_json_file(path)?,
        None => NashConfig::default(),
    };
    if cli.parallel {
        config = config.with_parallel(true);
    }
    if cli.skip_singular {
        config = config.with_singular_fallback(SingularFallback::Skip);
    }
    config.validate()?;

    let game = match &cli.input {
        Some(path) => read_game(BufReader::new(File::open(path)?))?,
        None => read_game(io::stdin().lock())?,
    };
    log::info!("read game with {} actions per player", game.n());

    let n = game.n();
    let total = SupportPairs::new(n, config.min_support_size, config.max_support_for(n)).total();
    let mut solver = NashSolver::new(game, config);

    let equilibrium = if cli.progress {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} k={msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
                .progress_chars("#>-"),
        );
        let eq = solver.solve_with_callback(|progress| {
            bar.set_message(progress.support_size.to_string());
            bar.set_position(progress.candidates);
        });
        bar.finish_and_clear();
        eq
    } else {
        solver.solve()
    };

    let report =
        EquilibriumReport::new(solver.game(), &equilibrium).with_stats(solver.stats().clone());
    if let Some(path) = &cli.output {
        report.save_json(path)?;
        log::info!("report saved to {}", path.display());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        Format::Text => write_equilibrium(&mut out, &equilibrium)?,
        Format::Json => writeln!(out, "{}", report.to_json()?)?,
    }
    out.flush()?;
    Ok(())
}
