#![allow(clippy::cast_precision_loss)]

use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tikv_jemalloc_ctl::{epoch, stats};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use zebra_solver::zebra::engine::{EngineConfig, PropagationEngine, PropagationStats};
use zebra_solver::zebra::generator::{GeneratorConfig, generate};
use zebra_solver::zebra::grid::{Entities, Grid};
use zebra_solver::zebra::puzzle::parse_file;

/// Defines the command-line interface for the zebra solver application.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "zebra_solver",
    version,
    about = "A constraint-propagation solver for logic grid puzzles",
    args_conflicts_with_subcommands = true
)]
pub(crate) struct Cli {
    /// An optional path. If provided without a subcommand it is solved as a
    /// `.zebra` puzzle file, or, for a directory, every `.zebra` file below it.
    pub path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `file`, `random`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands for the zebra solver.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a puzzle file.
    File {
        /// Path to the `.zebra` file.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate a random consistent puzzle and propagate its clues.
    Random {
        /// Number of categories.
        #[arg(long, default_value_t = 4)]
        categories: usize,

        /// Attributes per category.
        #[arg(long, default_value_t = 5)]
        attributes: usize,

        /// Number of clues to sample from the hidden solution.
        #[arg(long, default_value_t = 20)]
        clues: usize,

        /// Chance that a sampled clue is a link rather than an exclusion.
        #[arg(long, default_value_t = 0.3)]
        link_probability: f64,

        /// Seed for the generator. A random seed is drawn if omitted.
        #[arg(long)]
        seed: Option<u64>,

        /// Write the generated puzzle to this path.
        #[arg(long)]
        export: Option<PathBuf>,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct CommonOptions {
    /// Enable debug output: every deduction is logged. `RUST_LOG` takes precedence.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Enable printing of propagation statistics after solving.
    #[arg(short, long, default_value_t = false)]
    pub(crate) stats: bool,

    /// Print the association grid after propagation.
    #[arg(short = 'g', long, default_value_t = false)]
    pub(crate) print_grid: bool,

    /// Stop after this many propagation passes.
    #[arg(long)]
    pub(crate) max_passes: Option<usize>,
}

impl CommonOptions {
    pub(crate) const fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_passes: self.max_passes,
        }
    }
}

/// Installs the `tracing` subscriber on stderr.
///
/// The filter comes from `RUST_LOG` when set, otherwise `debug` or `warn`
/// depending on `--debug`.
pub(crate) fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Writes completions for `shell` to stdout.
pub(crate) fn print_completions(shell: clap_complete::Shell) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
}

/// Solves a single file, or every `.zebra` file under a directory.
///
/// # Errors
///
/// If the path does not exist, or a puzzle cannot be read.
pub(crate) fn solve_path(path: &Path, common: &CommonOptions) -> Result<(), String> {
    if path.is_dir() {
        solve_dir(path, common).map(|_| ())
    } else {
        solve_file(path, common).map(|_| ())
    }
}

/// How a single puzzle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Solved,
    Unsolved,
    Inconsistent,
}

/// Solves every `.zebra` file found below `path`, in file name order.
///
/// Contradictions in individual puzzles are reported and skipped; read and
/// parse errors abort the run.
///
/// # Errors
///
/// If a puzzle file cannot be read or parsed.
pub(crate) fn solve_dir(path: &Path, common: &CommonOptions) -> Result<Vec<Outcome>, String> {
    let mut outcomes = Vec::new();
    for entry in walkdir::WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }
        if file_path.extension().is_none_or(|ext| ext != "zebra") {
            info!(path = %file_path.display(), "skipping non-puzzle file");
            continue;
        }

        outcomes.push(solve_file(file_path, common)?);
    }

    let count = |outcome: Outcome| outcomes.iter().filter(|&&o| o == outcome).count();
    println!(
        "\nPuzzles: {} solved, {} unsolved, {} inconsistent",
        count(Outcome::Solved),
        count(Outcome::Unsolved),
        count(Outcome::Inconsistent)
    );
    Ok(outcomes)
}

/// Parses a puzzle file, propagates it and reports the result.
///
/// Clues that contradict each other are reported as an inconsistent puzzle.
///
/// # Errors
///
/// If the file does not exist, cannot be parsed, or a clue names an unknown
/// attribute or pairs an attribute with itself.
pub(crate) fn solve_file(path: &Path, common: &CommonOptions) -> Result<Outcome, String> {
    if !path.exists() {
        return Err(format!("Puzzle file does not exist: {}", path.display()));
    }

    if !path.is_file() {
        return Err(format!("Provided path is not a file: {}", path.display()));
    }

    println!("Solving: {}", path.display());

    let time = std::time::Instant::now();
    let puzzle =
        parse_file(path).map_err(|e| format!("Error parsing {}: {e}", path.display()))?;
    let engine = match puzzle.into_engine(common.engine_config()) {
        Ok(engine) => engine,
        Err(e) if e.is_contradiction() => {
            warn!(path = %path.display(), error = %e, "clues are inconsistent");
            println!("\nINCONSISTENT: {e}");
            return Ok(Outcome::Inconsistent);
        }
        Err(e) => return Err(format!("Invalid clues in {}: {e}", path.display())),
    };
    let parse_time = time.elapsed();

    Ok(solve_and_report(engine, common, parse_time))
}

/// Generates a puzzle, optionally exports it, then propagates and reports.
///
/// # Errors
///
/// If the export cannot be written or the generated shape is invalid.
pub(crate) fn solve_random(
    config: GeneratorConfig,
    export: Option<&Path>,
    common: &CommonOptions,
) -> Result<(), String> {
    println!(
        "Generating: {} categories x {} attributes, {} clues, seed {}",
        config.categories, config.per_category, config.clues, config.seed
    );

    let time = std::time::Instant::now();
    let generated = generate(&config);

    if let Some(export) = export {
        std::fs::write(export, generated.puzzle.to_string())
            .map_err(|e| format!("Unable to write {}: {e}", export.display()))?;
        println!("Puzzle written to: {}", export.display());
    }

    let engine = generated
        .puzzle
        .into_engine(common.engine_config())
        .map_err(|e| format!("Invalid generated puzzle: {e}"))?;
    let parse_time = time.elapsed();

    solve_and_report(engine, common, parse_time);
    Ok(())
}

/// Allocated and resident memory in MiB, if jemalloc can report them.
fn memory_usage() -> Option<(f64, f64)> {
    epoch::advance().ok()?;
    let allocated = stats::allocated::mib().ok()?.read().ok()?;
    let resident = stats::resident::mib().ok()?.read().ok()?;
    Some((
        allocated as f64 / (1024.0 * 1024.0),
        resident as f64 / (1024.0 * 1024.0),
    ))
}

/// Runs propagation to the fixed point and prints the outcome.
///
/// A contradiction is reported as an inconsistent puzzle rather than an
/// error, so that directory runs carry on with the next file.
pub(crate) fn solve_and_report(
    mut engine: PropagationEngine,
    common: &CommonOptions,
    parse_time: Duration,
) -> Outcome {
    if common.debug {
        let catalog = engine.store().catalog();
        println!("Categories: {}", catalog.num_categories());
        println!("Attributes per category: {}", catalog.per_category());
        println!("Clues: {}", engine.stats().clues);
    }

    let time = std::time::Instant::now();
    let result = engine.iterate();
    let elapsed = time.elapsed();

    if common.print_grid {
        println!("{}", Grid(engine.store()));
    }

    if common.stats {
        print_stats(parse_time, elapsed, &engine.stats(), memory_usage());
    }

    match result {
        Ok(stats) if engine.store().is_solved() => {
            print!("{}", Entities(engine.store()));
            println!("\nSOLVED in {} passes", stats.passes);
            Outcome::Solved
        }
        Ok(stats) => {
            print!("{}", Entities(engine.store()));
            let reason = if stats.converged {
                "propagation stalled"
            } else {
                "pass limit reached"
            };
            println!(
                "\nUNSOLVED ({reason}) at {:.1}%",
                engine.percent_solved()
            );
            Outcome::Unsolved
        }
        Err(e) => {
            warn!(error = %e, "puzzle is inconsistent");
            println!("\nINCONSISTENT: {e}");
            Outcome::Inconsistent
        }
    }
}

/// Helper function to print a single statistic line in a formatted table row.
///
/// # Arguments
/// * `label` - The description of the statistic.
/// * `value` - The value of the statistic, implementing `std::fmt::Display`.
pub(crate) fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate (value/second).
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of propagation statistics.
///
/// # Arguments
/// * `parse_time` - Duration spent loading the puzzle and its clues.
/// * `elapsed` - Duration spent propagating.
/// * `s` - Counters collected by the engine.
/// * `memory` - Allocated and resident memory in MiB, when available.
pub(crate) fn print_stats(
    parse_time: Duration,
    elapsed: Duration,
    s: &PropagationStats,
    memory: Option<(f64, f64)>,
) {
    let elapsed_secs = elapsed.as_secs_f64();

    println!("\n=======================[ Puzzle Statistics ]==========================");
    stat_line("Load time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Clues", s.clues);

    println!("=====================[ Propagation Statistics ]======================");
    stat_line("Passes", s.passes);
    stat_line_with_rate("Eliminations", s.eliminations, elapsed_secs);
    stat_line_with_rate("Completions", s.completions, elapsed_secs);
    stat_line("Converged", s.converged);
    if let Some((allocated, resident)) = memory {
        stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
        stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    }
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");
}
