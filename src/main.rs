//! # zebra_solver
//!
//! `zebra_solver` is a command-line front end for the logic grid propagation
//! engine. It loads puzzles from `.zebra` files (or generates random ones),
//! propagates their clues to a fixed point and reports what was deduced.
//!
//! ## Usage
//!
//! ```sh
//! zebra_solver [OPTIONS] [PATH]
//! zebra_solver file --path <FILE> [OPTIONS]
//! zebra_solver random [--categories N] [--attributes M] [--clues C] [--seed S] [--export FILE]
//! zebra_solver completions <SHELL>
//! ```
//!
//! A bare `PATH` is solved as a single puzzle file, or, for a directory,
//! every `.zebra` file below it.
//!
//! ### Common Options
//!
//! -   `-d, --debug`: Log every deduction (`RUST_LOG` overrides the level).
//! -   `-s, --stats`: Print propagation statistics.
//! -   `-g, --print-grid`: Print the association grid.
//! -   `--max-passes <N>`: Stop after `N` propagation passes.
//!
//! ## Example Invocations
//!
//! ```sh
//! # Solve a puzzle and show the grid
//! zebra_solver puzzles/three_houses.zebra --print-grid
//!
//! # Solve every puzzle under a directory with statistics
//! zebra_solver puzzles --stats
//!
//! # Generate a 5x5 puzzle, save it and propagate it
//! zebra_solver random --categories 5 --attributes 5 --clues 30 --seed 1 --export five.zebra
//! ```

use crate::command_line::cli::{
    Cli, Commands, init_tracing, print_completions, solve_path, solve_random,
};
use clap::Parser;
use zebra_solver::zebra::generator::GeneratorConfig;

mod command_line;

/// Global allocator using `tikv-jemallocator` for memory usage tracking.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::File { path, common }) => {
            init_tracing(common.debug);
            solve_path(&path, &common)
        }
        Some(Commands::Random {
            categories,
            attributes,
            clues,
            link_probability,
            seed,
            export,
            common,
        }) => {
            init_tracing(common.debug);
            let config = GeneratorConfig {
                categories,
                per_category: attributes,
                clues,
                link_probability,
                seed: seed.unwrap_or_else(|| fastrand::u64(..)),
            };
            solve_random(config, export.as_deref(), &common)
        }
        Some(Commands::Completions { shell }) => {
            print_completions(shell);
            Ok(())
        }
        None => match cli.path {
            Some(path) => {
                init_tracing(cli.common.debug);
                solve_path(&path, &cli.common)
            }
            None => Err("No command provided. Use --help for more information.".to_string()),
        },
    };

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
