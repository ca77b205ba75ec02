//! CLI entry point for the tile solver.
//!
//! Usage:
//!   tile-solver solve <board.txt> [options]
//!   tile-solver solve --stdin [options]
//!   tile-solver solve --board "1 2 3 4 5 0 7 8 6" [options]
//!   tile-solver shuffle [--size <n>] [--seed <s>] [--walk <k>]
//!
//! Solve options:
//!   --size <n>              Board width (default: 3)
//!   --heuristic <h>         misplaced-tiles | manhattan-distance (default: manhattan-distance)
//!   --policy <p>            a-star | greedy (default: a-star)
//!   --dedup <d>             best-cost | first-seen (default: best-cost)
//!   --goal <g>              blank-last | blank-first (default: blank-last)
//!   --max-expansions <n>    Expansion budget, 0 for none (default: 1000000)
//!   --timeout <seconds>     Maximum search time (default: none)
//!   --format <f>            json | text (default: json)
//!
//! Boards are whitespace-separated integers in row-major order with 0 as the
//! blank, or a JSON list of rows.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use tile_solver::board::DEFAULT_SIZE;
use tile_solver::shuffle::{random_solvable, random_walk};
use tile_solver::solver::DEFAULT_MAX_EXPANSIONS;
use tile_solver::{
    Board, DedupMode, Direction, Goal, GoalLayout, HeuristicKind, Outcome, SearchEngine,
    SearchPolicy, SolverConfig, SolverResult,
};

#[derive(Parser)]
#[command(name = "tile-solver")]
#[command(about = "Best-first solver for the sliding-tile puzzle")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a move sequence from a board to the goal
    Solve {
        /// Path to a board file (use --stdin or --board instead to skip the file)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read the board from stdin instead of a file
        #[arg(long, conflicts_with = "file")]
        stdin: bool,

        /// Board given inline, e.g. "1 2 3 4 5 0 7 8 6"
        #[arg(long, conflicts_with_all = ["file", "stdin"])]
        board: Option<String>,

        /// Board width
        #[arg(long, default_value_t = DEFAULT_SIZE)]
        size: usize,

        /// Remaining-cost estimate
        #[arg(long, value_enum, default_value_t = HeuristicKind::ManhattanDistance)]
        heuristic: HeuristicKind,

        /// Frontier ordering
        #[arg(long, value_enum, default_value_t = SearchPolicy::AStar)]
        policy: SearchPolicy,

        /// Visited-set behaviour for boards reached again
        #[arg(long, value_enum, default_value_t = DedupMode::BestCost)]
        dedup: DedupMode,

        /// Goal configuration
        #[arg(long, value_enum, default_value_t = GoalLayout::BlankLast)]
        goal: GoalLayout,

        /// Maximum node expansions (0 disables the limit)
        #[arg(long, default_value_t = DEFAULT_MAX_EXPANSIONS)]
        max_expansions: usize,

        /// Maximum search time in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Print a random solvable board
    Shuffle {
        /// Board width
        #[arg(long, default_value_t = DEFAULT_SIZE)]
        size: usize,

        /// RNG seed for reproducible boards
        #[arg(long)]
        seed: Option<u64>,

        /// Goal configuration the board must be solvable towards
        #[arg(long, value_enum, default_value_t = GoalLayout::BlankLast)]
        goal: GoalLayout,

        /// Walk this many random moves from the goal instead of shuffling uniformly
        #[arg(long)]
        walk: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Text,
}

/// Output format for a solve run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    heuristic: HeuristicKind,
    policy: SearchPolicy,
    dedup: DedupMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    path_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<Vec<Board>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<Vec<Direction>>,
    nodes_generated: usize,
    nodes_admitted: usize,
    nodes_expanded: usize,
    time_elapsed_ms: u64,
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Commands::Solve {
            file,
            stdin,
            board,
            size,
            heuristic,
            policy,
            dedup,
            goal,
            max_expansions,
            timeout,
            format,
        } => {
            let input = read_input(file, stdin, board)?;
            let goal = Goal::from_layout(goal, size).context("invalid --size")?;

            let config = SolverConfig {
                heuristic,
                policy,
                dedup,
                max_expansions: (max_expansions > 0).then_some(max_expansions),
                timeout: timeout.map(Duration::from_secs),
            };

            let result = match parse_start(&input, size) {
                Ok(start) => SearchEngine::from_config(goal, &config).solve(&start),
                Err(reason) => SolverResult::invalid_input(reason),
            };

            match format {
                Format::Json => {
                    let output = format_result(&result, &config);
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                Format::Text => print_text(&result),
            }

            Ok(if result.is_solved() { 0 } else { 1 })
        }
        Commands::Shuffle {
            size,
            seed,
            goal,
            walk,
        } => {
            let goal = Goal::from_layout(goal, size).context("invalid --size")?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let board = match walk {
                Some(steps) => random_walk(goal.board(), steps, &mut rng),
                None => random_solvable(&goal, &mut rng)?,
            };
            print!("{}", board);
            Ok(0)
        }
    }
}

fn read_input(file: Option<PathBuf>, stdin: bool, board: Option<String>) -> anyhow::Result<String> {
    if let Some(text) = board {
        Ok(text)
    } else if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read from stdin")?;
        Ok(buffer)
    } else if let Some(path) = file {
        fs::read_to_string(&path).with_context(|| format!("failed to read {:?}", path))
    } else {
        anyhow::bail!("must provide a file path, --stdin, or --board")
    }
}

/// Accept either plain whitespace-separated tiles or JSON rows.
fn parse_start(input: &str, size: usize) -> Result<Board, String> {
    if input.trim_start().starts_with('[') {
        serde_json::from_str::<Board>(input).map_err(|e| e.to_string())
    } else {
        Board::parse(input, size).map_err(|e| e.to_string())
    }
}

fn format_result(result: &SolverResult, config: &SolverConfig) -> SolveOutput {
    let solution = result.solution.as_ref();
    SolveOutput {
        outcome: result.outcome,
        reason: result.reason.clone(),
        heuristic: config.heuristic,
        policy: config.policy,
        dedup: config.dedup,
        path_length: solution.map(|s| s.len()),
        path: solution.map(|s| s.path.clone()),
        moves: solution.map(|s| s.moves.clone()),
        nodes_generated: result.stats.nodes_generated,
        nodes_admitted: result.stats.nodes_admitted,
        nodes_expanded: result.stats.nodes_expanded,
        time_elapsed_ms: result.stats.time_elapsed_ms,
    }
}

fn print_text(result: &SolverResult) {
    match &result.solution {
        Some(solution) => {
            println!("Solution:");
            for board in &solution.path {
                println!("{}", board);
            }
            println!("Goal state reached in {} moves.", solution.len());
        }
        None => {
            let reason = result.reason.as_deref().unwrap_or("unknown");
            println!("No solution ({:?}): {}", result.outcome, reason);
        }
    }
    println!("Nodes generated: {}", result.stats.nodes_generated);
    println!("Time taken: {} milliseconds", result.stats.time_elapsed_ms);
}
