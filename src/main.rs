use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use fifteen::display::{describe_move, describe_outcome, render_board};
use fifteen::solver::Search;
use fifteen::{persist, Controller, GameState, SolveOutcome, SolverConfig};
use tracing::{debug, info};

/// Fifteen patience solver CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of games to deal and solve
    #[arg(short, long, default_value_t = 1)]
    games: u32,

    /// Seed for the deal (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Maximum nodes the solver may expand per game
    #[arg(long, default_value_t = 500_000)]
    max_nodes: u64,

    /// Maximum solution length in moves
    #[arg(long, default_value_t = 512)]
    max_depth: usize,

    /// Number of threads to use (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    threads: usize,

    /// Load a saved game instead of dealing one
    #[arg(long)]
    load: Option<String>,

    /// Save the game after playing to this file
    #[arg(long)]
    save: Option<String>,

    /// Print each move of the solution as it is played
    #[arg(long)]
    show_moves: bool,

    /// Pause between played moves, in milliseconds
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// List legal moves under the board
    #[arg(long)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            max_nodes: self.max_nodes,
            max_depth: self.max_depth,
            ..SolverConfig::default()
        }
    }
}

/// Solve one game and play the solution on the board.
fn play_game(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = match &args.load {
        Some(path) => Controller::load_or_new(&fs::read_to_string(path)?),
        None => Controller::with_state(match args.seed {
            Some(seed) => GameState::with_seed(seed),
            None => GameState::new(),
        }),
    }
    .with_solver_config(args.solver_config());
    if args.debug && !controller.state().debug_mode() {
        controller.toggle_debug();
    }

    println!("{}", controller.state());

    let start_time = Instant::now();
    let mut search = Search::new(controller.state(), args.solver_config());
    let outcome = search.run_with(|stats| {
        debug!(
            nodes = stats.nodes_expanded,
            visited = stats.boards_visited,
            depth = stats.max_depth,
            "searching"
        );
    });
    let stats = search.stats();
    info!(
        nodes = stats.nodes_expanded,
        visited = stats.boards_visited,
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "search finished"
    );

    println!("{}", describe_outcome(&outcome));
    if let SolveOutcome::Solved(moves) = outcome {
        controller.start_playback(moves);
        while let Some(mv) = controller.play_next() {
            if args.show_moves {
                println!("  {}", describe_move(&mv));
            }
            if args.delay_ms > 0 {
                thread::sleep(Duration::from_millis(args.delay_ms));
            }
        }
        println!("\n{}", render_board(controller.state()));
    }

    if let Some(path) = &args.save {
        fs::write(path, persist::serialize_pretty(controller.state())?)?;
        println!("Saved game to {}", path);
    }
    Ok(())
}

#[derive(Default)]
struct Tally {
    solved: u32,
    exhausted: u32,
    over_budget: u32,
    total_moves: u64,
    completed: u32,
}

/// Deal and solve many games and report statistics
fn play_multiple_games(args: &Args) {
    let num_games = args.games;
    let tally = Arc::new(Mutex::new(Tally::default()));
    let start_time = Instant::now();

    let num_threads = if args.threads == 0 {
        thread::available_parallelism().map(|p| p.get()).unwrap_or(4)
    } else {
        args.threads
    };
    let num_threads = std::cmp::min(num_threads, num_games as usize).max(1);
    let games_per_thread = (num_games as usize).div_ceil(num_threads);

    println!("Solving {} games using {} threads", num_games, num_threads);

    let mut handles = vec![];
    for thread_id in 0..num_threads {
        let start_game = thread_id * games_per_thread;
        let end_game = std::cmp::min((thread_id + 1) * games_per_thread, num_games as usize);
        if start_game >= end_game {
            continue;
        }

        let thread_tally = Arc::clone(&tally);
        let config = args.solver_config();
        let base_seed = args.seed;

        handles.push(thread::spawn(move || {
            for game in start_game..end_game {
                let state = match base_seed {
                    Some(seed) => GameState::with_seed(seed.wrapping_add(game as u64)),
                    None => GameState::new(),
                };
                let outcome = Search::new(&state, config).run();

                let Ok(mut tally) = thread_tally.lock() else {
                    return;
                };
                tally.completed += 1;
                match outcome {
                    SolveOutcome::Solved(moves) => {
                        tally.solved += 1;
                        tally.total_moves += moves.len() as u64;
                    }
                    SolveOutcome::Exhausted => tally.exhausted += 1,
                    SolveOutcome::BudgetExceeded | SolveOutcome::Cancelled => {
                        tally.over_budget += 1
                    }
                }
                if tally.completed % 10 == 0 || tally.completed == num_games {
                    print!("Completed {}/{} games...\r", tally.completed, num_games);
                    let _ = io::stdout().flush();
                }
            }
        }));
    }

    for handle in handles {
        if handle.join().is_err() {
            eprintln!("a solver thread panicked");
        }
    }

    let Ok(tally) = tally.lock() else {
        return;
    };
    let duration = start_time.elapsed();
    let solve_rate = (tally.solved as f64 / num_games as f64) * 100.0;
    let avg_moves = if tally.solved > 0 {
        tally.total_moves as f64 / tally.solved as f64
    } else {
        0.0
    };

    println!("\nResults from {} games:", num_games);
    println!("Solved: {:.2}% ({}/{})", solve_rate, tally.solved, num_games);
    println!("No solution found (search exhausted): {}", tally.exhausted);
    println!("Gave up (node budget): {}", tally.over_budget);
    println!("Average solution length: {:.2} moves", avg_moves);
    println!(
        "Time taken: {:.2} seconds ({:.2} seconds per game)",
        duration.as_secs_f64(),
        duration.as_secs_f64() / num_games as f64
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if args.games <= 1 {
        play_game(&args)
    } else {
        play_multiple_games(&args);
        Ok(())
    }
}
