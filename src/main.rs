//! Tilecascade command-line front end.
//!
//! ## Usage
//!
//! - `tilecascade` - Show a demo
//! - `tilecascade console` - Start the text protocol on stdin/stdout
//! - `tilecascade demo --level 3 --moves 10` - Play random swaps and print boards
//! - `tilecascade level 12` - Print the parameters of a level

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tilecascade::board::{Board, Cell, Palette, create_board};
use tilecascade::config::Settings;
use tilecascade::console::Console;
use tilecascade::constants::N;
use tilecascade::engine::{MoveOutcome, play_swap};

/// Tilecascade: a tile-matching puzzle engine
#[derive(Parser)]
#[command(name = "tilecascade")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (TOML)
    #[arg(long, global = true, default_value = "tilecascade.toml")]
    config: PathBuf,

    /// Seed for board generation (overrides the settings file)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the line-based text protocol for use by a front end
    Console,
    /// Play random swaps and print each resulting board
    Demo {
        #[arg(long, default_value_t = 1)]
        level: u32,
        #[arg(long, default_value_t = 5)]
        moves: usize,
    },
    /// Print the parameters of a level
    Level { level: u32 },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tilecascade=info")),
        )
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::load(&cli.config)
        .with_context(|| format!("loading settings from {}", cli.config.display()))?;
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }

    match cli.command {
        Some(Commands::Console) => {
            let mut console = Console::new(settings).context("starting console session")?;
            console.run().context("console I/O failed")?;
        }
        Some(Commands::Level { level }) => {
            let cfg = settings.level_config(level);
            let kinds: Vec<String> = cfg.kinds.iter().map(|k| format!("{k:?}")).collect();
            println!("Level {}", cfg.level);
            println!("Kinds: {}", kinds.join(", "));
            println!("Target score: {}", cfg.target_score);
            println!("Timer: {}s", cfg.timer_seconds);
        }
        Some(Commands::Demo { level, moves }) => run_demo(&settings, level, moves)?,
        None => run_demo(&settings, settings.start_level, 5)?,
    }
    Ok(())
}

fn run_demo(settings: &Settings, level: u32, moves: usize) -> Result<()> {
    let cfg = settings.level_config(level);
    let palette = cfg.palette().context("level has an unusable kind set")?;
    let seed = settings.seed_or_random();
    let mut rng = fastrand::Rng::with_seed(seed);

    println!("Tilecascade demo: level {} (seed {seed})\n", cfg.level);
    let mut board = create_board(&palette, seed);
    println!("{board}");

    let mut score = 0;
    for turn in 1..=moves {
        let Some((a, b, outcome)) = find_scoring_swap(&board, &palette, &mut rng)? else {
            println!("No scoring swap found, stopping.");
            break;
        };
        score += outcome.points;
        println!(
            "Move {turn}: swap {a:?} <-> {b:?}, {} points over {} passes (total {score})",
            outcome.points,
            outcome.passes.len()
        );
        println!("{}", outcome.board);
        board = outcome.board;
    }

    println!("Final score: {score} / {}", cfg.target_score);
    Ok(())
}

type Swap = (Cell, Cell, MoveOutcome);

/// Try every adjacent pair in random order and return the first accepted swap.
fn find_scoring_swap(board: &Board, palette: &Palette, rng: &mut fastrand::Rng) -> Result<Option<Swap>> {
    let mut pairs = Vec::with_capacity(2 * N * N);
    for row in 0..N {
        for column in 0..N {
            for (dc, dr) in [(1, 0), (0, 1)] {
                let other = (column + dc, row + dr);
                if other.0 < N && other.1 < N {
                    pairs.push(((column, row), other));
                }
            }
        }
    }
    rng.shuffle(&mut pairs);

    for (a, b) in pairs {
        let outcome = play_swap(board, palette, a, b)?;
        if outcome.accepted {
            return Ok(Some((a, b, outcome)));
        }
    }
    Ok(None)
}
