//! Line-oriented text protocol for playing a session.
//!
//! Modelled on GTP: each line is an optional numeric id followed by a command
//! and its arguments. Success is answered with `=<id> <text>`, failure with
//! `?<id> <message>`, each followed by a blank line.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`, `list_commands`
//! - `known_command <cmd>` - Check if a command is supported
//! - `quit` - Exit the loop
//! - `level <n>` - Start level `n` with a fresh board and zero score
//! - `showboard` - Print the board (`-` marks a line clear, `*` a colour clear)
//! - `score` - `<score> / <target>`, then `won` once the target is met, then
//!   the power-up inventory as `line:<n> area:<n> cross:<n> all:<n>`
//! - `swap <c1> <r1> <c2> <r2>` - Swap two adjacent tiles
//! - `power <line|area|cross|all> <c> <r>` - Spend one power-up on a cell
//! - `reward <line|area|cross|all>` - Claim one power-up for a won level
//! - `stabilize` - Run the cascade loop without a move
//!
//! Coordinates are zero-based `column row`, row 0 at the top.
//!
//! ## Example
//!
//! ```ignore
//! use tilecascade::config::Settings;
//! use tilecascade::console::Console;
//! let mut console = Console::new(Settings::default())?;
//! console.run()?;
//! ```

use std::fmt;
use std::io::{self, BufRead, Write};

use crate::board::{Board, Cell, Palette, create_board};
use crate::config::Settings;
use crate::effects::PowerUp;
use crate::engine::{MoveOutcome, play_power_up, play_swap, stabilize};
use crate::error::EngineError;
use crate::level::LevelConfig;

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "known_command",
    "level",
    "list_commands",
    "name",
    "power",
    "protocol_version",
    "quit",
    "reward",
    "score",
    "showboard",
    "stabilize",
    "swap",
    "version",
];

/// Power-ups held by the player. Carried across levels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    counts: [u32; PowerUp::ALL.len()],
}

impl Inventory {
    pub fn count(&self, power_up: PowerUp) -> u32 {
        self.counts[power_up as usize]
    }

    pub fn add(&mut self, power_up: PowerUp) {
        self.counts[power_up as usize] += 1;
    }

    /// Use up one `power_up`; false if none is left.
    pub fn take(&mut self, power_up: PowerUp) -> bool {
        let slot = &mut self.counts[power_up as usize];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for power_up in PowerUp::ALL {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{power_up}:{}", self.count(power_up))?;
        }
        Ok(())
    }
}

/// A play session: current level, board, score and power-up inventory.
///
/// Win detection lives here, not in the engine: the session is won once the
/// accumulated score reaches the level target. Each won level pays out one
/// power-up of the player's choice.
pub struct Console {
    settings: Settings,
    base_seed: u64,
    level: LevelConfig,
    palette: Palette,
    board: Board,
    score: u64,
    inventory: Inventory,
    rewarded: bool,
}

impl Console {
    /// Create a session on the configured start level.
    pub fn new(settings: Settings) -> Result<Self, EngineError> {
        let base_seed = settings.seed_or_random();
        let level = settings.level_config(settings.start_level);
        let palette = level.palette()?;
        let board = create_board(&palette, base_seed.wrapping_add(level.level as u64));
        Ok(Self {
            settings,
            base_seed,
            level,
            palette,
            board,
            score: 0,
            inventory: Inventory::default(),
            rewarded: false,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Run the command loop on stdin and stdout.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        self.run_with(stdin.lock(), io::stdout())
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let (success, message) = self.execute(&command, &parts[1..]);

            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command id from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "1".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "level" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                match arg.parse::<u32>() {
                    Ok(n) if n >= 1 => match self.start_level(n) {
                        Ok(()) => (
                            true,
                            format!(
                                "level {} target {} timer {}s",
                                self.level.level, self.level.target_score, self.level.timer_seconds
                            ),
                        ),
                        Err(e) => (false, e.to_string()),
                    },
                    _ => (false, "invalid level".to_string()),
                }
            }

            "showboard" => (true, format!("\n{}", self.board)),

            "score" => {
                let mut reply = format!("{} / {}", self.score, self.level.target_score);
                if self.level.is_won(self.score) {
                    reply.push_str(" won");
                }
                reply.push_str(&format!(" {}", self.inventory));
                (true, reply)
            }

            "swap" => {
                if args.len() < 4 {
                    return (false, "missing arguments".to_string());
                }
                let (a, b) = match (parse_cell(&args[0..2]), parse_cell(&args[2..4])) {
                    (Ok(a), Ok(b)) => (a, b),
                    (Err(e), _) | (_, Err(e)) => return (false, e),
                };
                match play_swap(&self.board, &self.palette, a, b) {
                    Ok(outcome) if !outcome.accepted => (true, "no match".to_string()),
                    Ok(outcome) => (true, self.apply(outcome)),
                    Err(e) => (false, e.to_string()),
                }
            }

            "power" => {
                if args.len() < 3 {
                    return (false, "missing arguments".to_string());
                }
                let power_up = match args[0].parse::<PowerUp>() {
                    Ok(p) => p,
                    Err(e) => return (false, e),
                };
                let (column, row) = match parse_cell(&args[1..3]) {
                    Ok(cell) => cell,
                    Err(e) => return (false, e),
                };
                if self.inventory.count(power_up) == 0 {
                    return (false, format!("no {power_up} power-up left"));
                }
                match play_power_up(&self.board, &self.palette, power_up, column, row) {
                    Ok(outcome) => {
                        self.inventory.take(power_up);
                        (true, self.apply(outcome))
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "reward" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let power_up = match arg.parse::<PowerUp>() {
                    Ok(p) => p,
                    Err(e) => return (false, e),
                };
                if !self.level.is_won(self.score) {
                    return (false, "level not won".to_string());
                }
                if self.rewarded {
                    return (false, "reward already claimed".to_string());
                }
                self.inventory.add(power_up);
                self.rewarded = true;
                tracing::info!(%power_up, level = self.level.level, "reward claimed");
                (true, format!("{power_up}:{}", self.inventory.count(power_up)))
            }

            "stabilize" => {
                let outcome = stabilize(&self.board, &self.palette);
                (true, self.apply(outcome))
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }

    fn start_level(&mut self, level: u32) -> Result<(), EngineError> {
        let config = self.settings.level_config(level);
        let palette = config.palette()?;
        self.board = create_board(&palette, self.base_seed.wrapping_add(level as u64));
        self.palette = palette;
        self.level = config;
        self.score = 0;
        self.rewarded = false;
        tracing::info!(level, "level started");
        Ok(())
    }

    /// Take the outcome's board and points; returns the reply text.
    fn apply(&mut self, outcome: MoveOutcome) -> String {
        self.score += outcome.points;
        self.board = outcome.board;
        tracing::info!(
            points = outcome.points,
            passes = outcome.passes.len(),
            score = self.score,
            "move resolved"
        );
        format!("{} points in {} passes", outcome.points, outcome.passes.len())
    }
}

fn parse_cell(args: &[&str]) -> Result<Cell, String> {
    let column = args[0]
        .parse::<usize>()
        .map_err(|_| format!("invalid column: {}", args[0]))?;
    let row = args[1]
        .parse::<usize>()
        .map_err(|_| format!("invalid row: {}", args[1]))?;
    Ok((column, row))
}
