//! Tilecascade: a tile-matching puzzle engine.
//!
//! Players swap adjacent tiles to form runs of three or more of a kind. Runs
//! are removed and scored, long runs leave special tiles behind, specials
//! chain into each other, and gravity plus random refill can set off further
//! matches. The engine is pure and synchronous: every operation takes a board
//! by reference and returns a new one, and it performs no I/O.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions, scoring and level constants
//! - [`board`] - Tiles, kinds, palettes and the board itself
//! - [`matching`] - Run detection
//! - [`effects`] - Power-up and special-tile removal shapes
//! - [`refill`] - Gravity and spawning
//! - [`cascade`] - Per-pass resolution and the cascade loop
//! - [`engine`] - Swap and power-up entry points
//! - [`level`] - Level parameters
//! - [`config`] - Settings file
//! - [`console`] - Text protocol for driving a session
//!
//! ## Example
//!
//! ```
//! use tilecascade::board::create_board;
//! use tilecascade::engine::play_swap;
//! use tilecascade::level::LevelConfig;
//!
//! let level = LevelConfig::for_level(1);
//! let palette = level.palette().unwrap();
//! let board = create_board(&palette, 42);
//!
//! let outcome = play_swap(&board, &palette, (0, 0), (1, 0)).unwrap();
//! if outcome.accepted {
//!     println!("scored {} points", outcome.points);
//! }
//! println!("{}", outcome.board);
//! ```

pub mod board;
pub mod cascade;
pub mod config;
pub mod console;
pub mod constants;
pub mod effects;
pub mod engine;
pub mod error;
pub mod level;
pub mod matching;
pub mod refill;

pub use board::{Board, Cell, Palette, SpecialKind, Tile, TileKind, create_board};
pub use error::EngineError;
