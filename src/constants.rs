//! Constants for board dimensions, scoring, and level generation.
//!
//! # Board Size Configuration
//!
//! The board size is controlled by Cargo features:
//! - `board8x8` (default): 8x8 board
//! - `board10x10`: 10x10 board
//!
//! ```sh
//! cargo build                                               # 8x8 (default)
//! cargo build --no-default-features --features board10x10   # 10x10
//! ```

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN).
#[cfg(feature = "board8x8")]
pub const N: usize = 8;

#[cfg(feature = "board10x10")]
pub const N: usize = 10;

// Compile-time check: exactly one board size feature must be enabled
#[cfg(all(feature = "board8x8", feature = "board10x10"))]
compile_error!("Cannot enable both 'board8x8' and 'board10x10' features at the same time");

#[cfg(not(any(feature = "board8x8", feature = "board10x10")))]
compile_error!("Must enable exactly one board size feature: 'board8x8' or 'board10x10'");

/// Total number of cells on the board.
pub const CELLS: usize = N * N;

/// Shortest run that counts as a match.
pub const MIN_RUN: usize = 3;

// =============================================================================
// Scoring
// =============================================================================

/// Points awarded per matched tile before the multiplier.
pub const POINTS_PER_TILE: u64 = 20;

/// Multiplier for a pass caused directly by the player's swap.
pub const DIRECT_MULTIPLIER: f64 = 1.0;

/// Multiplier for passes caused by a previous cascade pass or a power-up.
pub const COMBO_MULTIPLIER: f64 = 1.5;

// =============================================================================
// Special Tiles
// =============================================================================

/// Run length that creates a line-clear special.
pub const LINE_CLEAR_RUN: usize = 4;

/// Run length (or longer) that creates a color-clear special.
pub const COLOR_CLEAR_RUN: usize = 5;

// =============================================================================
// Cascade Loop
// =============================================================================

/// Upper bound on detect/resolve/refill passes for a single move.
///
/// Random refill makes an endless cascade vanishingly unlikely, not impossible.
pub const MAX_CASCADE_PASSES: usize = 1000;

// =============================================================================
// Level Generation
// =============================================================================

/// Base target score; each level adds [`TARGET_SCORE_PER_LEVEL`].
pub const TARGET_SCORE_BASE: u64 = 5000;

/// Target score increment per level.
pub const TARGET_SCORE_PER_LEVEL: u64 = 1000;

/// Seconds on the clock for every level.
pub const LEVEL_TIMER_SECONDS: u32 = 300;

/// Kind counts by level: levels 1-2 use 4 kinds, 3-9 use 5, 10 and up use 6.
pub const KINDS_EARLY: usize = 4;
pub const KINDS_MID: usize = 5;
pub const KINDS_LATE: usize = 6;

/// First level using [`KINDS_MID`] kinds.
pub const MID_LEVEL: u32 = 3;

/// First level using [`KINDS_LATE`] kinds.
pub const LATE_LEVEL: u32 = 10;

/// Highest level the level provider will produce.
pub const MAX_LEVEL: u32 = 30_000;
