//! Effect areas for power-ups and special tiles.
//!
//! Player power-ups and triggered special tiles share one closed set of
//! shapes ([`Effect`]) and one dispatch function ([`effect_area`]).
//!
//! | Shape      | Cells covered                                     |
//! |------------|---------------------------------------------------|
//! | `Line`     | every cell in the target row                      |
//! | `Area`     | 3x3 block around the target, clipped to the board |
//! | `Cross`    | target row plus target column                     |
//! | `MatchAll` | every cell holding the target cell's kind         |

use std::fmt;
use std::str::FromStr;

use crate::board::{Board, Cell, SpecialKind, Tile};
use crate::constants::{CELLS, N};
use crate::error::EngineError;

/// Removal shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Effect {
    None,
    Line,
    Area,
    Cross,
    MatchAll,
}

impl From<SpecialKind> for Effect {
    fn from(special: SpecialKind) -> Self {
        match special {
            SpecialKind::None => Effect::None,
            SpecialKind::LineClear => Effect::Line,
            SpecialKind::ColorClear => Effect::MatchAll,
        }
    }
}

/// Player-invoked abilities.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PowerUp {
    /// Clears the target row.
    Line,
    /// Clears the 3x3 block around the target.
    Area,
    /// Clears the target row and column.
    Cross,
    /// Clears every tile of the target's kind.
    MatchAllOfKind,
}

impl PowerUp {
    pub const ALL: [PowerUp; 4] = [
        PowerUp::Line,
        PowerUp::Area,
        PowerUp::Cross,
        PowerUp::MatchAllOfKind,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PowerUp::Line => "line",
            PowerUp::Area => "area",
            PowerUp::Cross => "cross",
            PowerUp::MatchAllOfKind => "all",
        }
    }
}

impl From<PowerUp> for Effect {
    fn from(power_up: PowerUp) -> Self {
        match power_up {
            PowerUp::Line => Effect::Line,
            PowerUp::Area => Effect::Area,
            PowerUp::Cross => Effect::Cross,
            PowerUp::MatchAllOfKind => Effect::MatchAll,
        }
    }
}

impl fmt::Display for PowerUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PowerUp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PowerUp::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown power-up: {s}"))
    }
}

/// A set of board cells, iterated in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellSet {
    mask: [bool; CELLS],
}

impl Default for CellSet {
    fn default() -> Self {
        Self::new()
    }
}

impl CellSet {
    pub fn new() -> Self {
        Self {
            mask: [false; CELLS],
        }
    }

    #[inline]
    fn idx((column, row): Cell) -> usize {
        row * N + column
    }

    /// Add a cell; returns true if it was not already present.
    pub fn insert(&mut self, cell: Cell) -> bool {
        let i = Self::idx(cell);
        let fresh = !self.mask[i];
        self.mask[i] = true;
        fresh
    }

    pub fn remove(&mut self, cell: Cell) -> bool {
        let i = Self::idx(cell);
        let present = self.mask[i];
        self.mask[i] = false;
        present
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.mask[Self::idx(cell)]
    }

    pub fn len(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.mask.iter().any(|&m| m)
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.mask
            .iter()
            .enumerate()
            .filter(|&(_, &m)| m)
            .map(|(i, _)| (i % N, i / N))
    }

    /// The board's tiles at these cells.
    pub fn tiles(&self, board: &Board) -> Vec<Tile> {
        self.iter().map(|(c, r)| *board.tile(c, r)).collect()
    }
}

impl FromIterator<Cell> for CellSet {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        let mut set = CellSet::new();
        for cell in iter {
            set.insert(cell);
        }
        set
    }
}

/// Add the cells covered by `effect` at `target` to `out`.
fn mark_effect(board: &Board, effect: Effect, (column, row): Cell, out: &mut CellSet) {
    match effect {
        Effect::None => {}
        Effect::Line => {
            for c in 0..N {
                out.insert((c, row));
            }
        }
        Effect::Area => {
            for r in row.saturating_sub(1)..=(row + 1).min(N - 1) {
                for c in column.saturating_sub(1)..=(column + 1).min(N - 1) {
                    out.insert((c, r));
                }
            }
        }
        Effect::Cross => {
            for i in 0..N {
                out.insert((i, row));
                out.insert((column, i));
            }
        }
        Effect::MatchAll => {
            let kind = board.tile(column, row).kind;
            if kind.is_empty() {
                return;
            }
            for tile in board.tiles().iter().filter(|t| t.kind == kind) {
                out.insert(tile.cell());
            }
        }
    }
}

/// Cells covered by `effect` centred on `target`. The target must be on the board.
pub fn effect_area(board: &Board, effect: Effect, target: Cell) -> CellSet {
    let mut cells = CellSet::new();
    mark_effect(board, effect, target, &mut cells);
    cells
}

/// Tiles removed by `power_up` aimed at (column, row).
///
/// The result is a set: every tile appears once, in row-major order. No score
/// is attached; points come from the cascade the removal starts.
pub fn apply_power_up(
    board: &Board,
    power_up: PowerUp,
    column: usize,
    row: usize,
) -> Result<Vec<Tile>, EngineError> {
    Board::check_bounds((column, row))?;
    Ok(effect_area(board, power_up.into(), (column, row)).tiles(board))
}

/// Grow `seeds` through every special tile it reaches.
///
/// Each special inside the set fires its effect once, and tiles reached that
/// carry specials fire in turn. Effects read `board` as given.
pub fn expand_chain(board: &Board, seeds: &CellSet) -> CellSet {
    let mut reached = seeds.clone();
    let mut fired = CellSet::new();
    let mut pending: Vec<Cell> = seeds.iter().collect();

    while let Some(cell) = pending.pop() {
        let tile = board.tile(cell.0, cell.1);
        if !tile.is_special() || !fired.insert(cell) {
            continue;
        }
        tracing::trace!(?cell, special = ?tile.special, "special triggered");
        for hit in effect_area(board, tile.special.into(), cell).iter() {
            if reached.insert(hit) {
                pending.push(hit);
            }
        }
    }
    reached
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TileKind;

    fn background(column: usize, row: usize) -> TileKind {
        [TileKind::Red, TileKind::Green, TileKind::Blue][(column + 2 * row) % 3]
    }

    #[test]
    fn test_line_covers_row() {
        let board = Board::from_fn(0, background);
        let tiles = apply_power_up(&board, PowerUp::Line, 3, 2).unwrap();
        assert_eq!(tiles.len(), N);
        assert!(tiles.iter().all(|t| t.row == 2));
    }

    #[test]
    fn test_area_is_clipped_at_corner() {
        let board = Board::from_fn(0, background);
        let tiles = apply_power_up(&board, PowerUp::Area, 0, 0).unwrap();
        assert_eq!(tiles.len(), 4);
        let tiles = apply_power_up(&board, PowerUp::Area, 3, 3).unwrap();
        assert_eq!(tiles.len(), 9);
        let tiles = apply_power_up(&board, PowerUp::Area, N - 1, 3).unwrap();
        assert_eq!(tiles.len(), 6);
    }

    #[test]
    fn test_cross_counts_centre_once() {
        let board = Board::from_fn(0, background);
        let tiles = apply_power_up(&board, PowerUp::Cross, 4, 1).unwrap();
        assert_eq!(tiles.len(), 2 * N - 1);
    }

    #[test]
    fn test_match_all_takes_target_kind() {
        let board = Board::from_fn(0, background);
        let kind = board.tile(1, 1).kind;
        let tiles = apply_power_up(&board, PowerUp::MatchAllOfKind, 1, 1).unwrap();
        assert_eq!(tiles.len(), board.count_kind(kind));
        assert!(tiles.iter().all(|t| t.kind == kind));
    }

    #[test]
    fn test_power_up_out_of_bounds() {
        let board = Board::from_fn(0, background);
        assert_eq!(
            apply_power_up(&board, PowerUp::Area, 0, N),
            Err(EngineError::OutOfBounds { column: 0, row: N })
        );
    }

    #[test]
    fn test_chain_fires_specials_transitively() {
        // The line clear reaches the colour clear on its row, which then
        // takes its kind everywhere.
        let board = Board::from_fn(0, background)
            .with_special((0, 0), SpecialKind::LineClear)
            .unwrap()
            .with_special((2, 0), SpecialKind::ColorClear)
            .unwrap();
        let kind = board.tile(2, 0).kind;
        let seeds: CellSet = [(0, 0)].into_iter().collect();
        let reached = expand_chain(&board, &seeds);
        for row in 0..N {
            for column in 0..N {
                let expect = row == 0 || board.tile(column, row).kind == kind;
                assert_eq!(reached.contains((column, row)), expect, "({column}, {row})");
            }
        }
    }

    #[test]
    fn test_chain_without_specials_is_identity() {
        let board = Board::from_fn(0, background);
        let seeds: CellSet = [(1, 1), (2, 1)].into_iter().collect();
        assert_eq!(expand_chain(&board, &seeds), seeds);
    }

    #[test]
    fn test_power_up_parse() {
        assert_eq!("cross".parse::<PowerUp>(), Ok(PowerUp::Cross));
        assert_eq!("ALL".parse::<PowerUp>(), Ok(PowerUp::MatchAllOfKind));
        assert!("nuke".parse::<PowerUp>().is_err());
    }
}
