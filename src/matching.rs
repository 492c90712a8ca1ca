//! Match detection.
//!
//! Rows are scanned left to right, then columns top to bottom. A run of same
//! kind tiles is emitted once it breaks (kind change, empty slot, or board
//! edge) if it reached [`MIN_RUN`]. Runs longer than three are emitted whole,
//! never split into overlapping triples.

use crate::board::{Board, Cell, Tile, TileKind};
use crate::constants::{MIN_RUN, N};

/// Direction of a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A maximal run of at least three identical tiles along one axis.
///
/// Tiles are ordered left to right (horizontal) or top to bottom (vertical).
/// Horizontal and vertical groups may share a tile (L and T shapes).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchGroup {
    pub axis: Axis,
    pub kind: TileKind,
    pub tiles: Vec<Tile>,
}

impl MatchGroup {
    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.tiles.iter().any(|t| t.cell() == cell)
    }

    /// The centre tile, rounding toward the start of the run for even lengths.
    pub fn middle(&self) -> &Tile {
        &self.tiles[(self.tiles.len() - 1) / 2]
    }
}

/// Find every run of three or more in `board`, rows first then columns.
pub fn find_match_groups(board: &Board) -> Vec<MatchGroup> {
    let mut groups = Vec::new();
    for row in 0..N {
        scan_line(Axis::Horizontal, (0..N).map(|c| board.tile(c, row)), &mut groups);
    }
    for column in 0..N {
        scan_line(Axis::Vertical, (0..N).map(|r| board.tile(column, r)), &mut groups);
    }
    groups
}

/// Accumulate runs along one line, pushing each completed run of length >= 3.
fn scan_line<'a>(axis: Axis, line: impl Iterator<Item = &'a Tile>, out: &mut Vec<MatchGroup>) {
    let mut run: Vec<Tile> = Vec::with_capacity(N);
    for tile in line {
        let extends = run
            .last()
            .is_some_and(|prev| !tile.kind.is_empty() && prev.kind == tile.kind);
        if !extends {
            flush_run(axis, &mut run, out);
        }
        if !tile.kind.is_empty() {
            run.push(*tile);
        }
    }
    flush_run(axis, &mut run, out);
}

fn flush_run(axis: Axis, run: &mut Vec<Tile>, out: &mut Vec<MatchGroup>) {
    if run.len() >= MIN_RUN {
        out.push(MatchGroup {
            axis,
            kind: run[0].kind,
            tiles: run.clone(),
        });
    }
    run.clear();
}
