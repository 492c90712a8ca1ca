//! Board model: tiles, kinds, and the N x N grid.
//!
//! Cells are addressed as `(column, row)` with row 0 at the top. Gravity pulls
//! toward row `N - 1`. Every slot always holds exactly one [`Tile`] whose own
//! coordinates match the slot; [`TileKind::Empty`] only appears on boards that
//! are part-way through a cascade pass.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{CELLS, MIN_RUN, N};
use crate::error::EngineError;

/// A cell on the board as `(column, row)`.
pub type Cell = (usize, usize);

/// Tile identity. Stable while a tile survives; fresh for every spawned tile.
pub type TileId = u64;

/// Token categories. `Empty` is the transient hole left by a removal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    Red,
    Black,
    Green,
    Amber,
    Blue,
    Yellow,
    Empty,
}

impl TileKind {
    /// Every playable kind, in level-unlock order.
    pub const ALL: [TileKind; 6] = [
        TileKind::Red,
        TileKind::Black,
        TileKind::Green,
        TileKind::Amber,
        TileKind::Blue,
        TileKind::Yellow,
    ];

    #[inline]
    pub fn is_empty(self) -> bool {
        self == TileKind::Empty
    }

    /// One-character symbol used by the text board.
    pub fn symbol(self) -> char {
        match self {
            TileKind::Red => 'R',
            TileKind::Black => 'K',
            TileKind::Green => 'G',
            TileKind::Amber => 'A',
            TileKind::Blue => 'B',
            TileKind::Yellow => 'Y',
            TileKind::Empty => '.',
        }
    }
}

/// Special power carried by a tile created from a long run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SpecialKind {
    #[default]
    None,
    /// Created by a run of 4; clears its row when triggered.
    LineClear,
    /// Created by a run of 5 or more; clears every tile of its kind.
    ColorClear,
}

/// A single token on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
    pub column: usize,
    pub row: usize,
    pub special: SpecialKind,
    /// Set only between matching and clearing within one pass.
    pub marked_for_removal: bool,
}

impl Tile {
    pub fn new(id: TileId, kind: TileKind, column: usize, row: usize) -> Self {
        Self {
            id,
            kind,
            column,
            row,
            special: SpecialKind::None,
            marked_for_removal: false,
        }
    }

    #[inline]
    pub fn cell(&self) -> Cell {
        (self.column, self.row)
    }

    #[inline]
    pub fn is_special(&self) -> bool {
        self.special != SpecialKind::None
    }
}

/// The subset of kinds a level plays with.
///
/// Holds at least [`MIN_RUN`] distinct non-empty kinds, which guarantees the
/// anti-match filter in [`create_board`] always has a candidate left.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    kinds: Vec<TileKind>,
}

impl Palette {
    pub fn new(kinds: &[TileKind]) -> Result<Self, EngineError> {
        let mut distinct: Vec<TileKind> = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            if kind.is_empty() {
                return Err(EngineError::EmptyKind);
            }
            if !distinct.contains(&kind) {
                distinct.push(kind);
            }
        }
        if distinct.len() < MIN_RUN {
            return Err(EngineError::TooFewKinds {
                found: distinct.len(),
            });
        }
        Ok(Self { kinds: distinct })
    }

    pub fn kinds(&self) -> &[TileKind] {
        &self.kinds
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn contains(&self, kind: TileKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Uniformly random kind from the palette.
    fn pick(&self, rng: &mut fastrand::Rng) -> TileKind {
        self.kinds[rng.usize(..self.kinds.len())]
    }
}

/// An N x N grid of tiles plus the state needed to spawn new ones.
///
/// The board owns its random state and its id counter, so a board value and a
/// move fully determine the outcome. Engine operations take `&Board` and return
/// a new board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    tiles: Vec<Tile>,
    next_id: TileId,
    rng_state: u64,
}

impl Board {
    /// Build a board by asking `kind_at(column, row)` for every cell.
    ///
    /// No match filtering is applied; useful for hand-built positions.
    pub fn from_fn(seed: u64, mut kind_at: impl FnMut(usize, usize) -> TileKind) -> Self {
        let mut tiles = Vec::with_capacity(CELLS);
        for row in 0..N {
            for column in 0..N {
                let id = (row * N + column) as TileId;
                tiles.push(Tile::new(id, kind_at(column, row), column, row));
            }
        }
        Self {
            tiles,
            next_id: CELLS as TileId,
            rng_state: seed,
        }
    }

    #[inline]
    fn idx(column: usize, row: usize) -> usize {
        row * N + column
    }

    #[inline]
    pub fn in_bounds(column: usize, row: usize) -> bool {
        column < N && row < N
    }

    pub fn check_bounds((column, row): Cell) -> Result<(), EngineError> {
        if Self::in_bounds(column, row) {
            Ok(())
        } else {
            Err(EngineError::OutOfBounds { column, row })
        }
    }

    pub fn get(&self, column: usize, row: usize) -> Option<&Tile> {
        if !Self::in_bounds(column, row) {
            return None;
        }
        self.tiles.get(Self::idx(column, row))
    }

    /// Tile at an in-bounds cell.
    ///
    /// # Panics
    /// Panics if the cell is outside the board.
    #[inline]
    pub fn tile(&self, column: usize, row: usize) -> &Tile {
        assert!(Self::in_bounds(column, row), "({column}, {row}) off board");
        &self.tiles[Self::idx(column, row)]
    }

    /// All tiles in row-major order (top row first).
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn row(&self, row: usize) -> &[Tile] {
        &self.tiles[row * N..(row + 1) * N]
    }

    /// The id the next spawned tile will receive.
    pub fn next_id(&self) -> TileId {
        self.next_id
    }

    pub fn count_kind(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|t| t.kind == kind).count()
    }

    pub fn has_empty(&self) -> bool {
        self.tiles.iter().any(|t| t.kind.is_empty())
    }

    /// Return this board with `special` placed on the tile at `cell`.
    pub fn with_special(mut self, cell: Cell, special: SpecialKind) -> Result<Self, EngineError> {
        Self::check_bounds(cell)?;
        self.tiles[Self::idx(cell.0, cell.1)].special = special;
        Ok(self)
    }

    /// Return a copy with the tiles at `a` and `b` exchanged.
    ///
    /// Both tiles keep their id, kind and special; only their coordinates change.
    pub fn swapped(&self, a: Cell, b: Cell) -> Result<Board, EngineError> {
        Self::check_bounds(a)?;
        Self::check_bounds(b)?;
        if !is_adjacent(a, b) {
            return Err(EngineError::InvalidSwap { from: a, to: b });
        }
        let mut next = self.clone();
        let first = *self.tile(a.0, a.1);
        let second = *self.tile(b.0, b.1);
        next.place(a.0, a.1, second);
        next.place(b.0, b.1, first);
        Ok(next)
    }

    /// Put `tile` into a slot, re-stamping its coordinates.
    pub(crate) fn place(&mut self, column: usize, row: usize, mut tile: Tile) {
        tile.column = column;
        tile.row = row;
        self.tiles[Self::idx(column, row)] = tile;
    }

    pub(crate) fn tile_mut(&mut self, column: usize, row: usize) -> &mut Tile {
        &mut self.tiles[Self::idx(column, row)]
    }

    /// Create a tile with a freshly minted id.
    pub(crate) fn mint(&mut self, kind: TileKind, column: usize, row: usize) -> Tile {
        let id = self.next_id;
        self.next_id += 1;
        Tile::new(id, kind, column, row)
    }

    pub(crate) fn random_kind(&mut self, palette: &Palette) -> TileKind {
        let mut rng = fastrand::Rng::with_seed(self.rng_state);
        let kind = palette.pick(&mut rng);
        self.rng_state = rng.get_seed();
        kind
    }
}

/// True if two cells share an edge.
pub fn is_adjacent(a: Cell, b: Cell) -> bool {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1) == 1
}

/// Fill a new board with random kinds from `palette`.
///
/// A candidate kind is rejected when it would complete a run of three with
/// the two tiles already placed to its left or above it, so the fresh board
/// never contains a match.
pub fn create_board(palette: &Palette, seed: u64) -> Board {
    let mut board = Board {
        tiles: Vec::with_capacity(CELLS),
        next_id: 0,
        rng_state: seed,
    };
    for row in 0..N {
        for column in 0..N {
            let mut kind = board.random_kind(palette);
            while completes_run(&board, column, row, kind) {
                kind = board.random_kind(palette);
            }
            let tile = board.mint(kind, column, row);
            board.tiles.push(tile);
        }
    }
    tracing::debug!(seed, kinds = palette.len(), "created board");
    board
}

/// Whether `kind` at (column, row) would extend the two cells to the left or
/// the two cells above into a run. Only valid during row-major filling.
fn completes_run(board: &Board, column: usize, row: usize, kind: TileKind) -> bool {
    let left = column >= 2
        && board.tiles[Board::idx(column - 1, row)].kind == kind
        && board.tiles[Board::idx(column - 2, row)].kind == kind;
    let above = row >= 2
        && board.tiles[Board::idx(column, row - 1)].kind == kind
        && board.tiles[Board::idx(column, row - 2)].kind == kind;
    left || above
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..N {
            for tile in self.row(row) {
                let marker = match tile.special {
                    SpecialKind::None => ' ',
                    SpecialKind::LineClear => '-',
                    SpecialKind::ColorClear => '*',
                };
                write!(f, "{}{marker}", tile.kind.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
