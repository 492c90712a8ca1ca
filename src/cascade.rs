//! Cascade resolution: scoring, special creation, chain reactions, and the
//! detect -> resolve -> refill loop.
//!
//! One *pass* takes the match groups of a board and:
//! 1. scores each group as `len * POINTS_PER_TILE * multiplier`, summing the
//!    pass and flooring once;
//! 2. turns one tile of each run of 4 (line clear) or 5+ (colour clear) into
//!    a special carrier, preferring a swapped cell, else the group's middle;
//! 3. fires any special already sitting in a group, chaining through every
//!    special the blast reaches;
//! 4. clears the removal set (all group tiles and blast tiles, minus carriers)
//!    to [`TileKind::Empty`].
//!
//! The cleared board is refilled and scanned again until no group remains.

use crate::board::{Board, Cell, Palette, SpecialKind, Tile, TileId, TileKind};
use crate::constants::{
    COLOR_CLEAR_RUN, COMBO_MULTIPLIER, DIRECT_MULTIPLIER, LINE_CLEAR_RUN, MAX_CASCADE_PASSES,
    POINTS_PER_TILE,
};
use crate::effects::{CellSet, expand_chain};
use crate::matching::{MatchGroup, find_match_groups};
use crate::refill::refill;

/// The two cells of the player's swap, used for the first pass only.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SwapContext {
    pub a: Cell,
    pub b: Cell,
}

impl SwapContext {
    pub fn new(a: Cell, b: Cell) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn touches(&self, cell: Cell) -> bool {
        cell == self.a || cell == self.b
    }
}

/// A special tile created by a pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CreatedSpecial {
    pub cell: Cell,
    pub tile_id: TileId,
    pub kind: TileKind,
    pub special: SpecialKind,
}

/// Result of resolving one set of match groups.
#[derive(Clone, Debug)]
pub struct Resolution {
    /// The board with removed tiles turned into [`TileKind::Empty`].
    pub board: Board,
    pub points: u64,
    pub created_specials: Vec<CreatedSpecial>,
    /// Removed tiles as they were before clearing.
    pub removed: Vec<Tile>,
}

/// Special earned by a run of `len` tiles.
pub fn special_for_run(len: usize) -> SpecialKind {
    if len >= COLOR_CLEAR_RUN {
        SpecialKind::ColorClear
    } else if len == LINE_CLEAR_RUN {
        SpecialKind::LineClear
    } else {
        SpecialKind::None
    }
}

/// Score multiplier for a pass.
#[inline]
pub fn pass_multiplier(swap: Option<&SwapContext>) -> f64 {
    if swap.is_some() {
        DIRECT_MULTIPLIER
    } else {
        COMBO_MULTIPLIER
    }
}

fn choose_carrier<'g>(group: &'g MatchGroup, swap: Option<&SwapContext>) -> &'g Tile {
    swap.and_then(|s| group.tiles.iter().find(|t| s.touches(t.cell())))
        .unwrap_or_else(|| group.middle())
}

/// Record a carrier claim. On a shared cell the stronger special wins; equal
/// specials keep the earlier claim.
fn claim(carriers: &mut Vec<CreatedSpecial>, new: CreatedSpecial) {
    match carriers.iter_mut().find(|c| c.cell == new.cell) {
        Some(existing) => {
            if new.special > existing.special {
                *existing = new;
            }
        }
        None => carriers.push(new),
    }
}

/// Mark every tile in `removal`, then turn the marked tiles into
/// [`TileKind::Empty`] with no special. Returns the cleared board and the
/// removed tiles as marked.
pub fn clear_cells(board: &Board, removal: &CellSet) -> (Board, Vec<Tile>) {
    let mut next = board.clone();
    let mut removed = Vec::with_capacity(removal.len());
    for (column, row) in removal.iter() {
        let tile = next.tile_mut(column, row);
        tile.marked_for_removal = true;
        removed.push(*tile);
    }
    for (column, row) in removal.iter() {
        let tile = next.tile_mut(column, row);
        tile.kind = TileKind::Empty;
        tile.special = SpecialKind::None;
        tile.marked_for_removal = false;
    }
    (next, removed)
}

/// Resolve one pass of `groups` against `board`.
///
/// `swap` is the player's swap when this pass follows it directly; it selects
/// the 1.0 multiplier and steers carrier placement. Cascade passes pass `None`.
pub fn resolve(board: &Board, groups: &[MatchGroup], swap: Option<&SwapContext>) -> Resolution {
    let multiplier = pass_multiplier(swap);
    let mut raw_points = 0.0f64;
    let mut carriers: Vec<CreatedSpecial> = Vec::new();
    let mut matched = CellSet::new();

    for group in groups {
        raw_points += group.len() as f64 * POINTS_PER_TILE as f64 * multiplier;
        for tile in &group.tiles {
            matched.insert(tile.cell());
        }

        let special = special_for_run(group.len());
        if special == SpecialKind::None {
            continue;
        }
        let carrier = choose_carrier(group, swap);
        claim(
            &mut carriers,
            CreatedSpecial {
                cell: carrier.cell(),
                tile_id: carrier.id,
                kind: carrier.kind,
                special,
            },
        );
    }

    let mut removal = expand_chain(board, &matched);
    for carrier in &carriers {
        removal.remove(carrier.cell);
    }

    let (mut next, removed) = clear_cells(board, &removal);
    for carrier in &carriers {
        tracing::trace!(cell = ?carrier.cell, special = ?carrier.special, "special created");
        next.tile_mut(carrier.cell.0, carrier.cell.1).special = carrier.special;
    }

    Resolution {
        board: next,
        points: raw_points.floor() as u64,
        created_specials: carriers,
        removed,
    }
}

/// One completed detect -> resolve -> refill pass.
#[derive(Clone, Debug)]
pub struct PassReport {
    /// Zero-based pass number within the move.
    pub index: usize,
    pub groups: Vec<MatchGroup>,
    pub points: u64,
    pub created_specials: Vec<CreatedSpecial>,
    pub removed: Vec<Tile>,
    /// Board after clearing, before gravity.
    pub cleared: Board,
    /// Board after gravity and refill.
    pub board: Board,
}

/// The passes of a cascade, produced lazily one at a time.
///
/// Finite and single-use: iteration stops at the first pass with no groups
/// (or at [`MAX_CASCADE_PASSES`]) and cannot be restarted. The settled board is
/// available from [`Cascade::board`] once iteration ends.
pub struct Cascade<'p> {
    board: Board,
    palette: &'p Palette,
    swap: Option<SwapContext>,
    passes: usize,
    done: bool,
}

impl<'p> Cascade<'p> {
    /// Start a cascade from `board`. `swap` applies to the first pass only.
    pub fn new(board: Board, palette: &'p Palette, swap: Option<SwapContext>) -> Self {
        Self {
            board,
            palette,
            swap,
            passes: 0,
            done: false,
        }
    }

    /// The board after the most recent pass.
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn into_board(self) -> Board {
        self.board
    }
}

impl Iterator for Cascade<'_> {
    type Item = PassReport;

    fn next(&mut self) -> Option<PassReport> {
        if self.done {
            return None;
        }
        if self.passes >= MAX_CASCADE_PASSES {
            tracing::warn!(passes = self.passes, "cascade pass limit reached");
            self.done = true;
            return None;
        }

        let groups = find_match_groups(&self.board);
        if groups.is_empty() {
            self.done = true;
            return None;
        }

        let swap = self.swap.take();
        let resolution = resolve(&self.board, &groups, swap.as_ref());
        let refilled = refill(&resolution.board, self.palette);
        tracing::debug!(
            pass = self.passes,
            groups = groups.len(),
            removed = resolution.removed.len(),
            specials = resolution.created_specials.len(),
            points = resolution.points,
            "cascade pass"
        );

        let report = PassReport {
            index: self.passes,
            groups,
            points: resolution.points,
            created_specials: resolution.created_specials,
            removed: resolution.removed,
            cleared: resolution.board,
            board: refilled.clone(),
        };
        self.board = refilled;
        self.passes += 1;
        Some(report)
    }
}

impl std::iter::FusedIterator for Cascade<'_> {}

/// Final state of a fully drained cascade.
#[derive(Clone, Debug)]
pub struct CascadeOutcome {
    pub board: Board,
    /// Sum of every pass's points.
    pub points: u64,
    pub passes: Vec<PassReport>,
}

/// Run passes until the board is idle-stable.
pub fn run_cascade(board: &Board, palette: &Palette, swap: Option<SwapContext>) -> CascadeOutcome {
    let mut cascade = Cascade::new(board.clone(), palette, swap);
    let passes: Vec<PassReport> = cascade.by_ref().collect();
    let points = passes.iter().map(|p| p.points).sum();
    CascadeOutcome {
        board: cascade.into_board(),
        points,
        passes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn background(column: usize, row: usize) -> TileKind {
        [TileKind::Red, TileKind::Green, TileKind::Blue][(column + 2 * row) % 3]
    }

    fn board_with(cells: &[(Cell, TileKind)]) -> Board {
        Board::from_fn(0, |c, r| {
            cells
                .iter()
                .find(|(cell, _)| *cell == (c, r))
                .map(|&(_, k)| k)
                .unwrap_or_else(|| background(c, r))
        })
    }

    fn row_run(row: usize, columns: std::ops::Range<usize>, kind: TileKind) -> Vec<(Cell, TileKind)> {
        columns.map(|c| ((c, row), kind)).collect()
    }

    #[test]
    fn test_special_thresholds() {
        assert_eq!(special_for_run(3), SpecialKind::None);
        assert_eq!(special_for_run(4), SpecialKind::LineClear);
        assert_eq!(special_for_run(5), SpecialKind::ColorClear);
        assert_eq!(special_for_run(7), SpecialKind::ColorClear);
    }

    #[test]
    fn test_run_of_three_clears_without_special() {
        let board = board_with(&row_run(1, 2..5, TileKind::Yellow));
        let groups = find_match_groups(&board);
        let res = resolve(&board, &groups, None);
        assert_eq!(res.removed.len(), 3);
        assert!(res.created_specials.is_empty());
        assert_eq!(res.points, 90); // 3 * 20 * 1.5
        for c in 2..5 {
            assert_eq!(res.board.tile(c, 1).kind, TileKind::Empty);
        }
        assert!(res.removed.iter().all(|t| t.marked_for_removal));
        assert!(res.board.tiles().iter().all(|t| !t.marked_for_removal));
    }

    #[test]
    fn test_swap_cell_becomes_carrier() {
        let board = board_with(&row_run(0, 0..4, TileKind::Yellow));
        let groups = find_match_groups(&board);
        let swap = SwapContext::new((3, 0), (3, 1));
        let res = resolve(&board, &groups, Some(&swap));
        assert_eq!(res.created_specials.len(), 1);
        assert_eq!(res.created_specials[0].cell, (3, 0));
        assert_eq!(res.board.tile(3, 0).special, SpecialKind::LineClear);
        assert_eq!(res.board.tile(3, 0).kind, TileKind::Yellow);
        assert_eq!(res.points, 80);
    }

    #[test]
    fn test_middle_becomes_carrier_without_swap() {
        let board = board_with(&row_run(0, 1..6, TileKind::Yellow));
        let groups = find_match_groups(&board);
        let res = resolve(&board, &groups, None);
        assert_eq!(res.created_specials[0].cell, (3, 0));
        assert_eq!(res.created_specials[0].special, SpecialKind::ColorClear);
        assert_eq!(res.removed.len(), 4);
    }

    #[test]
    fn test_run_of_four_carrier_is_second_tile() {
        let board = board_with(&row_run(2, 0..4, TileKind::Yellow));
        let groups = find_match_groups(&board);
        let res = resolve(&board, &groups, None);
        assert_eq!(res.created_specials[0].cell, (1, 2));
        assert_eq!(res.board.tile(1, 2).special, SpecialKind::LineClear);
        assert_eq!(res.board.tile(2, 2).kind, TileKind::Empty);
    }

    #[test]
    fn test_swap_outside_group_falls_back_to_middle() {
        let board = board_with(&row_run(2, 0..4, TileKind::Yellow));
        let groups = find_match_groups(&board);
        let swap = SwapContext::new((6, 6), (6, 7));
        let res = resolve(&board, &groups, Some(&swap));
        assert_eq!(res.created_specials[0].cell, (1, 2));
    }

    #[test]
    fn test_l_shape_scores_each_group_and_removes_union() {
        let mut cells = row_run(0, 0..3, TileKind::Yellow);
        cells.push(((0, 1), TileKind::Yellow));
        cells.push(((0, 2), TileKind::Yellow));
        let board = board_with(&cells);
        let groups = find_match_groups(&board);
        assert_eq!(groups.len(), 2);
        let res = resolve(&board, &groups, None);
        assert_eq!(res.removed.len(), 5);
        assert_eq!(res.points, 180);
    }

    #[test]
    fn test_stronger_special_wins_shared_carrier() {
        // Horizontal run of 5 and vertical run of 4 crossing at the swapped cell.
        let mut cells = row_run(3, 0..5, TileKind::Yellow);
        for r in 0..3 {
            cells.push(((2, r), TileKind::Yellow));
        }
        let board = board_with(&cells);
        let groups = find_match_groups(&board);
        let swap = SwapContext::new((2, 3), (2, 4));
        let res = resolve(&board, &groups, Some(&swap));
        assert_eq!(res.created_specials.len(), 1);
        assert_eq!(res.created_specials[0].special, SpecialKind::ColorClear);
        assert_eq!(res.board.tile(2, 3).special, SpecialKind::ColorClear);
        assert_eq!(res.removed.len(), 7);
    }

    #[test]
    fn test_existing_line_clear_in_group_clears_row() {
        let board = board_with(&row_run(4, 0..3, TileKind::Yellow))
            .with_special((1, 4), SpecialKind::LineClear)
            .unwrap();
        let groups = find_match_groups(&board);
        let res = resolve(&board, &groups, None);
        assert_eq!(res.removed.len(), crate::constants::N);
        assert!(res.board.row(4).iter().all(|t| t.kind == TileKind::Empty));
    }

    #[test]
    fn test_carrier_survives_chain_blast() {
        // Run of 4 on row 0 whose carrier (the swapped cell) already holds a
        // line clear: the row is blasted but the carrier stays.
        let board = board_with(&row_run(0, 0..4, TileKind::Yellow))
            .with_special((0, 0), SpecialKind::LineClear)
            .unwrap();
        let groups = find_match_groups(&board);
        let swap = SwapContext::new((0, 0), (0, 1));
        let res = resolve(&board, &groups, Some(&swap));
        assert_eq!(res.board.tile(0, 0).kind, TileKind::Yellow);
        assert_eq!(res.board.tile(0, 0).special, SpecialKind::LineClear);
        assert_eq!(res.removed.len(), crate::constants::N - 1);
    }

    #[test]
    fn test_cascade_on_stable_board_yields_nothing() {
        let palette = Palette::new(&[TileKind::Red, TileKind::Green, TileKind::Blue]).unwrap();
        let board = Board::from_fn(5, background);
        let mut cascade = Cascade::new(board.clone(), &palette, None);
        assert!(cascade.next().is_none());
        assert!(cascade.next().is_none());
        assert_eq!(cascade.into_board(), board);
    }

    #[test]
    fn test_cascade_reaches_stable_board() {
        let palette = Palette::new(&TileKind::ALL[..4]).unwrap();
        let board = board_with(&row_run(5, 0..3, TileKind::Yellow));
        let outcome = run_cascade(&board, &palette, None);
        assert!(!outcome.passes.is_empty());
        assert!(find_match_groups(&outcome.board).is_empty());
        assert!(!outcome.board.has_empty());
        assert_eq!(outcome.points, outcome.passes.iter().map(|p| p.points).sum::<u64>());
        assert_eq!(outcome.passes[0].points, 90);
        for (i, pass) in outcome.passes.iter().enumerate() {
            assert_eq!(pass.index, i);
        }
    }
}
