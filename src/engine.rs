//! Move entry points: a player swap or a power-up, resolved to a stable board.
//!
//! Every function here takes the current board by reference and returns a
//! new one; the input board is never modified. A move always runs to
//! completion in a single call. Callers that want to animate can walk
//! [`MoveOutcome::passes`], which holds every intermediate board in order.

use crate::board::{Board, Cell, Palette, SpecialKind};
use crate::cascade::{CascadeOutcome, PassReport, SwapContext, clear_cells, run_cascade};
use crate::effects::{PowerUp, effect_area, expand_chain};
use crate::error::EngineError;
use crate::matching::find_match_groups;
use crate::refill::refill;

/// What a move did.
#[derive(Clone, Debug)]
pub struct MoveOutcome {
    /// Idle-stable board after the move.
    pub board: Board,
    /// Points scored across every pass of the move.
    pub points: u64,
    /// Intermediate passes, first to last.
    pub passes: Vec<PassReport>,
    /// False when a swap made no match and was reverted.
    pub accepted: bool,
}

impl MoveOutcome {
    fn rejected(board: &Board) -> Self {
        Self {
            board: board.clone(),
            points: 0,
            passes: Vec::new(),
            accepted: false,
        }
    }

    fn from_cascade(outcome: CascadeOutcome) -> Self {
        Self {
            board: outcome.board,
            points: outcome.points,
            passes: outcome.passes,
            accepted: true,
        }
    }
}

/// Swap two adjacent tiles and resolve the resulting cascade.
///
/// A swap that forms no group is reverted unless one of the two tiles is a
/// colour-clear special. The first pass scores at the direct multiplier and
/// places new specials on the swapped cells where possible.
///
/// # Errors
/// - [`EngineError::OutOfBounds`] if either cell is off the board
/// - [`EngineError::InvalidSwap`] if the cells are not orthogonal neighbours
pub fn play_swap(board: &Board, palette: &Palette, a: Cell, b: Cell) -> Result<MoveOutcome, EngineError> {
    let swapped = board.swapped(a, b)?;

    let color_clear_moved = [a, b]
        .iter()
        .any(|&(c, r)| swapped.tile(c, r).special == SpecialKind::ColorClear);
    if !color_clear_moved && find_match_groups(&swapped).is_empty() {
        tracing::debug!(?a, ?b, "swap made no match, reverted");
        return Ok(MoveOutcome::rejected(board));
    }

    let outcome = run_cascade(&swapped, palette, Some(SwapContext::new(a, b)));
    tracing::debug!(?a, ?b, points = outcome.points, passes = outcome.passes.len(), "swap resolved");
    Ok(MoveOutcome::from_cascade(outcome))
}

/// Fire `power_up` at (column, row) and resolve the resulting cascade.
///
/// The removal shape is expanded through any special tiles it covers, cleared,
/// and refilled. The power-up itself scores nothing; passes that follow score
/// at the combo multiplier.
///
/// # Errors
/// - [`EngineError::OutOfBounds`] if the target is off the board
pub fn play_power_up(
    board: &Board,
    palette: &Palette,
    power_up: PowerUp,
    column: usize,
    row: usize,
) -> Result<MoveOutcome, EngineError> {
    Board::check_bounds((column, row))?;

    let area = effect_area(board, power_up.into(), (column, row));
    let removal = expand_chain(board, &area);
    let (cleared, removed) = clear_cells(board, &removal);
    tracing::debug!(%power_up, column, row, removed = removal.len(), "power-up fired");

    let refilled = refill(&cleared, palette);
    let mut outcome = run_cascade(&refilled, palette, None);
    for pass in &mut outcome.passes {
        pass.index += 1;
    }
    outcome.passes.insert(
        0,
        PassReport {
            index: 0,
            groups: Vec::new(),
            points: 0,
            created_specials: Vec::new(),
            removed,
            cleared,
            board: refilled,
        },
    );
    Ok(MoveOutcome::from_cascade(outcome))
}

/// Run the cascade loop on `board` with no player move.
///
/// On a board that is already idle-stable this returns the same board and
/// zero points.
pub fn stabilize(board: &Board, palette: &Palette) -> MoveOutcome {
    MoveOutcome::from_cascade(run_cascade(board, palette, None))
}
