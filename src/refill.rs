//! Gravity and refill.

use crate::board::{Board, Palette};
use crate::constants::N;

/// Let tiles fall into empty slots and spawn new tiles at the top.
///
/// Each column is compacted downward keeping the relative order of its
/// surviving tiles (ids, kinds and specials unchanged, rows re-stamped). The
/// vacated top slots are then filled top to bottom with random kinds from
/// `palette` and fresh ids. Spawns are not filtered against matches.
pub fn refill(board: &Board, palette: &Palette) -> Board {
    let mut next = board.clone();
    let mut spawned = 0usize;

    for column in 0..N {
        // Walk bottom-up, dropping each survivor onto the lowest free slot.
        let mut write = N;
        for row in (0..N).rev() {
            let tile = *board.tile(column, row);
            if tile.kind.is_empty() {
                continue;
            }
            write -= 1;
            next.place(column, write, tile);
        }

        for row in 0..write {
            let kind = next.random_kind(palette);
            let tile = next.mint(kind, column, row);
            next.place(column, row, tile);
        }
        spawned += write;
    }

    tracing::trace!(spawned, "refilled board");
    next
}
