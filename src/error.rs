//! Engine error type.

use thiserror::Error;

use crate::board::Cell;

/// Usage errors reported by the engine.
///
/// Every engine operation is total over valid input; these only signal
/// caller mistakes and are raised before any board is modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("cell ({column}, {row}) is outside the board")]
    OutOfBounds { column: usize, row: usize },
    #[error("cells {from:?} and {to:?} are not orthogonally adjacent")]
    InvalidSwap { from: Cell, to: Cell },
    #[error("a palette needs at least 3 distinct kinds, got {found}")]
    TooFewKinds { found: usize },
    #[error("the empty kind cannot be part of a palette")]
    EmptyKind,
}
