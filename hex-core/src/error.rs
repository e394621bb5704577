//! Error taxonomy for board and game operations

use crate::player::PlayerIndex;

/// Every way a board or game action can be refused.
///
/// All variants are local validation failures: they are returned before any
/// state is touched, so a caller can always retry with different input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HexError {
    #[error("invalid board size: {0}")]
    InvalidSize(usize),

    #[error("cell ({row}, {col}) is outside a board of size {size}")]
    OutOfBounds { row: usize, col: usize, size: usize },

    #[error("cell ({row}, {col}) is already occupied")]
    CellOccupied { row: usize, col: usize },

    #[error("malformed board: {0}")]
    MalformedBoard(String),

    #[error("game has not started yet")]
    GameNotStarted,

    #[error("game has already ended")]
    GameEnded,

    #[error("not your turn: {current} is to play")]
    NotYourTurn { current: PlayerIndex },
}

pub type Result<T> = std::result::Result<T, HexError>;
