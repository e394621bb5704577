//! Move legality checks

use crate::board::MoveData;
use crate::error::{HexError, Result};
use crate::game::{Game, GameState};
use crate::player::PlayerIndex;

/// Check whether `player` may place a stone at `mv` right now.
///
/// Pure: never mutates the game. Checks run in a fixed order so a given
/// request always fails the same way: lifecycle first, then turn, then
/// the target cell.
pub fn validate_move(game: &Game, player: PlayerIndex, mv: MoveData) -> Result<()> {
    match game.state() {
        GameState::Ended => return Err(HexError::GameEnded),
        GameState::Pending => return Err(HexError::GameNotStarted),
        GameState::Playing => {}
    }

    if player != game.current_player() {
        return Err(HexError::NotYourTurn {
            current: game.current_player(),
        });
    }

    if game.board().get(mv.row, mv.col)?.is_some() {
        return Err(HexError::CellOccupied {
            row: mv.row,
            col: mv.col,
        });
    }

    Ok(())
}
