//! API error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hex_core::HexError;
use serde_json::json;

use crate::state::GameId;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("game {0} not found")]
    GameNotFound(GameId),

    #[error("{0:?} is not a player of this game")]
    UnknownPlayer(String),

    #[error("board size {size} exceeds the maximum of {max}")]
    SizeTooLarge { size: usize, max: usize },

    #[error(transparent)]
    Game(#[from] HexError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::GameNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UnknownPlayer(_) => StatusCode::FORBIDDEN,
            ApiError::SizeTooLarge { .. } => StatusCode::BAD_REQUEST,
            ApiError::Game(err) => match err {
                HexError::InvalidSize(_)
                | HexError::OutOfBounds { .. }
                | HexError::MalformedBoard(_) => StatusCode::BAD_REQUEST,
                HexError::CellOccupied { .. }
                | HexError::GameNotStarted
                | HexError::GameEnded
                | HexError::NotYourTurn { .. } => StatusCode::CONFLICT,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_core::PlayerIndex;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::GameNotFound(4).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(HexError::NotYourTurn { current: PlayerIndex::First }).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(HexError::OutOfBounds { row: 9, col: 0, size: 5 }).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_message_passes_through() {
        let err = ApiError::from(HexError::GameEnded);
        assert_eq!(err.to_string(), "game has already ended");
    }
}
