//! Game API endpoints
//!
//! Maps player identities to seats and forwards actions to the game engine.
//! Every action locks only the game it targets.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use hex_core::{
    Game, GameData, GameOptions, GameState, MoveData, Outcome, PlayerData, PlayerIndex, WinReason,
    DEFAULT_BOARD_SIZE,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::{lock_game, GameId, ServerState};

/// Everything a client needs to render a game
#[derive(Serialize)]
pub struct GameView {
    pub id: GameId,
    #[serde(flatten)]
    pub data: GameData,
    pub state: GameState,
    pub current_player: PlayerIndex,
    pub outcome: Outcome,
    pub moves: Vec<MoveData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_path: Option<Vec<MoveData>>,
}

impl GameView {
    pub fn new(id: GameId, game: &Game) -> Self {
        Self {
            id,
            data: game.to_data(),
            state: game.state(),
            current_player: game.current_player(),
            outcome: game.outcome(),
            moves: game.moves().to_vec(),
            winning_path: game.winning_path(),
        }
    }
}

#[derive(Deserialize)]
pub struct CreateGameRequest {
    pub players: [String; 2],
    pub size: Option<usize>,
    #[serde(default)]
    pub start: bool,
}

#[derive(Deserialize)]
pub struct PlayerRequest {
    pub player: String,
}

#[derive(Deserialize)]
pub struct MoveRequest {
    pub player: String,
    pub row: usize,
    pub col: usize,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// Create a fresh game, optionally started right away
pub async fn create_game(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<GameView>), ApiError> {
    let size = req.size.unwrap_or(DEFAULT_BOARD_SIZE);
    check_size(&state, size)?;

    let [first, second] = req.players;
    let mut game = Game::new([PlayerData::new(first), PlayerData::new(second)], GameOptions { size })?;
    if req.start {
        game.start()?;
    }

    let view_game = game.clone();
    let id = state.insert(game);
    tracing::info!(game = id, size, "game created");

    Ok((StatusCode::CREATED, Json(GameView::new(id, &view_game))))
}

/// Register a game from a snapshot
pub async fn load_game(
    State(state): State<Arc<ServerState>>,
    Json(data): Json<GameData>,
) -> Result<(StatusCode, Json<GameView>), ApiError> {
    check_size(&state, data.size)?;

    let game = Game::from_data(data)?;
    let view_game = game.clone();
    let id = state.insert(game);
    tracing::info!(game = id, state = ?view_game.state(), "game loaded");

    Ok((StatusCode::CREATED, Json(GameView::new(id, &view_game))))
}

pub async fn get_game(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<GameId>,
) -> Result<Json<GameView>, ApiError> {
    let shared = state.get(id).ok_or(ApiError::GameNotFound(id))?;
    let game = lock_game(&shared);
    Ok(Json(GameView::new(id, &game)))
}

pub async fn start_game(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<GameId>,
) -> Result<Json<GameView>, ApiError> {
    act(&state, id, |game| Ok(game.start()?))
}

pub async fn make_move(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<GameId>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<GameView>, ApiError> {
    act(&state, id, |game| {
        let player = seat(game, &req.player)?;
        game.apply_move(player, MoveData::new(req.row, req.col))?;
        Ok(())
    })
}

pub async fn resign(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<GameId>,
    Json(req): Json<PlayerRequest>,
) -> Result<Json<GameView>, ApiError> {
    act(&state, id, |game| {
        let player = seat(game, &req.player)?;
        game.resign(player)?;
        Ok(())
    })
}

/// External forfeit signal (disconnection, clock): the named player loses
pub async fn forfeit(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<GameId>,
    Json(req): Json<PlayerRequest>,
) -> Result<Json<GameView>, ApiError> {
    act(&state, id, |game| {
        let player = seat(game, &req.player)?;
        game.force_end(WinReason::Forfeit, player.opponent())?;
        Ok(())
    })
}

// ============================================================================
// HELPERS
// ============================================================================

fn check_size(state: &ServerState, size: usize) -> Result<(), ApiError> {
    if size > state.max_board_size {
        return Err(ApiError::SizeTooLarge {
            size,
            max: state.max_board_size,
        });
    }
    Ok(())
}

fn seat(game: &Game, player_id: &str) -> Result<PlayerIndex, ApiError> {
    game.player_index(player_id)
        .ok_or_else(|| ApiError::UnknownPlayer(player_id.to_string()))
}

/// Run one action on one game while holding that game's lock
fn act<F>(state: &ServerState, id: GameId, action: F) -> Result<Json<GameView>, ApiError>
where
    F: FnOnce(&mut Game) -> Result<(), ApiError>,
{
    let shared = state.get(id).ok_or(ApiError::GameNotFound(id))?;
    let mut game = lock_game(&shared);

    if let Err(err) = action(&mut game) {
        tracing::warn!(game = id, error = %err, "action rejected");
        return Err(err);
    }

    Ok(Json(GameView::new(id, &game)))
}
