//! Hex Core - Rules engine for the game of Hex
//!
//! This crate owns everything about a game's rules:
//! - Board storage, neighbor geometry and the `hexes` row encoding
//! - Incremental union-find win detection
//! - Move validation
//! - The game state machine (pending, playing, ended)

pub mod board;
pub mod error;
pub mod game;
pub mod notation;
pub mod player;
pub mod tracker;
pub mod validate;

// Re-exports for convenient access
pub use board::{Board, MoveData, EMPTY_SYMBOL, NEIGHBOR_OFFSETS};
pub use error::{HexError, Result};
pub use game::{Game, GameData, GameOptions, GameState, Outcome, WinReason, DEFAULT_BOARD_SIZE};
pub use notation::NotationError;
pub use player::{PlayerData, PlayerIndex, Side};
pub use tracker::{ConnectivityTracker, DisjointSet};
pub use validate::validate_move;
