//! Server state management
//!
//! Registry of live games. Each game sits behind its own mutex so that
//! submissions to one game are serialized while other games proceed.

use hex_core::Game;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use crate::ServerConfig;

pub type GameId = u64;

/// One game, shared between request handlers
pub type SharedGame = Arc<Mutex<Game>>;

/// Server-wide shared state
pub struct ServerState {
    pub max_board_size: usize,
    games: RwLock<FxHashMap<GameId, SharedGame>>,
    next_id: AtomicU64,
}

impl ServerState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            max_board_size: config.max_board_size,
            games: RwLock::new(FxHashMap::default()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a game and hand back its id
    pub fn insert(&self, game: Game) -> GameId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.games
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(Mutex::new(game)));
        id
    }

    pub fn get(&self, id: GameId) -> Option<SharedGame> {
        self.games
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.games.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(&ServerConfig::default())
    }
}

/// Lock a game. Game transitions validate before they commit, so a
/// panic in another holder cannot have left it half-updated.
pub fn lock_game(game: &SharedGame) -> MutexGuard<'_, Game> {
    game.lock().unwrap_or_else(PoisonError::into_inner)
}
