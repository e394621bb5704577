//! Game lifecycle: pending -> playing -> ended

use crate::board::{Board, MoveData};
use crate::error::{HexError, Result};
use crate::player::{PlayerData, PlayerIndex};
use crate::tracker::ConnectivityTracker;
use crate::validate::validate_move;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Board size used when none is requested
pub const DEFAULT_BOARD_SIZE: usize = 11;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Lifecycle stage
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    /// Created or loaded, waiting for an explicit start
    Pending,
    Playing,
    /// Terminal, outcome is decided
    Ended,
}

/// Why a game was won
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    Connection,
    Resignation,
    Forfeit,
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Undetermined,
    WonBy { winner: PlayerIndex, reason: WinReason },
}

impl Outcome {
    pub fn winner(&self) -> Option<PlayerIndex> {
        match *self {
            Outcome::Undetermined => None,
            Outcome::WonBy { winner, .. } => Some(winner),
        }
    }
}

/// Snapshot exchanged with storage and clients
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameData {
    pub players: [PlayerData; 2],

    /// A loaded game with `started == false` stays pending until
    /// [`Game::start`] is called; `true` resumes it mid-play.
    pub started: bool,

    pub size: usize,

    /// Serialized board, see [`Board::serialize`]
    pub hexes: Vec<String>,
}

/// Parameters for a fresh game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOptions {
    pub size: usize,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_BOARD_SIZE,
        }
    }
}

// ============================================================================
// GAME
// ============================================================================

/// A single Hex game. Owns its board and both connectivity trackers;
/// every mutation goes through [`Game::apply_move`], [`Game::resign`],
/// [`Game::force_end`] or [`Game::start`].
///
/// Not internally synchronized: callers sharing a game across tasks must
/// serialize access themselves.
#[derive(Clone, Debug)]
pub struct Game {
    players: [PlayerData; 2],
    board: Board,
    trackers: [ConnectivityTracker; 2],
    current_player: PlayerIndex,
    moves: Vec<MoveData>,
    state: GameState,
    outcome: Outcome,
}

impl Game {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// New pending game on an empty board
    pub fn new(players: [PlayerData; 2], options: GameOptions) -> Result<Self> {
        let board = Board::new(options.size)?;
        Ok(Self {
            players,
            trackers: Self::fresh_trackers(options.size),
            board,
            current_player: PlayerIndex::First,
            moves: Vec::new(),
            state: GameState::Pending,
            outcome: Outcome::Undetermined,
        })
    }

    /// Rebuild a game from a snapshot.
    ///
    /// The side to move is derived from the stone counts and both trackers
    /// are replayed from the board. A board that already holds a connection
    /// loads as ended. Move history is not part of the snapshot.
    pub fn from_data(data: GameData) -> Result<Self> {
        if data.size == 0 {
            return Err(HexError::InvalidSize(data.size));
        }
        if data.hexes.len() != data.size {
            return Err(HexError::MalformedBoard(format!(
                "expected {} rows, got {}",
                data.size,
                data.hexes.len()
            )));
        }

        let board = Board::deserialize(&data.hexes)?;
        let first = board.stone_count(PlayerIndex::First);
        let second = board.stone_count(PlayerIndex::Second);
        let current_player = if first == second {
            PlayerIndex::First
        } else if first == second + 1 {
            PlayerIndex::Second
        } else {
            return Err(HexError::MalformedBoard(format!(
                "impossible stone counts: {} for player 0, {} for player 1",
                first, second
            )));
        };

        let mut trackers = Self::fresh_trackers(data.size);
        for (row, col, owner) in board.stones() {
            trackers[owner.index()].record_move(&board, row, col);
        }

        let winners: Vec<PlayerIndex> = PlayerIndex::ALL
            .into_iter()
            .filter(|p| trackers[p.index()].has_won())
            .collect();

        let (state, outcome) = match winners.as_slice() {
            [] if data.started => (GameState::Playing, Outcome::Undetermined),
            [] => (GameState::Pending, Outcome::Undetermined),
            [winner] => (
                GameState::Ended,
                Outcome::WonBy {
                    winner: *winner,
                    reason: WinReason::Connection,
                },
            ),
            _ => {
                return Err(HexError::MalformedBoard(
                    "both players connect their sides".to_string(),
                ))
            }
        };

        Ok(Self {
            players: data.players,
            board,
            trackers,
            current_player,
            moves: Vec::new(),
            state,
            outcome,
        })
    }

    fn fresh_trackers(size: usize) -> [ConnectivityTracker; 2] {
        PlayerIndex::ALL.map(|player| ConnectivityTracker::new(player, size))
    }

    /// Snapshot of the current position
    pub fn to_data(&self) -> GameData {
        GameData {
            players: self.players.clone(),
            started: self.state != GameState::Pending,
            size: self.board.size(),
            hexes: self.board.serialize(),
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn winner(&self) -> Option<PlayerIndex> {
        self.outcome.winner()
    }

    pub fn current_player(&self) -> PlayerIndex {
        self.current_player
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn players(&self) -> &[PlayerData; 2] {
        &self.players
    }

    pub fn player(&self, index: PlayerIndex) -> &PlayerData {
        &self.players[index.index()]
    }

    /// Seat of the player with this identity
    pub fn player_index(&self, id: &str) -> Option<PlayerIndex> {
        PlayerIndex::ALL
            .into_iter()
            .find(|p| self.players[p.index()].id == id)
    }

    /// Moves applied since creation or load, in order
    pub fn moves(&self) -> &[MoveData] {
        &self.moves
    }

    /// Whether the player's stones currently link their target sides
    pub fn has_won(&self, player: PlayerIndex) -> bool {
        self.trackers[player.index()].has_won()
    }

    // ========================================================================
    // TRANSITIONS
    // ========================================================================

    /// pending -> playing. Starting a game already in play is a no-op.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            GameState::Ended => Err(HexError::GameEnded),
            GameState::Playing => Ok(()),
            GameState::Pending => {
                self.state = GameState::Playing;
                tracing::debug!(size = self.board.size(), "game started");
                Ok(())
            }
        }
    }

    /// Check a move without applying it
    pub fn validate_move(&self, player: PlayerIndex, mv: MoveData) -> Result<()> {
        validate_move(self, player, mv)
    }

    /// Place `player`'s stone at `mv` and pass the turn.
    ///
    /// On error nothing has changed. Returns the outcome after the move.
    pub fn apply_move(&mut self, player: PlayerIndex, mv: MoveData) -> Result<Outcome> {
        validate_move(self, player, mv)?;

        self.board.set(mv.row, mv.col, player)?;
        let connected = self.trackers[player.index()].record_move(&self.board, mv.row, mv.col);
        self.moves.push(mv);
        self.current_player = player.opponent();

        if connected {
            self.finish(player, WinReason::Connection);
        }

        Ok(self.outcome)
    }

    /// The resigning player's opponent wins
    pub fn resign(&mut self, player: PlayerIndex) -> Result<Outcome> {
        if self.state == GameState::Ended {
            return Err(HexError::GameEnded);
        }
        self.finish(player.opponent(), WinReason::Resignation);
        Ok(self.outcome)
    }

    /// End the game on behalf of an external collaborator
    /// (disconnection policy, clock, moderation).
    pub fn force_end(&mut self, reason: WinReason, winner: PlayerIndex) -> Result<Outcome> {
        if self.state == GameState::Ended {
            return Err(HexError::GameEnded);
        }
        self.finish(winner, reason);
        Ok(self.outcome)
    }

    fn finish(&mut self, winner: PlayerIndex, reason: WinReason) {
        self.state = GameState::Ended;
        self.outcome = Outcome::WonBy { winner, reason };
        tracing::info!(%winner, ?reason, moves = self.moves.len(), "game ended");
    }

    // ========================================================================
    // WINNING PATH
    // ========================================================================

    /// One chain of the winner's cells linking both target sides, ordered
    /// from the first side to the second. `None` unless won by connection.
    pub fn winning_path(&self) -> Option<Vec<MoveData>> {
        let winner = match self.outcome {
            Outcome::WonBy { winner, reason: WinReason::Connection } => winner,
            _ => return None,
        };

        let size = self.board.size();
        let [from_side, to_side] = winner.target_sides();
        let owned = |row: usize, col: usize| self.board.get(row, col).ok().flatten() == Some(winner);

        let mut parent: FxHashMap<(usize, usize), Option<(usize, usize)>> = FxHashMap::default();
        let mut queue = VecDeque::new();

        for (row, col, owner) in self.board.stones() {
            if owner == winner && from_side.contains(row, col, size) {
                parent.insert((row, col), None);
                queue.push_back((row, col));
            }
        }

        while let Some((row, col)) = queue.pop_front() {
            if to_side.contains(row, col, size) {
                let mut path = vec![MoveData::new(row, col)];
                let mut cursor = parent.get(&(row, col)).copied().flatten();
                while let Some((r, c)) = cursor {
                    path.push(MoveData::new(r, c));
                    cursor = parent.get(&(r, c)).copied().flatten();
                }
                path.reverse();
                return Some(path);
            }

            for next in self.board.neighbors(row, col) {
                if owned(next.0, next.1) && !parent.contains_key(&next) {
                    parent.insert(next, Some((row, col)));
                    queue.push_back(next);
                }
            }
        }

        None
    }
}

// ============================================================================
// TESTS
// ============================================================================
