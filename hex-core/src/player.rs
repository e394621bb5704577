//! Seats, identities and board sides

use serde::{Deserialize, Serialize};
use std::fmt;

/// Seat at the table. The first player connects TOP to BOTTOM,
/// the second player connects LEFT to RIGHT.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PlayerIndex {
    First = 0,
    Second = 1,
}

impl PlayerIndex {
    pub const ALL: [PlayerIndex; 2] = [PlayerIndex::First, PlayerIndex::Second];

    pub fn opponent(self) -> Self {
        match self {
            PlayerIndex::First => PlayerIndex::Second,
            PlayerIndex::Second => PlayerIndex::First,
        }
    }

    /// Position in two-element per-player arrays
    pub fn index(self) -> usize {
        self as usize
    }

    /// The two edges this player has to link
    pub fn target_sides(self) -> [Side; 2] {
        match self {
            PlayerIndex::First => [Side::Top, Side::Bottom],
            PlayerIndex::Second => [Side::Left, Side::Right],
        }
    }

    /// Board character used in the serialized `hexes` rows
    pub fn symbol(self) -> char {
        match self {
            PlayerIndex::First => '0',
            PlayerIndex::Second => '1',
        }
    }
}

impl From<PlayerIndex> for u8 {
    fn from(player: PlayerIndex) -> Self {
        player as u8
    }
}

impl TryFrom<u8> for PlayerIndex {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PlayerIndex::First),
            1 => Ok(PlayerIndex::Second),
            other => Err(format!("player index must be 0 or 1, got {}", other)),
        }
    }
}

impl fmt::Display for PlayerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", *self as u8)
    }
}

/// Opaque player identity (guest or account id).
/// Never interpreted beyond equality.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerData {
    pub id: String,
}

impl PlayerData {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Board edge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Top,
    Left,
    Bottom,
    Right,
}

impl Side {
    /// Whether the cell lies on this edge of a `size` x `size` board
    pub fn contains(self, row: usize, col: usize, size: usize) -> bool {
        match self {
            Side::Top => row == 0,
            Side::Bottom => row + 1 == size,
            Side::Left => col == 0,
            Side::Right => col + 1 == size,
        }
    }
}
