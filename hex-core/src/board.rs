//! Rhombic hex board with row/column coordinates

use crate::error::{HexError, Result};
use crate::player::PlayerIndex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Character used for an empty cell in serialized rows
pub const EMPTY_SYMBOL: char = '.';

/// Neighbor offsets (d_row, d_col) on the rhombic grid.
/// Besides the four orthogonal cells, a hex touches the
/// upper-right and lower-left diagonals.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 6] = [
    (0, -1),  // W
    (0, 1),   // E
    (-1, 0),  // NW
    (-1, 1),  // NE
    (1, -1),  // SW
    (1, 0),   // SE
];

/// A stone placement, zero-based
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveData {
    pub row: usize,
    pub col: usize,
}

impl MoveData {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// n x n grid of cells, each empty or owned by one player
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Option<PlayerIndex>>,
}

impl Board {
    /// Empty board of the given size
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(HexError::InvalidSize(size));
        }
        Ok(Self {
            size,
            cells: vec![None; size * size],
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size
    }

    pub(crate) fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        if self.in_bounds(row, col) {
            Ok(())
        } else {
            Err(HexError::OutOfBounds { row, col, size: self.size })
        }
    }

    /// Flat index of an in-bounds cell
    pub(crate) fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Owner of a cell, `None` when empty
    pub fn get(&self, row: usize, col: usize) -> Result<Option<PlayerIndex>> {
        self.check_bounds(row, col)?;
        Ok(self.cells[self.index(row, col)])
    }

    /// Place a stone. Knows nothing about turn order.
    pub fn set(&mut self, row: usize, col: usize, player: PlayerIndex) -> Result<()> {
        if self.get(row, col)?.is_some() {
            return Err(HexError::CellOccupied { row, col });
        }
        let idx = self.index(row, col);
        self.cells[idx] = Some(player);
        Ok(())
    }

    /// In-bounds neighbors of a cell (up to six)
    pub fn neighbors(&self, row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> {
        let size = self.size;
        NEIGHBOR_OFFSETS.into_iter().filter_map(move |(dr, dc)| {
            let r = row.checked_add_signed(dr)?;
            let c = col.checked_add_signed(dc)?;
            (r < size && c < size).then_some((r, c))
        })
    }

    /// Occupied cells as (row, col, owner)
    pub fn stones(&self) -> impl Iterator<Item = (usize, usize, PlayerIndex)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| {
            cell.map(|owner| (idx / self.size, idx % self.size, owner))
        })
    }

    pub fn stone_count(&self, player: PlayerIndex) -> usize {
        self.cells.iter().filter(|cell| **cell == Some(player)).count()
    }

    // ========================================================================
    // SERIALIZATION
    // ========================================================================

    /// One string per row: '0' / '1' for owners, '.' for empty
    pub fn serialize(&self) -> Vec<String> {
        self.cells
            .chunks(self.size)
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map_or(EMPTY_SYMBOL, PlayerIndex::symbol))
                    .collect()
            })
            .collect()
    }

    /// Parse rows produced by [`Board::serialize`]. The size is the number
    /// of rows and every row must have exactly that many characters.
    pub fn deserialize<S: AsRef<str>>(hexes: &[S]) -> Result<Self> {
        let size = hexes.len();
        if size == 0 {
            return Err(HexError::MalformedBoard("board has no rows".to_string()));
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, line) in hexes.iter().enumerate() {
            let line = line.as_ref();
            let len = line.chars().count();
            if len != size {
                return Err(HexError::MalformedBoard(format!(
                    "row {} has {} cells, expected {}",
                    row, len, size
                )));
            }
            for (col, symbol) in line.chars().enumerate() {
                let cell = match symbol {
                    EMPTY_SYMBOL => None,
                    '0' => Some(PlayerIndex::First),
                    '1' => Some(PlayerIndex::Second),
                    other => {
                        return Err(HexError::MalformedBoard(format!(
                            "unexpected character {:?} at ({}, {})",
                            other, row, col
                        )))
                    }
                };
                cells.push(cell);
            }
        }

        Ok(Self { size, cells })
    }
}

impl fmt::Display for Board {
    /// Rows shifted right one step each, the way the rhombus is drawn
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, line) in self.serialize().iter().enumerate() {
            let spaced: Vec<String> = line.chars().map(String::from).collect();
            writeln!(f, "{}{}", " ".repeat(row), spaced.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(4).unwrap();
        assert_eq!(board.size(), 4);
        assert_eq!(board.stones().count(), 0);
        assert_eq!(board.serialize(), vec!["....".to_string(); 4]);
    }

    #[test]
    fn test_invalid_size() {
        assert_eq!(Board::new(0), Err(HexError::InvalidSize(0)));
    }

    #[test]
    fn test_get_set() {
        let mut board = Board::new(3).unwrap();
        board.set(1, 2, PlayerIndex::Second).unwrap();
        assert_eq!(board.get(1, 2), Ok(Some(PlayerIndex::Second)));
        assert_eq!(board.get(2, 1), Ok(None));
        assert_eq!(
            board.set(1, 2, PlayerIndex::First),
            Err(HexError::CellOccupied { row: 1, col: 2 })
        );
        // Occupant unchanged after the refused placement
        assert_eq!(board.get(1, 2), Ok(Some(PlayerIndex::Second)));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut board = Board::new(3).unwrap();
        assert_eq!(
            board.get(3, 0),
            Err(HexError::OutOfBounds { row: 3, col: 0, size: 3 })
        );
        assert!(board.set(0, 3, PlayerIndex::First).is_err());
        assert_eq!(board.stones().count(), 0);
    }

    #[test]
    fn test_neighbors() {
        let board = Board::new(5).unwrap();

        let mut center: Vec<_> = board.neighbors(2, 2).collect();
        center.sort();
        assert_eq!(center, vec![(1, 2), (1, 3), (2, 1), (2, 3), (3, 1), (3, 2)]);

        // Acute corner has two neighbors, obtuse corner three
        assert_eq!(board.neighbors(0, 0).count(), 2);
        assert_eq!(board.neighbors(0, 4).count(), 3);
        assert_eq!(board.neighbors(4, 4).count(), 2);
        assert_eq!(board.neighbors(4, 0).count(), 3);
    }

    #[test]
    fn test_neighbors_symmetric() {
        let board = Board::new(4).unwrap();
        for row in 0..4 {
            for col in 0..4 {
                for (r, c) in board.neighbors(row, col) {
                    assert!(board.neighbors(r, c).any(|n| n == (row, col)));
                }
            }
        }
    }

    #[test]
    fn test_serialize_roundtrip() {
        let mut board = Board::new(3).unwrap();
        board.set(0, 0, PlayerIndex::First).unwrap();
        board.set(1, 2, PlayerIndex::Second).unwrap();
        let rows = board.serialize();
        assert_eq!(rows, vec!["0..", "..1", "..."]);
        assert_eq!(Board::deserialize(&rows).unwrap(), board);
    }

    #[test]
    fn test_deserialize_wrong_row_length() {
        let err = Board::deserialize(&["0..", "..", "..."]).unwrap_err();
        assert!(matches!(err, HexError::MalformedBoard(_)));
    }

    #[test]
    fn test_deserialize_unknown_symbol() {
        let err = Board::deserialize(&["0..", ".x.", "..."]).unwrap_err();
        assert!(matches!(err, HexError::MalformedBoard(_)));
    }

    #[test]
    fn test_display() {
        let board = Board::deserialize(&["0.", ".1"]).unwrap();
        assert_eq!(board.to_string(), "0 .\n . 1\n");
    }
}
