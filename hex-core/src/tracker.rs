//! Incremental win detection with union-find
//!
//! Each player gets a disjoint-set forest over every board cell plus two
//! virtual nodes standing for that player's target sides. Placing a stone
//! unions it with its same-colored neighbors and with any side it touches;
//! the player has won as soon as both virtual nodes share a root.

use crate::board::Board;
use crate::player::{PlayerIndex, Side};

/// Disjoint-set forest with path compression and union by size
#[derive(Clone, Debug)]
pub struct DisjointSet {
    parent: Vec<usize>,
    set_size: Vec<usize>,
}

impl DisjointSet {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            set_size: vec![1; len],
        }
    }

    /// Root of the set containing `x`, compressing the path on the way
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }

        root
    }

    /// Merge the sets of `a` and `b`. Returns false if they were already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let mut ra = self.find(a);
        let mut rb = self.find(b);
        if ra == rb {
            return false;
        }

        if self.set_size[ra] < self.set_size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.set_size[ra] += self.set_size[rb];
        true
    }

    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }
}

/// Connectivity of one player's stones to that player's two target sides
#[derive(Clone, Debug)]
pub struct ConnectivityTracker {
    player: PlayerIndex,
    size: usize,
    sets: DisjointSet,
    won: bool,
}

impl ConnectivityTracker {
    pub fn new(player: PlayerIndex, size: usize) -> Self {
        Self {
            player,
            size,
            sets: DisjointSet::new(size * size + 2),
            won: false,
        }
    }

    pub fn player(&self) -> PlayerIndex {
        self.player
    }

    /// Element id of a side's virtual node
    fn side_node(&self, side: Side) -> usize {
        let [first, _] = self.player.target_sides();
        if side == first {
            self.size * self.size
        } else {
            self.size * self.size + 1
        }
    }

    /// Account for a stone the tracker's player just placed at (row, col).
    ///
    /// `board` must already contain the stone. Returns whether the player
    /// now connects both target sides.
    pub fn record_move(&mut self, board: &Board, row: usize, col: usize) -> bool {
        debug_assert_eq!(board.get(row, col).ok().flatten(), Some(self.player));

        let cell = board.index(row, col);

        for (r, c) in board.neighbors(row, col) {
            if board.get(r, c).ok().flatten() == Some(self.player) {
                self.sets.union(cell, board.index(r, c));
            }
        }

        for side in self.player.target_sides() {
            if side.contains(row, col, self.size) {
                let node = self.side_node(side);
                self.sets.union(cell, node);
            }
        }

        if !self.won {
            let [a, b] = self.player.target_sides().map(|side| self.side_node(side));
            self.won = self.sets.connected(a, b);
        }
        self.won
    }

    /// Whether the player's stones link both target sides
    pub fn has_won(&self) -> bool {
        self.won
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(board: &mut Board, tracker: &mut ConnectivityTracker, row: usize, col: usize) -> bool {
        board.set(row, col, tracker.player()).unwrap();
        tracker.record_move(board, row, col)
    }

    #[test]
    fn test_disjoint_set() {
        let mut sets = DisjointSet::new(6);
        assert_eq!(sets.parent.len(), 6);
        assert!(!sets.connected(0, 5));
        assert!(sets.union(0, 1));
        assert!(sets.union(4, 5));
        assert!(!sets.union(1, 0));
        assert!(!sets.connected(1, 4));
        assert!(sets.union(1, 4));
        assert!(sets.connected(0, 5));
        assert!(!sets.connected(2, 3));
    }

    #[test]
    fn test_first_player_column() {
        let mut board = Board::new(3).unwrap();
        let mut tracker = ConnectivityTracker::new(PlayerIndex::First, 3);
        assert!(!place(&mut board, &mut tracker, 0, 1));
        assert!(!place(&mut board, &mut tracker, 1, 1));
        assert!(!tracker.has_won());
        assert!(place(&mut board, &mut tracker, 2, 1));
        assert!(tracker.has_won());
    }

    #[test]
    fn test_first_player_row_does_not_win() {
        let mut board = Board::new(3).unwrap();
        let mut tracker = ConnectivityTracker::new(PlayerIndex::First, 3);
        for col in 0..3 {
            assert!(!place(&mut board, &mut tracker, 1, col));
        }
    }

    #[test]
    fn test_second_player_row() {
        let mut board = Board::new(3).unwrap();
        let mut tracker = ConnectivityTracker::new(PlayerIndex::Second, 3);
        assert!(!place(&mut board, &mut tracker, 2, 0));
        assert!(!place(&mut board, &mut tracker, 2, 2));
        assert!(place(&mut board, &mut tracker, 2, 1));
    }

    #[test]
    fn test_diagonal_chain() {
        // (0,2) -> (1,1) -> (2,0) are linked through the NE/SW diagonal
        let mut board = Board::new(3).unwrap();
        let mut tracker = ConnectivityTracker::new(PlayerIndex::First, 3);
        assert!(!place(&mut board, &mut tracker, 0, 2));
        assert!(!place(&mut board, &mut tracker, 2, 0));
        assert!(place(&mut board, &mut tracker, 1, 1));
    }

    #[test]
    fn test_other_diagonal_is_not_adjacent() {
        // (0,0) and (1,1) do not touch on a hex grid
        let mut board = Board::new(2).unwrap();
        let mut tracker = ConnectivityTracker::new(PlayerIndex::First, 2);
        assert!(!place(&mut board, &mut tracker, 0, 0));
        assert!(!place(&mut board, &mut tracker, 1, 1));
    }

    #[test]
    fn test_single_cell_board() {
        let mut board = Board::new(1).unwrap();
        let mut tracker = ConnectivityTracker::new(PlayerIndex::Second, 1);
        assert!(place(&mut board, &mut tracker, 0, 0));
    }

    #[test]
    fn test_opponent_stones_do_not_connect() {
        let mut board = Board::new(3).unwrap();
        let mut tracker = ConnectivityTracker::new(PlayerIndex::First, 3);
        board.set(1, 1, PlayerIndex::Second).unwrap();
        assert!(!place(&mut board, &mut tracker, 0, 1));
        assert!(!place(&mut board, &mut tracker, 2, 1));
    }
}
