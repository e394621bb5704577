//! Letter/number cell coordinates (`a1`, `k7`, ...)
//!
//! The letter names the column, the number the one-based row. This is the
//! form spoken by external Hex engines.

use crate::board::MoveData;
use std::fmt;
use std::str::FromStr;

/// Number of columns the notation can name
pub const MAX_NOTATION_COLUMNS: usize = 26;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("empty coordinate")]
    Empty,

    #[error("invalid column in {0:?}")]
    InvalidColumn(String),

    #[error("invalid row in {0:?}")]
    InvalidRow(String),
}

impl MoveData {
    /// Coordinate string, `None` past column `z`
    pub fn notation(&self) -> Option<String> {
        if self.col >= MAX_NOTATION_COLUMNS {
            return None;
        }
        let letter = (b'a' + self.col as u8) as char;
        Some(format!("{}{}", letter, self.row + 1))
    }
}

impl FromStr for MoveData {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let letter = chars.next().ok_or(NotationError::Empty)?;
        if !letter.is_ascii_alphabetic() {
            return Err(NotationError::InvalidColumn(s.to_string()));
        }
        let col = (letter.to_ascii_lowercase() as u8 - b'a') as usize;

        // Plain decimal, no sign and no leading zero
        let digits = chars.as_str();
        if digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NotationError::InvalidRow(s.to_string()));
        }
        let row: usize = digits
            .parse()
            .map_err(|_| NotationError::InvalidRow(s.to_string()))?;

        Ok(MoveData::new(row - 1, col))
    }
}

impl fmt::Display for MoveData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.notation() {
            Some(coord) => f.write_str(&coord),
            None => write!(f, "({}, {})", self.row, self.col),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(MoveData::new(0, 0).notation().as_deref(), Some("a1"));
        assert_eq!(MoveData::new(6, 10).notation().as_deref(), Some("k7"));
        assert_eq!(MoveData::new(12, 25).to_string(), "z13");
        assert_eq!(MoveData::new(0, 26).notation(), None);
        assert_eq!(MoveData::new(0, 26).to_string(), "(0, 26)");
    }

    #[test]
    fn test_parse() {
        assert_eq!("k7".parse::<MoveData>(), Ok(MoveData::new(6, 10)));
        assert_eq!("A1".parse::<MoveData>(), Ok(MoveData::new(0, 0)));
        assert_eq!(" i13\n".parse::<MoveData>(), Ok(MoveData::new(12, 8)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<MoveData>(), Err(NotationError::Empty));
        assert!(matches!("7k".parse::<MoveData>(), Err(NotationError::InvalidColumn(_))));
        assert!(matches!("k".parse::<MoveData>(), Err(NotationError::InvalidRow(_))));
        assert!(matches!("k0".parse::<MoveData>(), Err(NotationError::InvalidRow(_))));
        assert!(matches!("kx".parse::<MoveData>(), Err(NotationError::InvalidRow(_))));
    }

    #[test]
    fn test_parse_rejects_non_canonical_rows() {
        for coord in ["k+7", "k07", "k00", "k-1", "k 7"] {
            let parsed = coord.parse::<MoveData>();
            assert!(matches!(parsed, Err(NotationError::InvalidRow(_))), "{:?}", coord);
        }
        assert_eq!("k10".parse::<MoveData>(), Ok(MoveData::new(9, 10)));
    }
}
