//! Cell positions and A1 notation.
//!
//! A [`Position`] is a zero-indexed `(row, col)` pair. Positions are allowed to
//! hold out-of-range values so that a formula can mention a reference such as
//! `ZZZZ1` and have it surface as `#REF!` at evaluation time; use
//! [`Position::is_valid`] before storing one.
//!
//! # Examples
//!
//! ```
//! use cellgrid_engine::engine::Position;
//!
//! let pos = Position::from_a1("B3");
//! assert_eq!(pos, Position::new(2, 1));
//! assert_eq!(pos.to_string(), "B3");
//! ```

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Number of addressable rows.
pub const MAX_ROWS: i32 = 16384;
/// Number of addressable columns.
pub const MAX_COLS: i32 = 16384;

const LETTERS: i32 = 26;
const MAX_LETTER_COUNT: usize = 3;

/// A cell position (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    /// Sentinel for "no position"; never valid.
    pub const NONE: Position = Position { row: -1, col: -1 };

    pub const fn new(row: i32, col: i32) -> Position {
        Position { row, col }
    }

    pub fn is_valid(&self) -> bool {
        (0..MAX_ROWS).contains(&self.row) && (0..MAX_COLS).contains(&self.col)
    }

    /// Decode A1 notation. Returns [`Position::NONE`] for anything that does not
    /// name a valid cell (lowercase letters, row 0, out of range, junk).
    pub fn from_a1(name: &str) -> Position {
        Self::parse_a1(name).unwrap_or(Position::NONE)
    }

    fn parse_a1(name: &str) -> Option<Position> {
        let caps = a1_re().captures(name)?;
        if caps["letters"].len() > MAX_LETTER_COUNT {
            return None;
        }
        // Anything longer than MAX_ROWS' digit count is out of range anyway.
        if caps["digits"].len() > MAX_ROWS.to_string().len() {
            return None;
        }
        let pos = Self::from_a1_unchecked(name)?;
        pos.is_valid().then_some(pos)
    }

    /// Decode A1 syntax without the range check, so `XFE1` yields an
    /// out-of-range position instead of `None`. Returns `None` only when the
    /// text is not A1 syntax or the coordinates overflow.
    pub fn from_a1_unchecked(name: &str) -> Option<Position> {
        let caps = a1_re().captures(name)?;

        let mut col = 0i32;
        for c in caps["letters"].bytes() {
            col = col
                .checked_mul(LETTERS)?
                .checked_add(i32::from(c - b'A') + 1)?;
        }
        let row: i32 = caps["digits"].parse().ok()?;

        Some(Position::new(row - 1, col - 1))
    }

    /// Convert a column index to letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: i32) -> String {
        let mut result = Vec::new();
        let mut n = col + 1;
        while n > 0 {
            n -= 1;
            result.push(b'A' + (n % LETTERS) as u8);
            n /= LETTERS;
        }
        result.reverse();
        String::from_utf8(result).unwrap_or_default()
    }
}

fn a1_re() -> &'static Regex {
    static A1_RE: OnceLock<Regex> = OnceLock::new();
    A1_RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Z]+)(?<digits>[0-9]+)$").expect("A1 position regex must compile")
    })
}

impl std::str::FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_a1(s).ok_or_else(|| format!("Invalid cell position: {}", s))
    }
}

impl fmt::Display for Position {
    /// Invalid positions render as an empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return Ok(());
        }
        write!(f, "{}{}", Position::col_to_letters(self.col), self.row + 1)
    }
}

/// Dimensions of the printable area of a sheet.
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq)]
pub struct Size {
    pub rows: i32,
    pub cols: i32,
}

impl Size {
    pub const fn new(rows: i32, cols: i32) -> Size {
        Size { rows, cols }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.rows, self.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_a1_single_letter_columns() {
        assert_eq!(Position::from_a1("A1"), Position::new(0, 0));
        assert_eq!(Position::from_a1("B1"), Position::new(0, 1));
        assert_eq!(Position::from_a1("Z1"), Position::new(0, 25));
    }

    #[test]
    fn test_from_a1_multi_letter_columns() {
        assert_eq!(Position::from_a1("AA1").col, 26);
        assert_eq!(Position::from_a1("AZ1").col, 51);
        assert_eq!(Position::from_a1("BA1").col, 52);
        assert_eq!(Position::from_a1("XFD16384"), Position::new(16383, 16383));
    }

    #[test]
    fn test_from_a1_rejects_out_of_range() {
        assert_eq!(Position::from_a1("XFE1"), Position::NONE);
        assert_eq!(Position::from_a1("A16385"), Position::NONE);
        assert_eq!(Position::from_a1("ZZZZ1"), Position::NONE);
        assert_eq!(Position::from_a1("A99999999999"), Position::NONE);
    }

    #[test]
    fn test_from_a1_invalid_inputs() {
        for input in ["", "123", "ABC", "A0", "1A", "A 1", "a1", "A-1"] {
            assert_eq!(Position::from_a1(input), Position::NONE, "{input}");
            assert!(input.parse::<Position>().is_err());
        }
    }

    #[test]
    fn test_from_a1_unchecked_keeps_out_of_range() {
        assert_eq!(Position::from_a1_unchecked("B3"), Some(Position::new(2, 1)));
        let pos = Position::from_a1_unchecked("XFE1").unwrap();
        assert_eq!(pos, Position::new(0, 16384));
        assert!(!pos.is_valid());
        assert_eq!(Position::from_a1_unchecked("A0"), Some(Position::new(-1, 0)));
        assert_eq!(Position::from_a1_unchecked("a1"), None);
        assert_eq!(Position::from_a1_unchecked("A99999999999"), None);
    }

    #[test]
    fn test_display_round_trip() {
        for name in ["A1", "Z9", "AA10", "ABC123", "XFD16384"] {
            assert_eq!(Position::from_a1(name).to_string(), name);
        }
        assert_eq!(Position::NONE.to_string(), "");
    }

    #[test]
    fn test_ordering_is_row_major() {
        let mut positions = vec![
            Position::new(1, 0),
            Position::new(0, 5),
            Position::new(0, 1),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![Position::new(0, 1), Position::new(0, 5), Position::new(1, 0)]
        );
    }
}
