use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Zero-based cell coordinate. Parses from and renders to A1 notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellRefError {
    /// Not of the form `<letters><digits>`.
    Malformed(String),
    /// Column letters outside `A..=XFD` or row outside `1..=1048576`.
    OutOfRange(String),
}

impl fmt::Display for CellRefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(s) => write!(f, "invalid cell reference {s:?}"),
            Self::OutOfRange(s) => write!(f, "cell reference {s:?} is outside the sheet"),
        }
    }
}

impl std::error::Error for CellRefError {}

const MAX_ROWS: usize = 1_048_576;
const MAX_COLS: usize = 16_384;

impl CellRef {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Parse `J34`, `j34` or `$J$34`.
    pub fn parse(s: &str) -> Result<Self, CellRefError> {
        let trimmed = s.trim();
        let cleaned: String = trimmed.chars().filter(|c| *c != '$').collect();
        let split = cleaned
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| CellRefError::Malformed(trimmed.to_string()))?;
        let (letters, digits) = cleaned.split_at(split);

        if letters.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(CellRefError::Malformed(trimmed.to_string()));
        }
        let col = col_from_letters(letters).map_err(|_| CellRefError::Malformed(trimmed.to_string()))?;
        let row: usize = digits
            .parse()
            .map_err(|_| CellRefError::OutOfRange(trimmed.to_string()))?;
        if row == 0 || row > MAX_ROWS || col >= MAX_COLS {
            return Err(CellRefError::OutOfRange(trimmed.to_string()));
        }
        Ok(Self { row: row - 1, col })
    }

    /// A1 rendering (`CellRef::new(33, 9)` → `J34`).
    pub fn a1(&self) -> String {
        format!("{}{}", col_to_letters(self.col), self.row + 1)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.a1())
    }
}

impl FromStr for CellRef {
    type Err = CellRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CellRef {
    type Error = CellRefError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<CellRef> for String {
    fn from(r: CellRef) -> Self {
        r.a1()
    }
}

/// Convert column letters to a zero-based index (`A` → 0, `V` → 21, `AA` → 26).
pub fn col_from_letters(letters: &str) -> Result<usize, CellRefError> {
    let upper = letters.trim().to_ascii_uppercase();
    if upper.is_empty() || upper.len() > 3 {
        return Err(CellRefError::Malformed(letters.to_string()));
    }
    let mut num: usize = 0;
    for ch in upper.chars() {
        if !ch.is_ascii_uppercase() {
            return Err(CellRefError::Malformed(letters.to_string()));
        }
        num = num * 26 + (ch as usize - 'A' as usize + 1);
    }
    Ok(num - 1)
}

/// Convert a zero-based column index to letters (0 → `A`, 26 → `AA`).
pub fn col_to_letters(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_summary_coordinates() {
        assert_eq!(CellRef::parse("J34").unwrap(), CellRef::new(33, 9));
        assert_eq!(CellRef::parse("l8").unwrap(), CellRef::new(7, 11));
        assert_eq!(CellRef::parse("$D$18").unwrap(), CellRef::new(17, 3));
    }

    #[test]
    fn renders_back_to_a1() {
        assert_eq!(CellRef::new(57, 9).a1(), "J58");
        assert_eq!(CellRef::new(0, 26).to_string(), "AA1");
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(CellRef::parse("34J"), Err(CellRefError::Malformed(_))));
        assert!(matches!(CellRef::parse("J"), Err(CellRefError::Malformed(_))));
        assert!(matches!(CellRef::parse("J0"), Err(CellRefError::OutOfRange(_))));
        assert!(matches!(CellRef::parse("J3-4"), Err(CellRefError::Malformed(_))));
    }

    #[test]
    fn column_letters_round_trip() {
        assert_eq!(col_from_letters("A").unwrap(), 0);
        assert_eq!(col_from_letters("k").unwrap(), 10);
        assert_eq!(col_from_letters("V").unwrap(), 21);
        assert_eq!(col_from_letters("AA").unwrap(), 26);
        assert_eq!(col_to_letters(21), "V");
        assert_eq!(col_to_letters(701), "ZZ");
        assert!(col_from_letters("A1").is_err());
        assert!(col_from_letters("").is_err());
    }

    #[test]
    fn deserializes_from_string() {
        use serde::de::value::{Error, StringDeserializer};
        use serde::de::IntoDeserializer;

        let de: StringDeserializer<Error> = "J23".to_string().into_deserializer();
        assert_eq!(CellRef::deserialize(de).unwrap(), CellRef::new(22, 9));

        let bad: StringDeserializer<Error> = "nope".to_string().into_deserializer();
        assert!(CellRef::deserialize(bad).is_err());
    }
}
