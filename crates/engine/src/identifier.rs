//! CNPJ (14-digit tax identifier) extraction from the trial balance.

use std::fmt;

use dempl_core::CellValue;
use serde::Serialize;

use crate::model::TrialBalance;

/// Exactly 14 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct Identifier(String);

impl Identifier {
    fn from_digits(digits: &str) -> Option<Self> {
        (digits.len() == 14 && digits.bytes().all(|b| b.is_ascii_digit()))
            .then(|| Self(digits.to_string()))
    }

    pub fn digits(&self) -> &str {
        &self.0
    }

    /// `43096339000146` → `43.096.339/0001-46`.
    pub fn masked(&self) -> String {
        let d = &self.0;
        format!("{}.{}.{}/{}-{}", &d[0..2], &d[2..5], &d[5..8], &d[8..12], &d[12..14])
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.masked()
    }
}

/// Try to read one cell as a CNPJ.
pub fn extract(value: &CellValue) -> Option<Identifier> {
    match value {
        CellValue::Empty => None,
        CellValue::Number(n) if !n.is_finite() => None,
        CellValue::Number(n) if n.fract() == 0.0 => {
            // Integral: the number *is* the identifier, leading zeros lost.
            // A sign survives only when it falls outside the last 14 characters.
            let digits = format!("{:.0}", n);
            let padded = if digits.len() <= 14 {
                format!("{digits:0>14}")
            } else {
                digits[digits.len() - 14..].to_string()
            };
            Identifier::from_digits(&padded)
        }
        CellValue::Number(n) => leading_fourteen(&n.to_string()),
        CellValue::Text(s) => leading_fourteen(s),
    }
}

fn leading_fourteen(s: &str) -> Option<Identifier> {
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() >= 14 {
        Identifier::from_digits(&digits[..14])
    } else {
        None
    }
}

/// First row yielding a valid identifier, scanning the column whose header
/// matches `header` or else `fallback_col`.
pub fn find_in_trial_balance(tb: &TrialBalance, header: &str, fallback_col: usize) -> Option<Identifier> {
    let col = match tb.find_column(header) {
        Some(col) => col,
        None => {
            log::debug!("no '{header}' header in trial balance, scanning column {fallback_col}");
            fallback_col
        }
    };
    tb.column(col).find_map(extract)
}
