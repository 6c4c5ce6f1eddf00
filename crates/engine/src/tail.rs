//! Last-observation extraction from footer-headed, semicolon-delimited exports.
//!
//! The daily-position and quotaholder-movement exports put their field names at
//! the bottom of the file rather than the top. Everything above the header line
//! is data; the current value of a column is its last numeric entry.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::TailError;

/// Which non-blank line carries the field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLine {
    /// Daily position: a footer line follows the header.
    SecondToLast,
    /// Quotaholder movement.
    Last,
}

/// How numbers are written in a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberStyle {
    /// `123519889,535`: comma decimal, no grouping.
    DecimalComma,
    /// `1.234.567,890`: period grouping, comma decimal.
    PtBr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailSource {
    pub name: &'static str,
    pub header: HeaderLine,
    pub numbers: NumberStyle,
}

impl TailSource {
    pub const DAILY_POSITION: TailSource = TailSource {
        name: "daily position",
        header: HeaderLine::SecondToLast,
        numbers: NumberStyle::DecimalComma,
    };

    pub const MOVEMENT: TailSource = TailSource {
        name: "quotaholder movement",
        header: HeaderLine::Last,
        numbers: NumberStyle::PtBr,
    };
}

pub const QUOTA_COUNT_COLUMN: &str = "NCotas";
pub const QUOTA_VALUE_COLUMN: &str = "VlCotas";
pub const APPLICATIONS_COLUMN: &str = "NCATOT_Tot";
pub const REDEMPTIONS_COLUMN: &str = "NCRTOT_Tot";

/// A parsed footer-headed export.
#[derive(Debug, Clone)]
pub struct TailTable {
    source: TailSource,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TailTable {
    /// Split `content` into header and data rows.
    pub fn parse(source: TailSource, content: &str) -> Result<Self, TailError> {
        let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
        if lines.len() < 2 {
            return Err(TailError::TooFewLines { source: source.name.to_string(), lines: lines.len() });
        }

        let header_at = match source.header {
            HeaderLine::SecondToLast => lines.len() - 2,
            HeaderLine::Last => lines.len() - 1,
        };

        let mut ordered = String::new();
        ordered.push_str(lines[header_at]);
        for line in &lines[..header_at] {
            ordered.push('\n');
            ordered.push_str(line);
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .from_reader(ordered.as_bytes());

        let header = reader
            .headers()
            .map_err(|e| TailError::Csv { source: source.name.to_string(), message: e.to_string() })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (line_no, record) in reader.records().enumerate() {
            match record {
                Ok(record) => rows.push(record.iter().map(str::to_string).collect()),
                Err(e) => log::warn!("{}: skipping data line {}: {e}", source.name, line_no + 1),
            }
        }

        Ok(Self { source, header, rows })
    }

    pub fn source(&self) -> TailSource {
        self.source
    }

    pub fn data_rows(&self) -> usize {
        self.rows.len()
    }

    fn column_index(&self, column: &str) -> Option<usize> {
        let wanted = column.trim().to_lowercase();
        self.header.iter().position(|h| h.to_lowercase() == wanted)
    }

    /// Last numeric entry of `column` in document order. `Ok(None)` when the
    /// column exists but holds no number.
    pub fn last_value(&self, column: &str) -> Result<Option<Decimal>, TailError> {
        let idx = self.column_index(column).ok_or_else(|| TailError::MissingColumn {
            source: self.source.name.to_string(),
            column: column.to_string(),
        })?;

        Ok(self
            .rows
            .iter()
            .rev()
            .filter_map(|row| row.get(idx))
            .find_map(|raw| parse_number(raw, self.source.numbers)))
    }
}

/// Coerce one field; blank and non-numeric text yield `None`.
pub fn parse_number(raw: &str, style: NumberStyle) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let canonical = match style {
        NumberStyle::DecimalComma => trimmed.replace(',', "."),
        NumberStyle::PtBr => trimmed.replace('.', "").replace(',', "."),
    };
    Decimal::from_str(&canonical).ok()
}
