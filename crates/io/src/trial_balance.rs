//! Trial-balance import (xlsx, xls, xlsb, ods) via calamine.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use dempl_core::CellValue;
use dempl_engine::TrialBalance;

use crate::{require_file, IoError};

/// Which worksheet to read: position (`0` is the first) or name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

impl From<&str> for SheetSelector {
    /// All-digit input is a position, anything else a name.
    fn from(s: &str) -> Self {
        let s = s.trim();
        match s.parse::<usize>() {
            Ok(index) => SheetSelector::Index(index),
            Err(_) => SheetSelector::Name(s.to_string()),
        }
    }
}

impl FromStr for SheetSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSelector::Index(i) => write!(f, "#{i}"),
            SheetSelector::Name(name) => write!(f, "'{name}'"),
        }
    }
}

impl SheetSelector {
    fn resolve<'a>(&self, names: &'a [String]) -> Option<&'a String> {
        match self {
            SheetSelector::Index(i) => names.get(*i),
            SheetSelector::Name(wanted) => names
                .iter()
                .find(|n| *n == wanted)
                .or_else(|| names.iter().find(|n| n.eq_ignore_ascii_case(wanted))),
        }
    }
}

/// Read one worksheet. The first non-empty row becomes the header.
pub fn read(path: &Path, sheet: &SheetSelector) -> Result<TrialBalance, IoError> {
    require_file("trial balance", path)?;

    let mut workbook: Sheets<_> = open_workbook_auto(path).map_err(|e| IoError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let names: Vec<String> = workbook.sheet_names().to_vec();
    let name = sheet
        .resolve(&names)
        .cloned()
        .ok_or_else(|| IoError::Sheet {
            path: path.to_path_buf(),
            message: format!("no sheet {sheet} (available: {})", names.join(", ")),
        })?;

    let range = workbook.worksheet_range(&name).map_err(|e| IoError::Sheet {
        path: path.to_path_buf(),
        message: format!("failed to read sheet '{name}': {e}"),
    })?;

    let tb = from_range(&range);
    log::info!(
        "trial balance: {} data row(s) from sheet '{name}' of {}",
        tb.rows.len(),
        path.display()
    );
    Ok(tb)
}

/// Lay a calamine range out on absolute sheet columns.
pub fn from_range(range: &Range<Data>) -> TrialBalance {
    // Range start offset (data may not begin at A1)
    let start_col = range.start().map(|(_, c)| c as usize).unwrap_or(0);

    let mut rows = range
        .rows()
        .map(|row| {
            let mut out = vec![CellValue::Empty; start_col];
            out.extend(row.iter().map(cell_value));
            out
        })
        .skip_while(|row| row.iter().all(CellValue::is_empty));

    let header = rows.next().unwrap_or_default();
    TrialBalance::new(header, rows.collect())
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::text(s.as_str()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::text(if *b { "TRUE" } else { "FALSE" }),
        Data::Error(e) => CellValue::text(format!("#{e:?}")),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s.as_str()),
    }
}
