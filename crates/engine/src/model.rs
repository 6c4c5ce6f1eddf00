use dempl_core::CellValue;

/// Pre-loaded trial-balance sheet.
///
/// `header` is the first non-empty row of the sheet; `rows` are the data rows
/// below it. Columns are absolute sheet columns (index 0 is column `A`), so a
/// configured column letter means the same thing here as in the spreadsheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrialBalance {
    pub header: Vec<CellValue>,
    pub rows: Vec<Vec<CellValue>>,
}

static EMPTY: CellValue = CellValue::Empty;

impl TrialBalance {
    pub fn new(header: Vec<CellValue>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { header, rows }
    }

    /// Cell at `(row, col)` of the data area; short rows read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Index of the header cell whose trimmed text equals `name`, ignoring case.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.header
            .iter()
            .position(|h| h.display().trim().to_lowercase() == wanted)
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = &CellValue> + '_ {
        (0..self.rows.len()).map(move |row| self.cell(row, col))
    }
}
