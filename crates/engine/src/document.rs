use dempl_core::{CellRef, CellValue};

/// The template workbook as the fill engine sees it.
///
/// Sheets are addressed by position (0 is the first sheet, where every summary
/// cell lives). Writers replace any formula the cell held.
pub trait TemplateDocument {
    fn sheet_count(&self) -> usize;

    fn sheet_name(&self, sheet: usize) -> String;

    /// Used area as `(rows, cols)`, both counted from `A1`.
    fn dimensions(&self, sheet: usize) -> (usize, usize);

    /// Read one cell. `Err` means the value exists but cannot be represented;
    /// the engine skips such cells.
    fn cell(&self, sheet: usize, at: CellRef) -> Result<CellValue, String>;

    /// Write an integer with a number format, right aligned.
    fn set_number(&mut self, sheet: usize, at: CellRef, value: i64, number_format: &str) -> Result<(), String>;

    /// Write literal text with the text number format.
    fn set_text(&mut self, sheet: usize, at: CellRef, text: &str, align_right: bool) -> Result<(), String>;
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory document for engine tests.

    use std::collections::BTreeMap;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Written {
        Number { value: i64, format: String },
        Text { text: String, align_right: bool },
    }

    #[derive(Debug, Default)]
    pub struct MemorySheet {
        pub name: String,
        pub cells: BTreeMap<CellRef, CellValue>,
        pub written: BTreeMap<CellRef, Written>,
        pub unreadable: Vec<CellRef>,
    }

    #[derive(Debug, Default)]
    pub struct MemoryDocument {
        pub sheets: Vec<MemorySheet>,
    }

    impl MemoryDocument {
        pub fn with_sheet(mut self, name: &str, cells: &[(&str, CellValue)]) -> Self {
            let cells = cells
                .iter()
                .map(|(a1, v)| (CellRef::parse(a1).unwrap(), v.clone()))
                .collect();
            self.sheets.push(MemorySheet { name: name.to_string(), cells, ..Default::default() });
            self
        }

        pub fn written(&self, sheet: usize, a1: &str) -> Option<&Written> {
            self.sheets[sheet].written.get(&CellRef::parse(a1).unwrap())
        }

        pub fn number(&self, sheet: usize, a1: &str) -> Option<i64> {
            match self.written(sheet, a1)? {
                Written::Number { value, .. } => Some(*value),
                Written::Text { .. } => None,
            }
        }

        pub fn text(&self, sheet: usize, a1: &str) -> Option<&str> {
            match self.written(sheet, a1)? {
                Written::Text { text, .. } => Some(text),
                Written::Number { .. } => None,
            }
        }
    }

    impl TemplateDocument for MemoryDocument {
        fn sheet_count(&self) -> usize {
            self.sheets.len()
        }

        fn sheet_name(&self, sheet: usize) -> String {
            self.sheets[sheet].name.clone()
        }

        fn dimensions(&self, sheet: usize) -> (usize, usize) {
            let s = &self.sheets[sheet];
            let rows = s.cells.keys().map(|c| c.row + 1).max().unwrap_or(0);
            let cols = s.cells.keys().map(|c| c.col + 1).max().unwrap_or(0);
            (rows, cols)
        }

        fn cell(&self, sheet: usize, at: CellRef) -> Result<CellValue, String> {
            let s = &self.sheets[sheet];
            if s.unreadable.contains(&at) {
                return Err(format!("unreadable {at}"));
            }
            Ok(s.cells.get(&at).cloned().unwrap_or_default())
        }

        fn set_number(&mut self, sheet: usize, at: CellRef, value: i64, number_format: &str) -> Result<(), String> {
            let s = &mut self.sheets[sheet];
            s.cells.insert(at, CellValue::Number(value as f64));
            s.written.insert(at, Written::Number { value, format: number_format.to_string() });
            Ok(())
        }

        fn set_text(&mut self, sheet: usize, at: CellRef, text: &str, align_right: bool) -> Result<(), String> {
            let s = &mut self.sheets[sheet];
            s.cells.insert(at, CellValue::text(text));
            s.written.insert(at, Written::Text { text: text.to_string(), align_right });
            Ok(())
        }
    }
}
