//! Template workbook backed by umya-spreadsheet.
//!
//! umya keeps the styles, merges and column widths it did not touch, so the
//! filled copy looks like the template with only the rewritten cells changed.

use std::io::{self, Cursor};
use std::path::Path;

use dempl_core::{CellRef, CellValue};
use dempl_engine::rounding::TEXT_FORMAT;
use dempl_engine::TemplateDocument;
use umya_spreadsheet::{HorizontalAlignmentValues, Spreadsheet, Worksheet};

use crate::persist::Persist;
use crate::{require_file, IoError};

pub struct TemplateWorkbook {
    book: Spreadsheet,
}

impl TemplateWorkbook {
    pub fn open(path: &Path) -> Result<Self, IoError> {
        require_file("template", path)?;
        let book = umya_spreadsheet::reader::xlsx::read(path).map_err(|e| IoError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        log::info!(
            "template: {} sheet(s) from {}",
            book.get_sheet_collection_no_check().len(),
            path.display()
        );
        Ok(Self { book })
    }

    pub fn from_spreadsheet(book: Spreadsheet) -> Self {
        Self { book }
    }

    pub fn spreadsheet(&self) -> &Spreadsheet {
        &self.book
    }

    /// Serialize to xlsx bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, String> {
        let mut out = Cursor::new(Vec::new());
        umya_spreadsheet::writer::xlsx::write_writer(&self.book, &mut out).map_err(|e| e.to_string())?;
        Ok(out.into_inner())
    }

    fn sheet(&self, sheet: usize) -> Result<&Worksheet, String> {
        self.book
            .get_sheet_collection_no_check()
            .get(sheet)
            .ok_or_else(|| format!("no sheet at position {sheet}"))
    }

    fn sheet_mut(&mut self, sheet: usize) -> Result<&mut Worksheet, String> {
        self.book
            .get_sheet_collection_mut()
            .get_mut(sheet)
            .ok_or_else(|| format!("no sheet at position {sheet}"))
    }
}

/// umya addresses cells as 1-based `(col, row)`.
fn coordinate(at: CellRef) -> Result<(u32, u32), String> {
    let col = u32::try_from(at.col + 1).map_err(|_| format!("column out of range at {at}"))?;
    let row = u32::try_from(at.row + 1).map_err(|_| format!("row out of range at {at}"))?;
    Ok((col, row))
}

impl TemplateDocument for TemplateWorkbook {
    fn sheet_count(&self) -> usize {
        self.book.get_sheet_collection_no_check().len()
    }

    fn sheet_name(&self, sheet: usize) -> String {
        self.sheet(sheet).map(|ws| ws.get_name().to_string()).unwrap_or_default()
    }

    fn dimensions(&self, sheet: usize) -> (usize, usize) {
        match self.sheet(sheet) {
            Ok(ws) => {
                let (cols, rows) = ws.get_highest_column_and_row();
                (rows as usize, cols as usize)
            }
            Err(_) => (0, 0),
        }
    }

    fn cell(&self, sheet: usize, at: CellRef) -> Result<CellValue, String> {
        let ws = self.sheet(sheet)?;
        let Some(cell) = ws.get_cell(coordinate(at)?) else {
            return Ok(CellValue::Empty);
        };

        if cell.is_formula() {
            return Ok(CellValue::text(format!("={}", cell.get_formula())));
        }
        if let Some(n) = cell.get_value_number() {
            return Ok(CellValue::Number(n));
        }
        Ok(CellValue::text(cell.get_value().to_string()))
    }

    fn set_number(&mut self, sheet: usize, at: CellRef, value: i64, number_format: &str) -> Result<(), String> {
        let coord = coordinate(at)?;
        let ws = self.sheet_mut(sheet)?;

        let cell = ws.get_cell_mut(coord);
        cell.get_cell_value_mut().remove_formula();
        cell.set_value_number(value as f64);

        let style = ws.get_style_mut(coord);
        style.get_number_format_mut().set_format_code(number_format);
        style.get_alignment_mut().set_horizontal(HorizontalAlignmentValues::Right);
        Ok(())
    }

    fn set_text(&mut self, sheet: usize, at: CellRef, text: &str, align_right: bool) -> Result<(), String> {
        let coord = coordinate(at)?;
        let ws = self.sheet_mut(sheet)?;

        let cell = ws.get_cell_mut(coord);
        cell.get_cell_value_mut().remove_formula();
        cell.set_value_string(text);

        let style = ws.get_style_mut(coord);
        style.get_number_format_mut().set_format_code(TEXT_FORMAT);
        if align_right {
            style.get_alignment_mut().set_horizontal(HorizontalAlignmentValues::Right);
        }
        Ok(())
    }
}

impl Persist for TemplateWorkbook {
    fn save(&self, path: &Path) -> io::Result<()> {
        let bytes = self.to_bytes().map_err(io::Error::other)?;
        std::fs::write(path, bytes)
    }
}
