use std::collections::BTreeSet;

use dempl_core::{col_from_letters, CellRef};
use serde::{Deserialize, Serialize};

use crate::blocks::Section;
use crate::error::LayoutError;

// ---------------------------------------------------------------------------
// Template layout
// ---------------------------------------------------------------------------

/// Fixed coordinates and labels of the statement template.
///
/// Every summary cell lives on the first sheet. Defaults match the Dem-PL
/// model workbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FillLayout {
    pub section_cells: SectionCells,
    pub section_labels: SectionLabels,
    pub section_scope: SectionScope,
    pub grand_total_cell: CellRef,
    /// Account written on its own, as display text, into `extra_account_cell`.
    pub extra_account: String,
    pub extra_account_cell: CellRef,
    pub identifier_cell: CellRef,
    pub identifier_prefix: String,
    pub quota_count_cell: CellRef,
    /// Quota value is only written when a cell is configured.
    pub quota_value_cell: Option<CellRef>,
    pub applications_cell: CellRef,
    pub redemptions_cell: CellRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SectionCells {
    pub equities: CellRef,
    pub fixed_income: CellRef,
    pub other_income: CellRef,
    pub other_expenses: CellRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SectionLabels {
    pub equities: String,
    pub fixed_income: String,
    pub other_income: String,
    pub other_expenses: String,
}

/// Whether the current section survives a sheet boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionScope {
    /// Every sheet starts outside any section.
    #[default]
    Sheet,
    /// One section pointer for the whole workbook scan.
    Workbook,
}

fn cell(a1: &str) -> CellRef {
    // Only called with the literal defaults below.
    CellRef::parse(a1).unwrap_or(CellRef::new(0, 0))
}

impl Default for SectionCells {
    fn default() -> Self {
        Self {
            equities: cell("J34"),
            fixed_income: cell("J40"),
            other_income: cell("J45"),
            other_expenses: cell("J55"),
        }
    }
}

impl Default for SectionLabels {
    fn default() -> Self {
        Self {
            equities: "Ações e Opções".to_string(),
            fixed_income: "Renda fixa e outros valores mobiliários".to_string(),
            other_income: "Demais receitas".to_string(),
            other_expenses: "Demais despesas".to_string(),
        }
    }
}

impl Default for FillLayout {
    fn default() -> Self {
        Self {
            section_cells: SectionCells::default(),
            section_labels: SectionLabels::default(),
            section_scope: SectionScope::default(),
            grand_total_cell: cell("J58"),
            extra_account: "61180".to_string(),
            extra_account_cell: cell("J23"),
            identifier_cell: cell("L8"),
            identifier_prefix: "CNPJ: ".to_string(),
            quota_count_cell: cell("D18"),
            quota_value_cell: None,
            applications_cell: cell("D20"),
            redemptions_cell: cell("D22"),
        }
    }
}

impl FillLayout {
    pub fn section_cell(&self, section: Section) -> CellRef {
        match section {
            Section::Equities => self.section_cells.equities,
            Section::FixedIncome => self.section_cells.fixed_income,
            Section::OtherIncome => self.section_cells.other_income,
            Section::OtherExpenses => self.section_cells.other_expenses,
        }
    }

    pub fn section_labels(&self) -> Vec<(String, Section)> {
        let l = &self.section_labels;
        vec![
            (l.equities.clone(), Section::Equities),
            (l.fixed_income.clone(), Section::FixedIncome),
            (l.other_income.clone(), Section::OtherIncome),
            (l.other_expenses.clone(), Section::OtherExpenses),
        ]
    }

    /// Every summary coordinate on the first sheet. The generic scan never
    /// rewrites these.
    /// Section-total cells, skipped by the scan on every sheet.
    pub fn section_total_cells(&self) -> BTreeSet<CellRef> {
        Section::ALL.iter().map(|s| self.section_cell(*s)).collect()
    }

    /// Everything the fill writes on the first sheet.
    pub fn summary_cells(&self) -> BTreeSet<CellRef> {
        let mut cells = self.section_total_cells();
        cells.extend([
            self.grand_total_cell,
            self.extra_account_cell,
            self.identifier_cell,
            self.quota_count_cell,
            self.applications_cell,
            self.redemptions_cell,
        ]);
        cells.extend(self.quota_value_cell);
        cells
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.extra_account.is_empty() || !self.extra_account.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LayoutError(format!(
                "extra_account must be a digit string, got {:?}",
                self.extra_account
            )));
        }

        let labels = self.section_labels();
        for (label, section) in &labels {
            if label.trim().is_empty() {
                return Err(LayoutError(format!("section label for {section} is empty")));
            }
        }
        let distinct: BTreeSet<&str> = labels.iter().map(|(l, _)| l.trim()).collect();
        if distinct.len() != labels.len() {
            return Err(LayoutError("section labels must be distinct".to_string()));
        }

        let expected = 10 + usize::from(self.quota_value_cell.is_some());
        if self.summary_cells().len() != expected {
            return Err(LayoutError("summary cells must not share a coordinate".to_string()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Trial-balance columns
// ---------------------------------------------------------------------------

/// Where to find things in the trial-balance sheet (column letters).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrialBalanceLayout {
    pub account_column: String,
    pub balance_column: String,
    /// Header naming the CNPJ column, matched case-insensitively.
    pub identifier_header: String,
    /// Column scanned when no header matches.
    pub identifier_fallback_column: String,
}

impl Default for TrialBalanceLayout {
    fn default() -> Self {
        Self {
            account_column: "V".to_string(),
            balance_column: "K".to_string(),
            identifier_header: "cnpj".to_string(),
            identifier_fallback_column: "G".to_string(),
        }
    }
}

impl TrialBalanceLayout {
    pub fn account_col(&self) -> Result<usize, LayoutError> {
        column("account_column", &self.account_column)
    }

    pub fn balance_col(&self) -> Result<usize, LayoutError> {
        column("balance_column", &self.balance_column)
    }

    pub fn identifier_fallback_col(&self) -> Result<usize, LayoutError> {
        column("identifier_fallback_column", &self.identifier_fallback_column)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        self.account_col()?;
        self.balance_col()?;
        self.identifier_fallback_col()?;
        Ok(())
    }
}

fn column(field: &str, letters: &str) -> Result<usize, LayoutError> {
    col_from_letters(letters).map_err(|e| LayoutError(format!("{field}: {e}")))
}
