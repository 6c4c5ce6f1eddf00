//! The three-pass template fill.
//!
//! 1. Scan every sheet, rewriting account-expression cells with their rounded
//!    thousands and crediting them to the current section.
//! 2. Write section totals, the grand total and the extra account on the first
//!    sheet.
//! 3. Write the scalar facts (quota figures, movement totals, CNPJ).

use dempl_core::{CellRef, CellValue};
use rust_decimal::Decimal;

use crate::blocks::{BlockAggregator, Section, SectionTotals};
use crate::config::{FillLayout, SectionScope};
use crate::document::TemplateDocument;
use crate::error::FillError;
use crate::identifier::Identifier;
use crate::index::{saturating_sum, AccountIndex};
use crate::report::{CellChange, FillReport};
use crate::resolve::resolve;
use crate::rounding::{display_pt_br, display_thousands, to_thousands, INT_THOUSANDS_FORMAT};

const SUMMARY_SHEET: usize = 0;

/// Values computed outside the template scan. `None` leaves the cell alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScalarFacts {
    pub identifier: Option<Identifier>,
    pub quota_count: Option<Decimal>,
    pub quota_value: Option<Decimal>,
    pub applications: Option<Decimal>,
    pub redemptions: Option<Decimal>,
}

/// Fill `doc` in place. Unknown accounts resolve to zero and are reported,
/// never raised.
pub fn fill<D>(
    doc: &mut D,
    index: &AccountIndex,
    facts: &ScalarFacts,
    layout: &FillLayout,
) -> Result<FillReport, FillError>
where
    D: TemplateDocument + ?Sized,
{
    if doc.sheet_count() == 0 {
        return Err(FillError::EmptyTemplate);
    }

    let mut report = FillReport::default();

    let totals = scan(doc, index, layout, &mut report);
    write_summaries(doc, index, layout, totals, &mut report)?;
    write_facts(doc, facts, layout, &mut report)?;

    log::info!("fill: {}", report.summary());
    Ok(report)
}

// ---------------------------------------------------------------------------
// Pass 1: scan
// ---------------------------------------------------------------------------

fn scan<D>(doc: &mut D, index: &AccountIndex, layout: &FillLayout, report: &mut FillReport) -> SectionTotals
where
    D: TemplateDocument + ?Sized,
{
    let excluded = layout.summary_cells();
    let section_cells = layout.section_total_cells();
    let mut blocks = BlockAggregator::new(layout.section_labels());

    for sheet in 0..doc.sheet_count() {
        if layout.section_scope == SectionScope::Sheet {
            blocks.reset_section();
        }
        let sheet_name = doc.sheet_name(sheet);
        let (rows, cols) = doc.dimensions(sheet);

        for row in 0..rows {
            if let Ok(CellValue::Text(first)) = doc.cell(sheet, CellRef::new(row, 0)) {
                blocks.observe_header(&first);
            }

            for col in 0..cols {
                let at = CellRef::new(row, col);
                // Section totals are skipped on every sheet, the rest of the
                // summary set only where it is written.
                if section_cells.contains(&at) || (sheet == SUMMARY_SHEET && excluded.contains(&at)) {
                    continue;
                }

                let value = match doc.cell(sheet, at) {
                    Ok(value) => value,
                    Err(message) => {
                        log::warn!("{sheet_name}!{at}: left unchanged, {message}");
                        report.skipped.push(format!("{sheet_name}!{at}"));
                        continue;
                    }
                };

                let Some(resolution) = resolve(&value, index) else {
                    continue;
                };
                if resolution.overflowed {
                    log::warn!("{sheet_name}!{at}: left unchanged, account sum out of range");
                    report.skipped.push(format!("{sheet_name}!{at}"));
                    continue;
                }
                let thousands = to_thousands(resolution.total);

                if let Err(message) = doc.set_number(sheet, at, thousands, INT_THOUSANDS_FORMAT) {
                    log::warn!("{sheet_name}!{at}: left unchanged, {message}");
                    report.skipped.push(format!("{sheet_name}!{at}"));
                    continue;
                }

                for code in &resolution.codes {
                    let contribution = index.get(code).unwrap_or(Decimal::ZERO);
                    let slot = report.per_account.entry(code.clone()).or_insert(Decimal::ZERO);
                    *slot = saturating_sum(*slot, contribution).unwrap_or_else(|clamped| {
                        log::warn!("account {code}: usage total out of range, clamped to {clamped}");
                        clamped
                    });
                }
                for code in &resolution.missing {
                    log::debug!("{sheet_name}!{at}: account {code} not in trial balance");
                    *report.missing.entry(code.clone()).or_insert(0) += 1;
                }

                let section = blocks.record(thousands);
                let expression = value.display();
                log::debug!("{sheet_name}!{at}: {expression:?} -> {} -> {thousands}", resolution.total);

                report.changes.push(CellChange {
                    cell: format!("{sheet_name}!{at}"),
                    expression,
                    total: resolution.total,
                    thousands,
                    section,
                });
            }
        }
    }

    blocks.totals()
}

// ---------------------------------------------------------------------------
// Pass 2: summaries
// ---------------------------------------------------------------------------

fn write_summaries<D>(
    doc: &mut D,
    index: &AccountIndex,
    layout: &FillLayout,
    totals: SectionTotals,
    report: &mut FillReport,
) -> Result<(), FillError>
where
    D: TemplateDocument + ?Sized,
{
    for section in Section::ALL {
        write_number(doc, layout.section_cell(section), totals.get(section))?;
    }

    let grand_total = totals.grand_total();
    write_number(doc, layout.grand_total_cell, grand_total)?;

    let extra = index.get(&layout.extra_account).unwrap_or_else(|| {
        log::info!("account {} not in trial balance, writing '-'", layout.extra_account);
        Decimal::ZERO
    });
    let extra_text = display_thousands(to_thousands(extra));
    write_text(doc, layout.extra_account_cell, &extra_text, false)?;
    report.facts.insert(layout.extra_account_cell.a1(), extra_text);

    report.sections = totals;
    report.grand_total = grand_total;
    Ok(())
}

// ---------------------------------------------------------------------------
// Pass 3: scalar facts
// ---------------------------------------------------------------------------

fn write_facts<D>(doc: &mut D, facts: &ScalarFacts, layout: &FillLayout, report: &mut FillReport) -> Result<(), FillError>
where
    D: TemplateDocument + ?Sized,
{
    let decimals = [
        (facts.quota_count, Some(layout.quota_count_cell), 3),
        (facts.quota_value, layout.quota_value_cell, 6),
        (facts.applications, Some(layout.applications_cell), 3),
        (facts.redemptions, Some(layout.redemptions_cell), 3),
    ];
    for (value, cell, places) in decimals {
        let (Some(value), Some(cell)) = (value, cell) else {
            continue;
        };
        let text = display_pt_br(value, places);
        write_text(doc, cell, &text, false)?;
        report.facts.insert(cell.a1(), text);
    }

    match &facts.identifier {
        Some(id) => {
            let text = format!("{}{}", layout.identifier_prefix, id.masked());
            write_text(doc, layout.identifier_cell, &text, true)?;
            report.facts.insert(layout.identifier_cell.a1(), text);
        }
        None => log::info!("no CNPJ found, {} left unset", layout.identifier_cell),
    }
    Ok(())
}

fn write_number<D>(doc: &mut D, at: CellRef, value: i64) -> Result<(), FillError>
where
    D: TemplateDocument + ?Sized,
{
    doc.set_number(SUMMARY_SHEET, at, value, INT_THOUSANDS_FORMAT)
        .map_err(|message| FillError::Write { cell: at.a1(), message })
}

fn write_text<D>(doc: &mut D, at: CellRef, text: &str, align_right: bool) -> Result<(), FillError>
where
    D: TemplateDocument + ?Sized,
{
    doc.set_text(SUMMARY_SHEET, at, text, align_right)
        .map_err(|message| FillError::Write { cell: at.a1(), message })
}
