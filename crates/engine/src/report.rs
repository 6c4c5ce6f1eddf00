use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::blocks::{Section, SectionTotals};

/// One rewritten template cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellChange {
    /// `Sheet!A1`
    pub cell: String,
    pub expression: String,
    pub total: Decimal,
    pub thousands: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<Section>,
}

/// What a fill pass did. Serialized as the `--report` JSON.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FillReport {
    pub changes: Vec<CellChange>,
    /// Referenced codes absent from the index, with how often they appeared.
    pub missing: BTreeMap<String, usize>,
    /// Resolved currency-unit contribution per referenced code.
    pub per_account: BTreeMap<String, Decimal>,
    pub sections: SectionTotals,
    pub grand_total: i64,
    /// Cells the scan had to leave as they were.
    pub skipped: Vec<String>,
    /// Scalar facts written, keyed by cell, with the text written.
    pub facts: BTreeMap<String, String>,
}

impl FillReport {
    pub fn missing_references(&self) -> usize {
        self.missing.values().sum()
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        let mut parts = vec![format!(
            "{} cell{} resolved",
            self.changes.len(),
            if self.changes.len() == 1 { "" } else { "s" }
        )];
        if !self.missing.is_empty() {
            parts.push(format!(
                "{} unknown account{} ({} reference{})",
                self.missing.len(),
                if self.missing.len() == 1 { "" } else { "s" },
                self.missing_references(),
                if self.missing_references() == 1 { "" } else { "s" },
            ));
        }
        if !self.skipped.is_empty() {
            parts.push(format!("{} skipped", self.skipped.len()));
        }
        parts.push(format!("grand total {}", self.grand_total));
        parts.join(" · ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn summary_mentions_missing_only_when_present() {
        let mut report = FillReport::default();
        assert_eq!(report.summary(), "0 cells resolved · grand total 0");

        report.missing.insert("999".to_string(), 2);
        report.grand_total = 1500;
        assert_eq!(
            report.summary(),
            "0 cells resolved · 1 unknown account (2 references) · grand total 1500"
        );
    }

    #[test]
    fn serializes_sections_by_name() {
        let mut report = FillReport::default();
        report.sections.add(Section::FixedIncome, 10);
        report.per_account.insert("300".to_string(), dec!(10000));
        report.changes.push(CellChange {
            cell: "DMPL!J37".to_string(),
            expression: "300".to_string(),
            total: dec!(10000),
            thousands: 10,
            section: Some(Section::FixedIncome),
        });

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["sections"]["fixed_income"], 10);
        assert_eq!(json["sections"]["equities"], 0);
        assert_eq!(json["changes"][0]["section"], "fixed_income");
        assert_eq!(json["per_account"]["300"], "10000");
    }
}
