use dempl_core::CellValue;
use rust_decimal::Decimal;

use crate::index::{saturating_sum, AccountIndex};
use crate::normalize::{account_codes, has_digits};

/// Outcome of resolving one template cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Referenced codes in cell order, duplicates kept.
    pub codes: Vec<String>,
    /// Unrounded currency-unit sum.
    pub total: Decimal,
    /// Codes absent from the index (contributed zero).
    pub missing: Vec<String>,
    /// The sum left the representable range; `total` is clamped.
    pub overflowed: bool,
}

/// Whether a cell looks like an account expression.
pub fn is_eligible(value: &CellValue) -> bool {
    match value {
        CellValue::Empty => false,
        CellValue::Number(_) => true,
        CellValue::Text(s) => has_digits(s),
    }
}

/// Codes referenced by a cell (empty for ineligible cells).
pub fn referenced_codes(value: &CellValue) -> Vec<String> {
    if !is_eligible(value) {
        return Vec::new();
    }
    account_codes(&value.display())
}

/// Resolve a cell against the index. `None` when the cell references nothing,
/// in which case it must be left untouched.
pub fn resolve(value: &CellValue, index: &AccountIndex) -> Option<Resolution> {
    let codes = referenced_codes(value);
    if codes.is_empty() {
        return None;
    }

    let mut total = Decimal::ZERO;
    let mut missing = Vec::new();
    let mut overflowed = false;
    for code in &codes {
        match index.get(code) {
            Some(balance) => {
                total = saturating_sum(total, balance).unwrap_or_else(|clamped| {
                    overflowed = true;
                    clamped
                })
            }
            None => missing.push(code.clone()),
        }
    }

    Some(Resolution { codes, total, missing, overflowed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn index() -> AccountIndex {
        vec![("12345", dec!(1500000)), ("61180", dec!(-2500)), ("7", dec!(0.5))]
            .into_iter()
            .collect()
    }

    #[test]
    fn missing_codes_contribute_zero() {
        let r = resolve(&CellValue::text("12345 + 999"), &index()).unwrap();
        assert_eq!(r.codes, vec!["12345", "999"]);
        assert_eq!(r.total, dec!(1500000));
        assert_eq!(r.missing, vec!["999"]);
    }

    #[test]
    fn duplicates_are_summed_not_deduplicated() {
        let r = resolve(&CellValue::text("61180;61180"), &index()).unwrap();
        assert_eq!(r.total, dec!(-5000));
    }

    #[test]
    fn out_of_range_total_is_flagged() {
        let huge = Decimal::MAX / dec!(1.5);
        let index: AccountIndex = vec![("100", huge)].into_iter().collect();
        let r = resolve(&CellValue::text("100+100"), &index).unwrap();
        assert!(r.overflowed);
        assert_eq!(r.total, Decimal::MAX);

        let r = resolve(&CellValue::text("100"), &index).unwrap();
        assert!(!r.overflowed);
    }

    #[test]
    fn numeric_cell_is_its_own_code() {
        let r = resolve(&CellValue::Number(12345.0), &index()).unwrap();
        assert_eq!(r.codes, vec!["12345"]);
        assert!(r.missing.is_empty());
    }

    #[test]
    fn text_without_digits_is_untouched() {
        assert!(!is_eligible(&CellValue::text("Demais receitas")));
        assert_eq!(resolve(&CellValue::text("Demais receitas"), &index()), None);
        assert_eq!(resolve(&CellValue::Empty, &index()), None);
    }

    #[test]
    fn dashes_and_currency_are_separators() {
        let r = resolve(&CellValue::text("R$ 12345 – 7"), &index()).unwrap();
        assert_eq!(r.codes, vec!["12345", "7"]);
        assert_eq!(r.total, dec!(1500000.5));
    }
}
