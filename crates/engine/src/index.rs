use std::collections::BTreeMap;
use std::str::FromStr;

use dempl_core::CellValue;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::TrialBalance;
use crate::normalize::first_digit_run;

/// Account code → summed balance (currency units).
///
/// Built once per run from the trial balance and read-only afterward.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AccountIndex {
    balances: BTreeMap<String, Decimal>,
}

impl AccountIndex {
    /// Group trial-balance rows by the first digit run of the account label and
    /// sum their balances. Rows without a digit run in the label are dropped.
    pub fn build(tb: &TrialBalance, account_col: usize, balance_col: usize) -> Self {
        let mut index = Self::default();
        let mut dropped = 0usize;

        for row in 0..tb.rows.len() {
            let label = tb.cell(row, account_col).display();
            match first_digit_run(&label) {
                Some(code) => index.add(code, coerce_balance(tb.cell(row, balance_col))),
                None => dropped += 1,
            }
        }

        log::debug!(
            "account index: {} code(s) from {} row(s), {} row(s) without a code",
            index.len(),
            tb.rows.len(),
            dropped
        );
        index
    }

    fn add(&mut self, code: &str, balance: Decimal) {
        let slot = self.balances.entry(code.to_string()).or_insert(Decimal::ZERO);
        *slot = saturating_sum(*slot, balance).unwrap_or_else(|clamped| {
            log::warn!("account {code}: balance sum out of range, clamped to {clamped}");
            clamped
        });
    }

    pub fn get(&self, code: &str) -> Option<Decimal> {
        self.balances.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.balances.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Codes in ascending string order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> + '_ {
        self.balances.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<S: AsRef<str>> FromIterator<(S, Decimal)> for AccountIndex {
    fn from_iter<I: IntoIterator<Item = (S, Decimal)>>(iter: I) -> Self {
        let mut index = Self::default();
        for (code, balance) in iter {
            index.add(code.as_ref(), balance);
        }
        index
    }
}

/// `a + b`, or `Err` with the bound it would have crossed.
pub(crate) fn saturating_sum(a: Decimal, b: Decimal) -> Result<Decimal, Decimal> {
    a.checked_add(b)
        .ok_or(if b.is_sign_negative() { Decimal::MIN } else { Decimal::MAX })
}

/// Numeric coercion of a balance cell. Anything that is not a finite number or
/// a plain decimal string counts as zero.
pub fn coerce_balance(value: &CellValue) -> Decimal {
    match value {
        CellValue::Number(n) => Decimal::from_f64(*n).map(|d| d.normalize()).unwrap_or(Decimal::ZERO),
        CellValue::Text(s) => parse_plain_decimal(s).unwrap_or(Decimal::ZERO),
        CellValue::Empty => Decimal::ZERO,
    }
}

fn parse_plain_decimal(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}
