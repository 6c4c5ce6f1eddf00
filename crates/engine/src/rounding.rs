//! Thousands rounding and locale rendering.
//!
//! All rounding here is decimal half-up (ties away from zero). Binary float
//! rounding would turn `2500` into `2` instead of `3` in thousands.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Number format applied to every cell rewritten with a thousands integer.
pub const INT_THOUSANDS_FORMAT: &str = "#,##0;(#,##0);-";

/// Excel "Text" number format.
pub const TEXT_FORMAT: &str = "@";

/// Separators for rendering decimals as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberLocale {
    pub thousands: char,
    pub decimal: char,
}

impl NumberLocale {
    pub const PT_BR: NumberLocale = NumberLocale { thousands: '.', decimal: ',' };
}

/// Currency units → whole thousands, half-up. Saturates at the `i64` bounds.
pub fn to_thousands(value: Decimal) -> i64 {
    let scaled = value / Decimal::from(1000);
    let rounded = scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    rounded.to_i64().unwrap_or(if rounded.is_sign_negative() { i64::MIN } else { i64::MAX })
}

/// `0` → `-`, `-1234` → `(1.234)`, `1234567` → `1.234.567`.
pub fn display_thousands(value: i64) -> String {
    if value == 0 {
        return "-".to_string();
    }
    let grouped = group_digits(&value.unsigned_abs().to_string(), NumberLocale::PT_BR.thousands);
    if value < 0 {
        format!("({grouped})")
    } else {
        grouped
    }
}

/// Half-up to `places` decimals, always showing them, with `locale` separators.
pub fn format_decimal(value: Decimal, places: u32, locale: NumberLocale) -> String {
    let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let plain = format!("{:.*}", places as usize, rounded.abs());

    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let mut out = String::with_capacity(plain.len() + plain.len() / 3 + 2);
    if negative {
        out.push('-');
    }
    out.push_str(&group_digits(int_part, locale.thousands));
    if let Some(frac) = frac_part {
        out.push(locale.decimal);
        out.push_str(frac);
    }
    out
}

/// PT-BR rendering: `123519889.5355` at 3 places → `123.519.889,536`.
pub fn display_pt_br(value: Decimal, places: u32) -> String {
    format_decimal(value, places, NumberLocale::PT_BR)
}

fn group_digits(digits: &str, sep: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}
