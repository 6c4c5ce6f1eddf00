//! Cell text canonicalization for account-code extraction.
//!
//! Template authors write account references in many shapes: `"12345 + 999"`,
//! `R$ 1.234 – 5678`, `1234;5678`. Normalization turns every separator into a
//! single `+` joiner and drops noise so that each remaining digit run is exactly
//! one account code.

use std::sync::OnceLock;

use regex::Regex;

fn digit_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+").expect("static pattern"))
}

/// Canonicalize raw cell text: `R$ 1.234 – 5678` becomes `1234+5678`.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let without_currency = raw.replace("R$", "");

    for ch in without_currency.chars() {
        match ch {
            '\u{a0}' | '.' => {}
            '\u{2014}' | '\u{2013}' | '-' => out.push('+'),
            ';' | ',' => out.push('+'),
            '\u{2019}' | '`' => out.push('\''),
            c if c.is_whitespace() => {}
            c => out.push(c),
        }
    }
    out
}

/// True when the normalized text still carries at least one ASCII digit.
pub fn has_digits(raw: &str) -> bool {
    normalize(raw).bytes().any(|b| b.is_ascii_digit())
}

/// Every maximal digit run of the normalized text, in order, duplicates kept.
pub fn account_codes(raw: &str) -> Vec<String> {
    let normalized = normalize(raw);
    let unquoted: String = normalized.chars().filter(|c| *c != '"' && *c != '\'').collect();
    digit_run()
        .find_iter(&unquoted)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// First digit run of `raw`, without normalization. Trial-balance labels may
/// carry descriptive prefixes or suffixes around the code.
pub fn first_digit_run(raw: &str) -> Option<&str> {
    digit_run().find(raw).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_become_plus() {
        assert_eq!(normalize("12345 - 999"), "12345+999");
        assert_eq!(normalize("1\u{2013}2\u{2014}3"), "1+2+3");
        assert_eq!(normalize("1;2,3"), "1+2+3");
    }

    #[test]
    fn currency_and_thousands_are_dropped() {
        assert_eq!(normalize("R$ 1.234"), "1234");
        assert_eq!(normalize("1\u{a0}234"), "1234");
    }

    #[test]
    fn curly_quotes_are_straightened() {
        assert_eq!(normalize("\u{2019}61180`"), "'61180'");
    }

    #[test]
    fn detection_and_extraction_agree() {
        for raw in ["Caixa", "   ", "R$", "—", "12", "a1b", "\"61180\""] {
            assert_eq!(has_digits(raw), !account_codes(raw).is_empty(), "{raw:?}");
        }
    }

    #[test]
    fn extracts_every_run_including_duplicates() {
        assert_eq!(account_codes("12345 + 999"), vec!["12345", "999"]);
        assert_eq!(account_codes("'100' ; '100'"), vec!["100", "100"]);
        assert_eq!(account_codes("1.234,5"), vec!["1234", "5"]);
    }

    #[test]
    fn text_without_digits_yields_nothing() {
        assert!(account_codes("Demais receitas").is_empty());
        assert!(!has_digits("Demais receitas"));
    }

    #[test]
    fn first_run_ignores_later_codes() {
        assert_eq!(first_digit_run("Conta 61180 - Taxa 2"), Some("61180"));
        assert_eq!(first_digit_run("sem codigo"), None);
    }
}
