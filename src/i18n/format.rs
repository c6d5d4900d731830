//! Locale-aware formatting of dates, numbers and prices.
//!
//! Formatting never fails from the caller's point of view: when a value
//! cannot be rendered with the locale's rules, a warning is logged and a
//! locale-agnostic representation is returned instead.

use crate::i18n::{CurrencyPosition, FormatRules, Locale};
use chrono::NaiveDate;
use fixed_decimal::FixedDecimal;
use icu::decimal::options::FixedDecimalFormatterOptions;
use icu::decimal::FixedDecimalFormatter;
use icu::locid::Locale as IcuLocale;
use std::fmt::Write;
use std::str::FromStr;
use tracing::warn;
use writeable::Writeable;

/// Maximum fraction digits shown by `format_number`.
const MAX_NUMBER_FRACTION_DIGITS: usize = 3;

/// Format a date as a short, numeric, locale-ordered date.
pub fn format_date(locale: Locale, date: NaiveDate) -> String {
    format_date_with(&locale.config().format, date)
}

/// Format a number with the locale's CLDR separators and up to three
/// fraction digits.
pub fn format_number(locale: Locale, value: f64) -> String {
    format_number_with(locale, value)
}

/// Format an amount in the locale's default currency.
pub fn format_currency(locale: Locale, amount: f64) -> String {
    format_currency_with(locale, &locale.config().format, amount)
}

pub(crate) fn format_date_with(rules: &FormatRules, date: NaiveDate) -> String {
    let mut out = String::new();
    match write!(out, "{}", date.format(rules.date_pattern)) {
        Ok(()) => out,
        Err(_) => {
            warn!(
                "Failed to format date {} with pattern '{}', using ISO-8601",
                date, rules.date_pattern
            );
            date.format("%Y-%m-%d").to_string()
        }
    }
}

pub(crate) fn format_number_with(locale: Locale, value: f64) -> String {
    if !value.is_finite() {
        warn!("Cannot format non-finite number {}", value);
        return value.to_string();
    }

    let fixed = format!("{:.*}", MAX_NUMBER_FRACTION_DIGITS, value.abs());
    let digits = trim_fraction(&fixed);
    match localize_decimal(locale, digits) {
        Ok(formatted) => format!("{}{}", sign_of(value, digits), formatted),
        Err(e) => {
            warn!("Failed to format {} for locale '{}': {}", value, locale, e);
            format!("{}{}", sign_of(value, digits), digits)
        }
    }
}

pub(crate) fn format_currency_with(locale: Locale, rules: &FormatRules, amount: f64) -> String {
    if !amount.is_finite() {
        warn!(
            "Cannot format non-finite amount {} as {}",
            amount, rules.currency_code
        );
        return format!("{} {}", amount, rules.currency_code);
    }

    let digits = format!("{:.*}", rules.currency_digits, amount.abs());
    let sign = sign_of(amount, &digits);
    let number = localize_decimal(locale, &digits).unwrap_or_else(|e| {
        warn!(
            "Failed to format amount {} for locale '{}': {}",
            amount, locale, e
        );
        digits.clone()
    });

    match rules.currency_position {
        CurrencyPosition::Before => format!("{}{}{}", sign, rules.currency_symbol, number),
        CurrencyPosition::After => format!("{}{}\u{a0}{}", sign, number, rules.currency_symbol),
    }
}

/// Apply the locale's CLDR grouping and decimal separator to a plain
/// non-negative decimal string such as `"1234.50"`.
///
/// Fraction digits in `digits` are kept as given, trailing zeros included.
fn localize_decimal(locale: Locale, digits: &str) -> Result<String, String> {
    let icu_locale: IcuLocale = locale
        .code()
        .parse()
        .map_err(|e| format!("invalid locale: {}", e))?;
    let formatter =
        FixedDecimalFormatter::try_new(&icu_locale.into(), FixedDecimalFormatterOptions::default())
            .map_err(|e| format!("no decimal data: {}", e))?;
    let decimal =
        FixedDecimal::from_str(digits).map_err(|e| format!("invalid decimal '{}': {}", digits, e))?;
    Ok(formatter.format(&decimal).write_to_string().into_owned())
}

/// Drop trailing fraction zeros (and a bare decimal point).
fn trim_fraction(fixed: &str) -> &str {
    if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed
    }
}

/// `"-"` when `value` is negative and does not round to zero.
fn sign_of(value: f64, rounded: &str) -> &'static str {
    if value < 0.0 && rounded.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::capture_warnings;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    // ==================== Date Tests ====================

    #[test]
    fn test_format_date_per_locale() {
        assert_eq!(format_date(Locale::ENGLISH, date()), "03/05/2024");
        assert_eq!(format_date(Locale::SPANISH, date()), "05/03/2024");
        assert_eq!(format_date(Locale::GERMAN, date()), "05.03.2024");
        assert_eq!(format_date(Locale::JAPANESE, date()), "2024/03/05");
    }

    #[test]
    fn test_format_date_invalid_pattern_falls_back_to_iso() {
        let mut rules = Locale::ENGLISH.config().format.clone();
        rules.date_pattern = "%Q";
        assert_eq!(format_date_with(&rules, date()), "2024-03-05");
    }

    // ==================== Number Tests ====================

    #[test]
    fn test_format_number_english() {
        assert_eq!(format_number(Locale::ENGLISH, 1234567.891), "1,234,567.891");
        assert_eq!(format_number(Locale::ENGLISH, 42.0), "42");
        assert_eq!(format_number(Locale::ENGLISH, 0.5), "0.5");
    }

    #[test]
    fn test_format_number_german_and_french() {
        assert_eq!(format_number(Locale::GERMAN, 1234.5), "1.234,5");
        assert_eq!(format_number(Locale::FRENCH, 1234.5), "1\u{202f}234,5");
    }

    #[test]
    fn test_format_number_spanish_minimum_grouping() {
        // Spanish only groups from five integer digits up
        assert_eq!(format_number(Locale::SPANISH, 1234.5), "1234,5");
        assert_eq!(format_number(Locale::SPANISH, 12345.5), "12.345,5");
    }

    #[test]
    fn test_format_number_negative() {
        assert_eq!(format_number(Locale::ENGLISH, -9876.25), "-9,876.25");
        assert_eq!(format_number(Locale::ENGLISH, -0.0001), "0");
    }

    #[test]
    fn test_format_number_rounds_to_three_digits() {
        assert_eq!(format_number(Locale::ENGLISH, 1.23456), "1.235");
    }

    #[test]
    fn test_format_number_non_finite_falls_back() {
        assert_eq!(format_number(Locale::ENGLISH, f64::NAN), "NaN");
        assert_eq!(format_number(Locale::GERMAN, f64::INFINITY), "inf");
    }

    #[test]
    fn test_format_number_fallback_logs_warning() {
        let (text, logs) = capture_warnings(|| format_number(Locale::ENGLISH, f64::NAN));

        assert_eq!(text, "NaN");
        assert!(logs.contains("WARN"), "logs: {}", logs);
        assert!(logs.contains("Cannot format non-finite number NaN"), "logs: {}", logs);
    }

    #[test]
    fn test_format_number_success_logs_nothing() {
        let (_, logs) = capture_warnings(|| format_number(Locale::GERMAN, 1234.5));
        assert!(logs.is_empty(), "logs: {}", logs);
    }

    #[test]
    fn test_trim_fraction() {
        assert_eq!(trim_fraction("42.000"), "42");
        assert_eq!(trim_fraction("0.500"), "0.5");
        assert_eq!(trim_fraction("100"), "100");
    }

    // ==================== Currency Tests ====================

    #[test]
    fn test_format_currency_symbol_before() {
        assert_eq!(format_currency(Locale::ENGLISH, 1234.5), "$1,234.50");
        assert_eq!(format_currency(Locale::CHINESE, 99.0), "¥99.00");
    }

    #[test]
    fn test_format_currency_symbol_after() {
        assert_eq!(format_currency(Locale::GERMAN, 1234.5), "1.234,50\u{a0}€");
        assert_eq!(format_currency(Locale::SPANISH, 10.0), "10,00\u{a0}€");
    }

    #[test]
    fn test_format_currency_yen_has_no_fraction() {
        assert_eq!(format_currency(Locale::JAPANESE, 1234.56), "￥1,235");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(Locale::ENGLISH, -5.25), "-$5.25");
        assert_eq!(format_currency(Locale::ENGLISH, -0.001), "$0.00");
    }

    #[test]
    fn test_format_currency_non_finite_falls_back() {
        assert_eq!(format_currency(Locale::ENGLISH, f64::NAN), "NaN USD");
    }

    #[test]
    fn test_format_currency_fallback_logs_warning() {
        let (text, logs) =
            capture_warnings(|| format_currency(Locale::GERMAN, f64::NEG_INFINITY));

        assert_eq!(text, "-inf EUR");
        assert!(
            logs.contains("Cannot format non-finite amount -inf as EUR"),
            "logs: {}",
            logs
        );
    }

    #[test]
    fn test_format_date_fallback_logs_warning() {
        let mut rules = Locale::ENGLISH.config().format.clone();
        rules.date_pattern = "%Q";

        let (text, logs) = capture_warnings(|| format_date_with(&rules, date()));

        assert_eq!(text, "2024-03-05");
        assert!(logs.contains("using ISO-8601"), "logs: {}", logs);
    }
}
