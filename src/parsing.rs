use rust_decimal::Decimal;
use std::str::FromStr;

use crate::decimal::{Money, Rate};
use crate::types::RepaymentType;

const CURRENCY_SYMBOLS: [char; 4] = ['$', '£', '€', '¥'];

/// "$450,000.50" -> 45000050 cents
pub fn parse_currency_input(input: &str) -> Option<Money> {
    input.parse::<Money>().ok()
}

/// "6.25%", "6.25" and "0.0625" all -> 625 bps
///
/// values below 1 are taken as already-fractional rates
pub fn parse_percentage_input(input: &str) -> Option<Rate> {
    input.parse::<Rate>().ok()
}

/// whole years, e.g. "30"
pub fn parse_years_input(input: &str) -> Option<u32> {
    let cleaned = input.trim();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    cleaned.parse().ok()
}

/// "principal_and_interest" / "interest_only", hyphens and case ignored
pub fn parse_repayment_type(input: &str) -> Option<RepaymentType> {
    match input.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "principal_and_interest" | "principal_interest" | "p&i" => {
            Some(RepaymentType::PrincipalAndInterest)
        }
        "interest_only" | "io" => Some(RepaymentType::InterestOnly),
        _ => None,
    }
}

/// strip symbols, separators and whitespace; the rest must be a non-negative decimal
pub(crate) fn clean_currency_text(input: &str) -> Option<Decimal> {
    let cleaned: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && !CURRENCY_SYMBOLS.contains(c))
        .collect();
    parse_unsigned_decimal(&cleaned)
}

/// strip '%' and whitespace; the rest must be a decimal, optionally signed
pub(crate) fn clean_percentage_text(input: &str) -> Option<Decimal> {
    let cleaned: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '%')
        .collect();
    match cleaned.strip_prefix('-') {
        Some(rest) => parse_unsigned_decimal(rest).map(|d| -d),
        None => parse_unsigned_decimal(cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    }
}

fn parse_unsigned_decimal(text: &str) -> Option<Decimal> {
    let digits = text.chars().filter(|c| c.is_ascii_digit()).count();
    let points = text.chars().filter(|c| *c == '.').count();
    if digits == 0 || points > 1 || digits + points != text.len() {
        return None;
    }
    let padded = match (text.starts_with('.'), text.ends_with('.')) {
        (true, _) => format!("0{}", text),
        (_, true) => format!("{}0", text),
        _ => text.to_string(),
    };
    Decimal::from_str(&padded).ok()
}
