use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::decimal::{Money, Rate};

/// 45000000 cents -> "$450,000.00"
pub fn format_currency(amount: Money) -> String {
    let cents = amount.cents();
    let magnitude = cents.unsigned_abs();
    let sign = if cents < 0 { "-" } else { "" };
    format!(
        "{}${}.{:02}",
        sign,
        group_thousands(&(magnitude / 100).to_string()),
        magnitude % 100
    )
}

/// "$1.25M", "$450K", or the full amount below a thousand dollars
pub fn format_currency_abbreviated(amount: Money) -> String {
    let dollars = amount.to_dollars();
    if dollars >= dec!(1_000_000) {
        format!("${:.2}", round_half_up(dollars / dec!(1_000_000), 2)) + "M"
    } else if dollars >= dec!(1_000) {
        format!("${}K", round_half_up(dollars / dec!(1_000), 0))
    } else {
        format_currency(amount)
    }
}

/// 625 bps -> "6.25%"
pub fn format_percentage(rate: Rate, decimals: usize) -> String {
    let value = round_half_up(rate.as_percentage(), decimals as u32);
    format!("{:.*}%", decimals, value)
}

/// 450000 -> "450,000"
pub fn format_number(value: Decimal, decimals: u32) -> String {
    let rounded = round_half_up(value, decimals);
    let text = format!("{:.*}", decimals as usize, rounded.abs());
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    match fraction {
        Some(fraction) => format!("{}{}.{}", sign, group_thousands(whole), fraction),
        None => format!("{}{}", sign, group_thousands(whole)),
    }
}

fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
