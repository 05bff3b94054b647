//! Amount conversion and display formatting.

use rust_decimal::{Decimal, RoundingStrategy};

/// Converts a USD amount at the given rate, rounded to 2 decimal
/// places (midpoint away from zero). Non-positive amounts convert
/// to zero.
pub fn convert_usd_to_ves(amount: Decimal, rate: Decimal) -> Decimal {
    if amount <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (amount * rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount the Venezuelan way: thousands separated with
/// periods, decimal comma, `Bs.` suffix (e.g. `1.234,56 Bs.`).
pub fn format_ves(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let raw = format!("{:.2}", rounded);
    let (sign, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("{}{},{} Bs.", sign, grouped, fraction)
}
