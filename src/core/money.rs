//! Money helpers shared by the pricing engine and the renderers.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Round to `places` decimals using banker's rounding (ROUND_HALF_EVEN).
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Formats an amount as currency with two decimals and thousands separators.
///
/// ```
/// use rust_decimal_macros::dec;
/// use landquote::core::money::format_currency;
///
/// assert_eq!(format_currency(dec!(43300), "$"), "$43,300.00");
/// assert_eq!(format_currency(dec!(1234567.891), "$"), "$1,234,567.89");
/// ```
pub fn format_currency(amount: Decimal, symbol: &str) -> String {
    let rounded = round_money(amount, 2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!("{sign}{symbol}{}.{cents}", group_thousands(whole))
}

/// Formats acreage the way it was entered, keeping at least one decimal.
pub fn format_acres(acres: Decimal) -> String {
    let normalized = acres.normalize();
    if normalized.scale() == 0 {
        format!("{normalized}.0")
    } else {
        normalized.to_string()
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_bankers_rounding() {
        assert_eq!(round_money(dec!(2.125), 2), dec!(2.12));
        assert_eq!(round_money(dec!(2.135), 2), dec!(2.14));
        assert_eq!(round_money(dec!(1.236), 2), dec!(1.24));
    }

    #[test]
    fn test_format_currency_thousands() {
        assert_eq!(format_currency(dec!(0), "$"), "$0.00");
        assert_eq!(format_currency(dec!(999.5), "$"), "$999.50");
        assert_eq!(format_currency(dec!(1000), "$"), "$1,000.00");
        assert_eq!(format_currency(dec!(21650), "$"), "$21,650.00");
        assert_eq!(format_currency(dec!(123456789.004), "$"), "$123,456,789.00");
    }

    #[test]
    fn test_format_currency_fractional_retainer() {
        // 3675.5 / 2
        assert_eq!(format_currency(dec!(1837.75), "$"), "$1,837.75");
        assert_eq!(format_currency(dec!(2512.125), "$"), "$2,512.12");
    }

    #[test]
    fn test_format_currency_negative_and_symbol() {
        assert_eq!(format_currency(dec!(-1500), "$"), "-$1,500.00");
        assert_eq!(format_currency(dec!(-0.001), "$"), "$0.00");
        assert_eq!(format_currency(dec!(2000), "€"), "€2,000.00");
    }

    #[test]
    fn test_format_acres() {
        assert_eq!(format_acres(dec!(50)), "50.0");
        assert_eq!(format_acres(dec!(50.0)), "50.0");
        assert_eq!(format_acres(dec!(12.50)), "12.5");
        assert_eq!(format_acres(dec!(0.1)), "0.1");
    }
}
