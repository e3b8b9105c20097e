//! Presentation formatting
//!
//! Money is rounded only here; balances and transfers stay exact until they
//! are rendered.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use ledger_core::Currency;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

/// Round to two decimals, halves away from zero
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Render an amount with symbol, grouping and two decimals
///
/// INR uses Indian grouping (`₹1,23,456.78`); everything else groups by
/// thousands (`$1,234.50`).
pub fn format_currency(amount: Decimal, currency: Currency) -> String {
    let rounded = round_money(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let digits = format!("{:.2}", rounded.abs());
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let grouped = if currency == Currency::INR {
        group_indian(whole)
    } else {
        group_thousands(whole)
    };

    format!("{sign}{}{grouped}.{fraction}", currency.symbol())
}

/// Like [`format_currency`] but with an explicit `+` on positive balances
pub fn format_balance(net_balance: Decimal, currency: Currency) -> String {
    let formatted = format_currency(net_balance, currency);
    if round_money(net_balance) > Decimal::ZERO {
        format!("+{formatted}")
    } else {
        formatted
    }
}

/// Short timestamp relative to `now`
///
/// `Today, 3:05 PM`, `Yesterday`, `Feb 15` within the current year, and
/// `Feb 15, 2023` otherwise. Calendar days are taken in `now`'s time zone.
pub fn format_relative<Tz>(created_at: &DateTime<Utc>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let created = created_at.with_timezone(&now.timezone());
    let today = now.date_naive();
    let day = created.date_naive();

    if day == today {
        format!("Today, {}", created.format("%-I:%M %p"))
    } else if today.pred_opt() == Some(day) {
        "Yesterday".to_string()
    } else if day.year() == today.year() {
        created.format("%b %-d").to_string()
    } else {
        created.format("%b %-d, %Y").to_string()
    }
}

fn group_thousands(whole: &str) -> String {
    let len = whole.len();
    let mut out = String::with_capacity(len + len / 3);

    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// Last three digits, then pairs: 12,34,567
fn group_indian(whole: &str) -> String {
    if whole.len() <= 3 {
        return whole.to_string();
    }

    let (head, tail) = whole.split_at(whole.len() - 3);
    let len = head.len();
    let mut out = String::with_capacity(whole.len() + len / 2 + 1);

    for (i, ch) in head.chars().enumerate() {
        if i > 0 && (len - i) % 2 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out.push(',');
    out.push_str(tail);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case::half_up(dec!(2.345), dec!(2.35))]
    #[case::half_negative(dec!(-2.345), dec!(-2.35))]
    #[case::third(dec!(33.333333), dec!(33.33))]
    #[case::already_rounded(dec!(10.5), dec!(10.50))]
    fn test_round_money(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_money(input), expected);
    }

    #[rstest]
    #[case::inr_small(dec!(625), Currency::INR, "₹625.00")]
    #[case::inr_thousands(dec!(1875), Currency::INR, "₹1,875.00")]
    #[case::inr_lakh(dec!(123456.78), Currency::INR, "₹1,23,456.78")]
    #[case::inr_crore(dec!(12345678.9), Currency::INR, "₹1,23,45,678.90")]
    #[case::inr_negative(dec!(-1025), Currency::INR, "-₹1,025.00")]
    #[case::usd(dec!(1234.5), Currency::USD, "$1,234.50")]
    #[case::usd_million(dec!(1234567), Currency::USD, "$1,234,567.00")]
    #[case::eur_zero(dec!(0), Currency::EUR, "€0.00")]
    #[case::negative_rounds_to_zero(dec!(-0.001), Currency::GBP, "£0.00")]
    #[case::aed(dec!(99.999), Currency::AED, "AED 100.00")]
    fn test_format_currency(
        #[case] amount: Decimal,
        #[case] currency: Currency,
        #[case] expected: &str,
    ) {
        assert_eq!(format_currency(amount, currency), expected);
    }

    #[test]
    fn test_format_balance_sign() {
        assert_eq!(format_balance(dec!(1875), Currency::INR), "+₹1,875.00");
        assert_eq!(format_balance(dec!(-225), Currency::INR), "-₹225.00");
        assert_eq!(format_balance(dec!(0), Currency::INR), "₹0.00");
    }

    #[test]
    fn test_format_relative() {
        let now = Utc.with_ymd_and_hms(2024, 2, 15, 18, 0, 0).unwrap();

        let at = |y, m, d, h, min| Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap();

        assert_eq!(format_relative(&at(2024, 2, 15, 15, 5), &now), "Today, 3:05 PM");
        assert_eq!(format_relative(&at(2024, 2, 15, 0, 30), &now), "Today, 12:30 AM");
        assert_eq!(format_relative(&at(2024, 2, 14, 23, 59), &now), "Yesterday");
        assert_eq!(format_relative(&at(2024, 1, 3, 9, 0), &now), "Jan 3");
        assert_eq!(format_relative(&at(2023, 2, 15, 9, 0), &now), "Feb 15, 2023");
    }

    #[test]
    fn test_format_relative_uses_viewer_time_zone() {
        // 20:00 UTC on the 14th is 01:30 on the 15th in UTC+05:30
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let now = ist.with_ymd_and_hms(2024, 2, 15, 9, 0, 0).unwrap();
        let created = Utc.with_ymd_and_hms(2024, 2, 14, 20, 0, 0).unwrap();

        assert_eq!(format_relative(&created, &now), "Today, 1:30 AM");
    }
}
