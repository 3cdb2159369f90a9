//! Display helpers shared by the page view models and the CLI.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::catalog::Currency;

/// Descriptions longer than this collapse behind a "read more" toggle.
pub const DEFAULT_LONG_TEXT_LIMIT: usize = 180;

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern compiles"));

/// Round half-to-even to the smallest unit of `currency`.
pub fn round_to_minor_units(amount: Decimal, currency: Currency) -> Decimal {
    amount.round_dp_with_strategy(currency.minor_units(), RoundingStrategy::MidpointNearestEven)
}

/// Full currency rendering, e.g. `1.200.000.000 ₫`; `N/A` when no amount is known.
pub fn format_currency(value: Option<Decimal>, currency: Currency) -> String {
    let Some(value) = value else {
        return "N/A".to_string();
    };

    let scale = currency.minor_units();
    let rounded = round_to_minor_units(value, currency);
    match currency {
        Currency::Vnd => format!("{}\u{a0}₫", group_digits(rounded, scale, '.', ',')),
        Currency::Usd => format!("${}", group_digits(rounded, scale, ',', '.')),
    }
}

pub fn format_vnd(value: Decimal) -> String {
    format_currency(Some(value), Currency::Vnd)
}

/// Short form used in tight layouts: `1.20 Ty VND`, `20.0 Trieu VND`.
/// Only dong amounts are abbreviated; other currencies use the full form.
pub fn format_compact_currency(value: Option<Decimal>, currency: Currency) -> String {
    let Some(value) = value else {
        return "N/A".to_string();
    };
    if currency != Currency::Vnd {
        return format_currency(Some(value), currency);
    }

    let billion = Decimal::from(1_000_000_000u64);
    let million = Decimal::from(1_000_000u64);

    if value >= billion {
        let scaled = (value / billion).round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
        return format!("{scaled:.2} Ty {currency}");
    }

    if value >= million {
        let scaled = (value / million).round_dp_with_strategy(1, RoundingStrategy::MidpointNearestEven);
        return format!("{scaled:.1} Trieu {currency}");
    }

    format_currency(Some(value), currency)
}

fn group_digits(amount: Decimal, scale: u32, group_sep: char, decimal_sep: char) -> String {
    let rendered = format!("{:.*}", scale as usize, amount.abs());
    let (integer, fraction) = match rendered.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (rendered.as_str(), None),
    };

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    if amount < Decimal::ZERO {
        grouped.push('-');
    }
    for (index, digit) in digits.iter().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(group_sep);
        }
        grouped.push(*digit);
    }

    if let Some(fraction) = fraction {
        grouped.push(decimal_sep);
        grouped.push_str(fraction);
    }

    grouped
}

pub fn slugify(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    NON_SLUG_CHARS
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

pub fn is_long_text(text: &str, limit: usize) -> bool {
    text.trim().chars().count() > limit
}

/// `2025-12-31` becomes `31 Dec 2025`; text that is not a date is returned unchanged.
pub fn format_date_label(value: Option<&str>) -> String {
    let Some(raw) = value.filter(|raw| !raw.is_empty()) else {
        return String::new();
    };

    if let Ok(date) = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        return date.format("%d %b %Y").to_string();
    }

    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(timestamp) => timestamp.date_naive().format("%d %b %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}
