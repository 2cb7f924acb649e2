//! Preference-driven rendering of amounts, dates, and percentages.
//!
//! History records store these renderings verbatim, so they must be
//! deterministic for a given set of preferences.

use chrono::NaiveDate;

use crate::models::preferences::UserPreferences;

/// Render an amount with two decimals and locale digit grouping,
/// e.g., 1234.5 → "1,234.50" (en-US) or "1.234,50" (de-DE).
/// No currency symbol — the display currency is global and implied.
pub fn format_amount(amount: f64, preferences: &UserPreferences) -> String {
    let (group_sep, decimal_sep) = match preferences.number_format.as_str() {
        "de-DE" | "es-ES" | "it-IT" => ('.', ','),
        _ => (',', '.'),
    };

    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(group_sep);
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}{decimal_sep}{frac:02}")
}

/// Render a date using the preference token ("dd.MM.yyyy" and friends).
/// Unknown tokens pass through literally.
pub fn format_date(date: NaiveDate, preferences: &UserPreferences) -> String {
    let fmt = preferences
        .date_format
        .replace("yyyy", "%Y")
        .replace("MM", "%m")
        .replace("dd", "%d");
    date.format(&fmt).to_string()
}

/// Long-form calendar date used in change history, e.g., "January 5, 2026".
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Share of `total`, in percent, rounded to one decimal place.
/// A zero or negative total is defined as 0.0 — never a division error.
pub fn percentage(value: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    ((value / total) * 1000.0).round() / 10.0
}
