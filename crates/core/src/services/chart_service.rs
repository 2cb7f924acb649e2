use chrono::{Datelike, Duration, NaiveDate};

use crate::models::chart::{ChartPoint, Period};
use crate::models::expense::Expense;

const MONTH_ABBREVS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun",
    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Produces fixed-length, chart-ready spending series.
///
/// The core computes all the numbers — the frontend only renders.
/// Every bucket in a series is present even when its total is zero, so
/// the series length depends only on the period, never on the data:
/// - `week`: exactly 7 buckets (last 7 days ending `today`)
/// - `month`: one bucket per calendar day of `today`'s month
/// - `year`: exactly 12 buckets (the months of `today`'s year)
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Bucketed totals for `period`, relative to `today`.
    pub fn chart_data(
        &self,
        expenses: &[Expense],
        period: Period,
        today: NaiveDate,
    ) -> Vec<ChartPoint> {
        match period {
            Period::Week => self.weekly(expenses, today),
            Period::Month => self.monthly(expenses, today),
            Period::Year => self.yearly(expenses, today),
        }
    }

    /// Last 7 calendar days ending `today`, oldest first, labeled by
    /// weekday abbreviation. Matching is same-day, not time-of-day.
    fn weekly(&self, expenses: &[Expense], today: NaiveDate) -> Vec<ChartPoint> {
        let mut points = Vec::with_capacity(7);
        for offset in (0..7).rev() {
            let day = today - Duration::days(offset);
            points.push(ChartPoint {
                label: day.format("%a").to_string(),
                amount: day_total(expenses, day),
            });
        }
        points
    }

    /// Every day of `today`'s month, from the 1st to the last day,
    /// labeled by day-of-month number.
    fn monthly(&self, expenses: &[Expense], today: NaiveDate) -> Vec<ChartPoint> {
        let mut points = Vec::new();
        let month = today.month();
        let Some(mut day) = today.with_day(1) else {
            return points;
        };
        while day.month() == month {
            points.push(ChartPoint {
                label: day.day().to_string(),
                amount: day_total(expenses, day),
            });
            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        points
    }

    /// The 12 months of `today`'s year, labeled by month abbreviation.
    /// An expense matches on its (month, year) pair, never on the day.
    fn yearly(&self, expenses: &[Expense], today: NaiveDate) -> Vec<ChartPoint> {
        let year = today.year();
        (1..=12u32)
            .map(|month| ChartPoint {
                label: MONTH_ABBREVS[(month - 1) as usize].to_string(),
                amount: expenses
                    .iter()
                    .filter(|e| e.date.month() == month && e.date.year() == year)
                    .map(|e| e.amount)
                    .sum(),
            })
            .collect()
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

fn day_total(expenses: &[Expense], day: NaiveDate) -> f64 {
    expenses
        .iter()
        .filter(|e| e.date == day)
        .map(|e| e.amount)
        .sum()
}
