use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::format::percentage;
use crate::models::analytics::{BudgetProgress, CategorySlice, MonthComparison, SpendingSummary};
use crate::models::category::Category;
use crate::models::expense::Expense;

/// Label for expenses whose category is absent or no longer exists.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Neutral display color for the uncategorized group.
pub const UNCATEGORIZED_COLOR: &str = "hsl(var(--muted))";

/// Computes derived spending views: totals, category breakdowns,
/// month-over-month deltas, and budget progress.
///
/// All operations are pure, total functions over well-formed input:
/// empty lists, dangling category references, and categories with no
/// budget all take defined defaults instead of failing.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Nominal sum of all expense amounts. Arithmetic assumes a single
    /// working currency; no conversion happens here.
    pub fn total_spending(&self, expenses: &[Expense]) -> f64 {
        expenses.iter().map(|e| e.amount).sum()
    }

    /// Per-category totals with display metadata, sorted descending by
    /// amount. Ties keep the order in which categories were first
    /// encountered in the expense list (stable sort).
    ///
    /// Unknown or absent category references group under "Uncategorized"
    /// with a neutral color. The slice percentages sum to the grand total
    /// share, each rounded to one decimal place; an all-zero set yields 0%.
    pub fn category_breakdown(
        &self,
        expenses: &[Expense],
        categories: &[Category],
    ) -> Vec<CategorySlice> {
        // Group while remembering first-encounter order for the tie-break.
        let mut encounter_order: Vec<Option<String>> = Vec::new();
        let mut totals: HashMap<Option<String>, f64> = HashMap::new();
        for expense in expenses {
            let key = expense.category_id.clone();
            if !totals.contains_key(&key) {
                encounter_order.push(key.clone());
            }
            *totals.entry(key).or_insert(0.0) += expense.amount;
        }

        let grand_total: f64 = totals.values().sum();

        let mut slices: Vec<CategorySlice> = encounter_order
            .into_iter()
            .map(|key| {
                let amount = totals.get(&key).copied().unwrap_or(0.0);
                let category = key
                    .as_deref()
                    .and_then(|id| categories.iter().find(|c| c.id == id));
                CategorySlice {
                    name: category
                        .map(|c| c.name.clone())
                        .unwrap_or_else(|| UNCATEGORIZED_LABEL.to_string()),
                    color: category
                        .map(|c| c.color.clone())
                        .unwrap_or_else(|| UNCATEGORIZED_COLOR.to_string()),
                    category_id: key,
                    amount,
                    percentage: percentage(amount, grand_total),
                }
            })
            .collect();

        // Stable sort keeps encounter order on equal amounts.
        slices.sort_by(|a, b| {
            b.amount
                .partial_cmp(&a.amount)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        slices
    }

    /// Current calendar month total vs the previous one, with correct
    /// year rollover at the January boundary.
    pub fn month_over_month(&self, expenses: &[Expense], today: NaiveDate) -> MonthComparison {
        let (current_month, current_year) = (today.month(), today.year());
        let (previous_month, previous_year) = if current_month == 1 {
            (12, current_year - 1)
        } else {
            (current_month - 1, current_year)
        };

        let current_total = month_total(expenses, current_month, current_year);
        let previous_total = month_total(expenses, previous_month, previous_year);

        MonthComparison {
            current_total,
            previous_total,
            change_pct: change_pct(previous_total, current_total),
        }
    }

    /// Budget standing for one category. `None` when the category has no
    /// budget set. The ratio clamps at 1.0 and the remaining floors at 0,
    /// so over-budget categories still render a full (not overflowing) bar.
    pub fn budget_progress(
        &self,
        category: &Category,
        expenses: &[Expense],
    ) -> Option<BudgetProgress> {
        let budget = category.budget?;
        let spent: f64 = expenses
            .iter()
            .filter(|e| e.category_id.as_deref() == Some(category.id.as_str()))
            .map(|e| e.amount)
            .sum();

        let ratio = if budget > 0.0 {
            (spent / budget).min(1.0)
        } else if spent > 0.0 {
            // Zero budget with any spending is instantly exhausted.
            1.0
        } else {
            0.0
        };

        Some(BudgetProgress {
            category_id: category.id.clone(),
            budget,
            spent,
            remaining: (budget - spent).max(0.0),
            ratio,
            over_budget: spent > budget,
        })
    }

    /// Dashboard quick stats: overall and monthly totals, month-over-month
    /// change, counts, and the date span of recorded expenses.
    pub fn spending_summary(&self, expenses: &[Expense], today: NaiveDate) -> SpendingSummary {
        let comparison = self.month_over_month(expenses, today);

        let mut referenced: Vec<&str> = expenses
            .iter()
            .filter_map(|e| e.category_id.as_deref())
            .collect();
        referenced.sort_unstable();
        referenced.dedup();

        SpendingSummary {
            total_spent: self.total_spending(expenses),
            current_month: comparison.current_total,
            previous_month: comparison.previous_total,
            month_over_month_pct: comparison.change_pct,
            expense_count: expenses.len(),
            category_count: referenced.len(),
            first_expense: expenses.iter().map(|e| e.date).min(),
            last_expense: expenses.iter().map(|e| e.date).max(),
        }
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}

fn month_total(expenses: &[Expense], month: u32, year: i32) -> f64 {
    expenses
        .iter()
        .filter(|e| e.date.month() == month && e.date.year() == year)
        .map(|e| e.amount)
        .sum()
}

/// previous = 0 and current > 0 is +100%, previous = current = 0 is 0% —
/// the delta is always finite.
fn change_pct(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        if current > 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        ((current - previous) / previous) * 100.0
    }
}
