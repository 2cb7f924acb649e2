use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One group in the category breakdown: a category (or the
/// "Uncategorized" fallback) with its summed amount and display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySlice {
    /// The grouped category id; `None` for expenses with no category
    pub category_id: Option<String>,

    /// Resolved category name, or "Uncategorized"
    pub name: String,

    /// Resolved category color, or the neutral fallback
    pub color: String,

    /// Summed expense amount for this group
    pub amount: f64,

    /// Share of the grand total, rounded to one decimal place.
    /// A zero-total set yields 0.0 for every slice.
    pub percentage: f64,
}

/// Current calendar month vs the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthComparison {
    /// Total for the current calendar month
    pub current_total: f64,

    /// Total for the previous calendar month (with year rollover at January)
    pub previous_total: f64,

    /// Percent change. previous = 0 and current > 0 is defined as +100,
    /// previous = current = 0 as 0 — never infinite or NaN.
    pub change_pct: f64,
}

/// Budget standing for a single category with a budget set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetProgress {
    /// The category this progress belongs to
    pub category_id: String,

    /// The configured budget ceiling
    pub budget: f64,

    /// Sum of this category's expenses
    pub spent: f64,

    /// max(budget - spent, 0) — floors at zero when over budget
    pub remaining: f64,

    /// min(spent / budget, 1.0) — clamped for display, never above 100%
    pub ratio: f64,

    /// spent > budget
    pub over_budget: bool,
}

/// Dashboard quick stats computed from the full expense list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingSummary {
    /// Nominal sum over all expenses
    pub total_spent: f64,

    /// Total for the current calendar month
    pub current_month: f64,

    /// Total for the previous calendar month
    pub previous_month: f64,

    /// Month-over-month percent change (same rules as `MonthComparison`)
    pub month_over_month_pct: f64,

    /// Number of recorded expenses
    pub expense_count: usize,

    /// Number of distinct categories referenced by at least one expense
    pub category_count: usize,

    /// Date of the earliest expense, if any
    pub first_expense: Option<NaiveDate>,

    /// Date of the most recent expense, if any
    pub last_expense: Option<NaiveDate>,
}
