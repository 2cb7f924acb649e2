use chrono::NaiveDateTime;

use crate::format::{format_amount, long_date};
use crate::models::category::Category;
use crate::models::expense::{Expense, ExpenseChange, ExpenseUpdate};
use crate::models::preferences::UserPreferences;
use crate::services::analytics_service::UNCATEGORIZED_LABEL;

/// Placeholder rendering for empty notes in history records.
pub const NO_NOTES: &str = "No notes";

/// Derives the audit-trail records an edit should append.
///
/// Values are rendered for humans at diff time (currency strings,
/// category names, long-form dates) so the history stays readable even
/// after the referenced category is deleted or preferences change.
pub struct HistoryService;

impl HistoryService {
    pub fn new() -> Self {
        Self
    }

    /// Compare `original` against the proposed `update` and emit one
    /// record per changed field, in fixed field-check order:
    /// amount, description, categoryId, date, notes.
    ///
    /// Unchanged fields emit nothing; a no-op edit yields an empty list.
    /// Every record from one edit carries the same `timestamp`.
    pub fn diff_expense(
        &self,
        original: &Expense,
        update: &ExpenseUpdate,
        categories: &[Category],
        preferences: &UserPreferences,
        timestamp: NaiveDateTime,
    ) -> Vec<ExpenseChange> {
        let mut changes = Vec::new();
        let mut push = |field: &str, old_value: String, new_value: String| {
            changes.push(ExpenseChange {
                timestamp,
                field: field.to_string(),
                old_value,
                new_value,
            });
        };

        if update.amount != original.amount {
            push(
                "amount",
                format_amount(original.amount, preferences),
                format_amount(update.amount, preferences),
            );
        }

        if update.description != original.description {
            push(
                "description",
                original.description.clone(),
                update.description.clone(),
            );
        }

        if update.category_id != original.category_id {
            push(
                "categoryId",
                category_name(original.category_id.as_deref(), categories),
                category_name(update.category_id.as_deref(), categories),
            );
        }

        if update.date != original.date {
            push("date", long_date(original.date), long_date(update.date));
        }

        if notes_text(&update.notes) != notes_text(&original.notes) {
            push(
                "notes",
                rendered_notes(&original.notes),
                rendered_notes(&update.notes),
            );
        }

        changes
    }
}

impl Default for HistoryService {
    fn default() -> Self {
        Self::new()
    }
}

fn category_name(category_id: Option<&str>, categories: &[Category]) -> String {
    category_id
        .and_then(|id| categories.iter().find(|c| c.id == id))
        .map(|c| c.name.clone())
        .unwrap_or_else(|| UNCATEGORIZED_LABEL.to_string())
}

/// Empty and absent notes compare equal.
fn notes_text(notes: &Option<String>) -> &str {
    notes.as_deref().unwrap_or("")
}

fn rendered_notes(notes: &Option<String>) -> String {
    match notes.as_deref() {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => NO_NOTES.to_string(),
    }
}
