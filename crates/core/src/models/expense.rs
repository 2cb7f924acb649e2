use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

/// A single recorded expense.
///
/// Identity (`id`) is immutable. Every other field can change via edit;
/// each edit appends rendered diff records to `history`.
///
/// The serialized shape matches the export format: camelCase keys,
/// optional fields omitted-tolerant on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Unique identifier, opaque to the engine
    pub id: String,

    /// Amount spent (always positive, nominal in the display currency)
    pub amount: f64,

    /// ISO 4217 currency code (e.g., "USD")
    pub currency: String,

    /// Referenced category, if any. A dangling or absent reference
    /// renders as "Uncategorized" — it is never an error.
    #[serde(default)]
    pub category_id: Option<String>,

    /// Calendar date of the expense (no time component — daily granularity)
    pub date: NaiveDate,

    /// Free-text description (non-empty)
    pub description: String,

    /// Optional free-text notes
    #[serde(default)]
    pub notes: Option<String>,

    /// When this expense was first recorded
    pub created_at: NaiveDateTime,

    /// When this expense was last edited (>= created_at)
    pub updated_at: NaiveDateTime,

    /// Append-only audit trail, oldest first
    #[serde(default)]
    pub history: Vec<ExpenseChange>,
}

impl Expense {
    pub fn new(
        amount: f64,
        currency: impl Into<String>,
        category_id: Option<String>,
        date: NaiveDate,
        description: impl Into<String>,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            amount,
            currency: currency.into(),
            category_id,
            date,
            description: description.into(),
            notes: None,
            created_at: now,
            updated_at: now,
            history: Vec::new(),
        }
    }

    /// Create an expense with notes attached.
    pub fn with_notes(
        amount: f64,
        currency: impl Into<String>,
        category_id: Option<String>,
        date: NaiveDate,
        description: impl Into<String>,
        notes: impl Into<String>,
        now: NaiveDateTime,
    ) -> Self {
        let mut expense = Self::new(amount, currency, category_id, date, description, now);
        expense.notes = Some(notes.into());
        expense
    }

    /// Validate the well-formedness rules enforced at the store boundary:
    /// positive amount, non-empty trimmed description, 3-letter currency code.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.amount > 0.0) || !self.amount.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "Expense amount must be a positive number, got {}",
                self.amount
            )));
        }
        if self.description.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Expense description must not be empty".to_string(),
            ));
        }
        validate_currency_code(&self.currency)?;
        if self.updated_at < self.created_at {
            return Err(CoreError::ValidationError(format!(
                "Expense updatedAt ({}) precedes createdAt ({})",
                self.updated_at, self.created_at
            )));
        }
        Ok(())
    }
}

/// The editable subset of an expense, as submitted by the edit form.
/// Currency changes are applied but not recorded in the change history.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseUpdate {
    pub amount: f64,
    pub currency: String,
    pub category_id: Option<String>,
    pub date: NaiveDate,
    pub description: String,
    pub notes: Option<String>,
}

impl ExpenseUpdate {
    /// Start from an existing expense, ready for selective field changes.
    pub fn from_expense(expense: &Expense) -> Self {
        Self {
            amount: expense.amount,
            currency: expense.currency.clone(),
            category_id: expense.category_id.clone(),
            date: expense.date,
            description: expense.description.clone(),
            notes: expense.notes.clone(),
        }
    }
}

/// One field-level edit record in an expense's audit trail.
///
/// Values are stored pre-rendered (currency strings, category names,
/// long-form dates) so history stays readable even after the referenced
/// category is deleted or preferences change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseChange {
    /// Moment of the edit; all changes from one edit share it
    pub timestamp: NaiveDateTime,

    /// Which field changed ("amount", "description", "categoryId", "date", "notes")
    pub field: String,

    /// Rendered previous value
    pub old_value: String,

    /// Rendered new value
    pub new_value: String,
}

/// Currency codes are 3 ASCII letters, stored uppercase.
pub fn validate_currency_code(code: &str) -> Result<(), CoreError> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(CoreError::ValidationError(format!(
            "Invalid currency code '{code}': must be exactly 3 uppercase ASCII letters (e.g., USD, EUR)"
        )));
    }
    Ok(())
}
