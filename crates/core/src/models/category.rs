use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

/// An expense category with an optional per-category budget.
///
/// Deleting a category never cascades to its expenses — dangling
/// references resolve to "Uncategorized" at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier
    pub id: String,

    /// Display name (non-empty)
    pub name: String,

    /// Display color token, opaque to the engine (e.g., a CSS color)
    pub color: String,

    /// Monthly budget ceiling; absent = no limit
    #[serde(default)]
    pub budget: Option<f64>,

    /// Archived categories stay valid for historical lookups but are
    /// excluded from active selection.
    #[serde(default)]
    pub archived: bool,
}

impl Category {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            color: color.into(),
            budget: None,
            archived: false,
        }
    }

    /// Create a category with a budget ceiling set.
    pub fn with_budget(name: impl Into<String>, color: impl Into<String>, budget: f64) -> Self {
        let mut category = Self::new(name, color);
        category.budget = Some(budget);
        category
    }

    /// Non-empty name, non-negative budget.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Category name must not be empty".to_string(),
            ));
        }
        if let Some(budget) = self.budget {
            if !(budget >= 0.0) || !budget.is_finite() {
                return Err(CoreError::ValidationError(format!(
                    "Category budget must be non-negative, got {budget}"
                )));
            }
        }
        Ok(())
    }
}
