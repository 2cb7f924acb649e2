use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::CoreError;
use crate::models::category::Category;
use crate::models::expense::Expense;
use crate::models::preferences::UserPreferences;

/// Payload for creating an expense remotely. The remote side assigns
/// the id and timestamps and returns the full record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub amount: f64,
    pub currency: String,
    pub category_id: Option<String>,
    pub date: NaiveDate,
    pub description: String,
    pub notes: Option<String>,
}

/// Payload for creating a category remotely.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    pub color: String,
    pub budget: Option<f64>,
    pub archived: bool,
}

/// Trait abstraction for the remote expense store.
///
/// The engine and the local store work identically whether or not an
/// adapter is present; callers treat each call as fire-once — no
/// automatic retry, no request deduplication. An abandoned call must
/// never mutate store state after the fact (see `RequestTicket`).
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait SyncAdapter: Send + Sync {
    /// Human-readable name of this adapter (for error messages).
    fn name(&self) -> &str;

    /// List all expenses for a user, newest first.
    async fn list_expenses(&self, user_id: &str) -> Result<Vec<Expense>, CoreError>;

    /// List all categories for a user.
    async fn list_categories(&self, user_id: &str) -> Result<Vec<Category>, CoreError>;

    /// Fetch a user's preferences; `None` when none are stored remotely.
    async fn fetch_preferences(
        &self,
        user_id: &str,
    ) -> Result<Option<UserPreferences>, CoreError>;

    /// Create an expense remotely and return the stored record.
    async fn create_expense(
        &self,
        user_id: &str,
        expense: &NewExpense,
    ) -> Result<Expense, CoreError>;

    /// Create a category remotely and return the stored record.
    async fn create_category(
        &self,
        user_id: &str,
        category: &NewCategory,
    ) -> Result<Category, CoreError>;

    /// Set or clear a category's budget remotely; returns the updated record.
    async fn update_category_budget(
        &self,
        user_id: &str,
        category_id: &str,
        budget: Option<f64>,
    ) -> Result<Category, CoreError>;
}
