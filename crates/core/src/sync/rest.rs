use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::category::Category;
use crate::models::expense::Expense;
use crate::models::preferences::{Theme, UserPreferences};

use super::traits::{NewCategory, NewExpense, SyncAdapter};

/// REST sync adapter over a row-oriented backend.
///
/// Rows arrive in snake_case wire shape and are mapped to the domain
/// types here; the rest of the codebase never sees wire rows. Each
/// request carries the user id in the path and the API key as a bearer
/// token. Failures come back typed: transport problems as
/// `CoreError::Network`, non-success statuses as `CoreError::Api`.
pub struct RestSyncAdapter {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestSyncAdapter {
    pub fn new(base_url: impl Into<String>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    /// Attach an API key, sent as a bearer token on every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, CoreError> {
        let mut request = self.client.get(self.url(endpoint));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::Api {
                endpoint: endpoint.to_string(),
                message: format!("HTTP {status}"),
            });
        }
        Ok(response.json::<T>().await?)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        body: &B,
    ) -> Result<T, CoreError> {
        let mut request = self.client.request(method, self.url(endpoint)).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::Api {
                endpoint: endpoint.to_string(),
                message: format!("HTTP {status}"),
            });
        }
        Ok(response.json::<T>().await?)
    }
}

// ── Wire row types ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct ExpenseRow {
    id: String,
    amount: f64,
    currency: String,
    category_id: Option<String>,
    date: NaiveDate,
    description: String,
    notes: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(Deserialize)]
struct CategoryRow {
    id: String,
    name: String,
    color: String,
    budget: Option<f64>,
    #[serde(default)]
    archived: bool,
}

#[derive(Deserialize)]
struct PreferencesRow {
    currency: String,
    date_format: String,
    number_format: String,
    theme: Theme,
}

#[derive(Serialize)]
struct NewExpenseBody<'a> {
    amount: f64,
    currency: &'a str,
    category_id: Option<&'a str>,
    date: NaiveDate,
    description: &'a str,
    notes: Option<&'a str>,
}

#[derive(Serialize)]
struct NewCategoryBody<'a> {
    name: &'a str,
    color: &'a str,
    budget: Option<f64>,
    archived: bool,
}

#[derive(Serialize)]
struct BudgetBody {
    budget: Option<f64>,
}

fn map_expense_row(row: ExpenseRow) -> Expense {
    Expense {
        id: row.id,
        amount: row.amount,
        currency: row.currency,
        category_id: row.category_id,
        date: row.date,
        description: row.description,
        notes: row.notes,
        created_at: row.created_at,
        updated_at: row.updated_at,
        // The remote store does not mirror the local audit trail.
        history: Vec::new(),
    }
}

fn map_category_row(row: CategoryRow) -> Category {
    Category {
        id: row.id,
        name: row.name,
        color: row.color,
        budget: row.budget,
        archived: row.archived,
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl SyncAdapter for RestSyncAdapter {
    fn name(&self) -> &str {
        "REST"
    }

    async fn list_expenses(&self, user_id: &str) -> Result<Vec<Expense>, CoreError> {
        let rows: Vec<ExpenseRow> = self
            .get_json(&format!("users/{user_id}/expenses"))
            .await?;
        Ok(rows.into_iter().map(map_expense_row).collect())
    }

    async fn list_categories(&self, user_id: &str) -> Result<Vec<Category>, CoreError> {
        let rows: Vec<CategoryRow> = self
            .get_json(&format!("users/{user_id}/categories"))
            .await?;
        Ok(rows.into_iter().map(map_category_row).collect())
    }

    async fn fetch_preferences(
        &self,
        user_id: &str,
    ) -> Result<Option<UserPreferences>, CoreError> {
        let endpoint = format!("users/{user_id}/preferences");
        match self.get_json::<PreferencesRow>(&endpoint).await {
            Ok(row) => Ok(Some(UserPreferences {
                currency: row.currency,
                date_format: row.date_format,
                number_format: row.number_format,
                theme: row.theme,
            })),
            // Nothing stored remotely yet is not an error.
            Err(CoreError::Api { message, .. }) if message == "HTTP 404 Not Found" => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create_expense(
        &self,
        user_id: &str,
        expense: &NewExpense,
    ) -> Result<Expense, CoreError> {
        let body = NewExpenseBody {
            amount: expense.amount,
            currency: &expense.currency,
            category_id: expense.category_id.as_deref(),
            date: expense.date,
            description: &expense.description,
            notes: expense.notes.as_deref(),
        };
        let row: ExpenseRow = self
            .send_json(
                reqwest::Method::POST,
                &format!("users/{user_id}/expenses"),
                &body,
            )
            .await?;
        Ok(map_expense_row(row))
    }

    async fn create_category(
        &self,
        user_id: &str,
        category: &NewCategory,
    ) -> Result<Category, CoreError> {
        let body = NewCategoryBody {
            name: &category.name,
            color: &category.color,
            budget: category.budget,
            archived: category.archived,
        };
        let row: CategoryRow = self
            .send_json(
                reqwest::Method::POST,
                &format!("users/{user_id}/categories"),
                &body,
            )
            .await?;
        Ok(map_category_row(row))
    }

    async fn update_category_budget(
        &self,
        user_id: &str,
        category_id: &str,
        budget: Option<f64>,
    ) -> Result<Category, CoreError> {
        let row: CategoryRow = self
            .send_json(
                reqwest::Method::PATCH,
                &format!("users/{user_id}/categories/{category_id}/budget"),
                &BudgetBody { budget },
            )
            .await?;
        Ok(map_category_row(row))
    }
}
