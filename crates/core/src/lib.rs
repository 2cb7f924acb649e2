pub mod errors;
pub mod format;
pub mod models;
pub mod services;
pub mod storage;
pub mod store;
pub mod sync;

use chrono::{NaiveDate, NaiveDateTime};

use errors::CoreError;
use models::analytics::{BudgetProgress, CategorySlice, MonthComparison, SpendingSummary};
use models::category::Category;
use models::chart::{ChartPoint, Period};
use models::expense::{validate_currency_code, Expense, ExpenseUpdate};
use models::preferences::UserPreferences;
use services::analytics_service::AnalyticsService;
use services::assistant_service::AssistantService;
use services::chart_service::ChartService;
use services::history_service::HistoryService;
use store::{ExpenseStore, WriteOutcome};
use sync::traits::{NewCategory, NewExpense, SyncAdapter};

/// Main entry point for the expense tracker core library.
///
/// Composes the state store with the derivation services. All writes go
/// through the store (persist, then notify); all derived views are pure
/// recomputations from the latest snapshot. An optional sync adapter
/// mirrors writes to a remote backend; without one, everything works
/// cache-only.
#[must_use]
pub struct ExpenseTracker {
    store: ExpenseStore,
    analytics_service: AnalyticsService,
    chart_service: ChartService,
    history_service: HistoryService,
    assistant_service: AssistantService,
    adapter: Option<Box<dyn SyncAdapter>>,
    user_id: Option<String>,
}

impl std::fmt::Debug for ExpenseTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpenseTracker")
            .field("store", &self.store)
            .field("adapter", &self.adapter.as_ref().map(|a| a.name()))
            .field("user_id", &self.user_id)
            .finish()
    }
}

impl ExpenseTracker {
    /// Cache-only tracker: durable local storage, no remote mirror.
    pub fn new(store: ExpenseStore) -> Self {
        Self {
            store,
            analytics_service: AnalyticsService::new(),
            chart_service: ChartService::new(),
            history_service: HistoryService::new(),
            assistant_service: AssistantService::new(),
            adapter: None,
            user_id: None,
        }
    }

    /// Remote-backed tracker: writes can be mirrored through `adapter`
    /// for the given user.
    pub fn with_adapter(
        store: ExpenseStore,
        adapter: Box<dyn SyncAdapter>,
        user_id: impl Into<String>,
    ) -> Self {
        let mut tracker = Self::new(store);
        tracker.adapter = Some(adapter);
        tracker.user_id = Some(user_id.into());
        tracker
    }

    /// The underlying store, e.g., for subscribing to change notifications.
    pub fn store(&self) -> &ExpenseStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ExpenseStore {
        &mut self.store
    }

    // ── Expense Management ──────────────────────────────────────────

    /// Record a new expense in the display currency. Validates before
    /// touching the store; assigns the id and both timestamps.
    /// Cache-only write; use `push_expense_remote` to mirror remotely.
    pub fn add_expense(
        &mut self,
        amount: f64,
        category_id: Option<String>,
        date: NaiveDate,
        description: impl Into<String>,
        notes: Option<String>,
        now: NaiveDateTime,
    ) -> Result<String, CoreError> {
        let currency = self.store.preferences().currency.clone();
        let mut expense = Expense::new(amount, currency, category_id, date, description, now);
        expense.notes = notes.filter(|n| !n.is_empty());
        expense.validate()?;

        let id = expense.id.clone();
        let mut expenses = self.store.expenses().to_vec();
        expenses.push(expense);
        self.store.replace_expenses(expenses)?;
        Ok(id)
    }

    /// Edit an existing expense. Appends one history record per changed
    /// field (fixed order: amount, description, categoryId, date, notes),
    /// all sharing `now` as their timestamp, and bumps `updated_at`.
    /// A no-op edit appends nothing but still counts as a write.
    pub fn update_expense(
        &mut self,
        expense_id: &str,
        update: ExpenseUpdate,
        now: NaiveDateTime,
    ) -> Result<(), CoreError> {
        let original = self
            .store
            .expenses()
            .iter()
            .find(|e| e.id == expense_id)
            .cloned()
            .ok_or_else(|| CoreError::ExpenseNotFound(expense_id.to_string()))?;

        let changes = self.history_service.diff_expense(
            &original,
            &update,
            self.store.categories(),
            self.store.preferences(),
            now,
        );

        let mut updated = original;
        updated.amount = update.amount;
        updated.currency = update.currency;
        updated.category_id = update.category_id;
        updated.date = update.date;
        updated.description = update.description;
        updated.notes = update.notes.filter(|n| !n.is_empty());
        updated.history.extend(changes);
        updated.updated_at = now;
        updated.validate()?;

        let expenses = self
            .store
            .expenses()
            .iter()
            .map(|e| {
                if e.id == expense_id {
                    updated.clone()
                } else {
                    e.clone()
                }
            })
            .collect();
        self.store.replace_expenses(expenses)?;
        Ok(())
    }

    /// Hard delete. No tombstone is kept.
    pub fn remove_expense(&mut self, expense_id: &str) -> Result<(), CoreError> {
        if !self.store.expenses().iter().any(|e| e.id == expense_id) {
            return Err(CoreError::ExpenseNotFound(expense_id.to_string()));
        }
        let expenses = self
            .store
            .expenses()
            .iter()
            .filter(|e| e.id != expense_id)
            .cloned()
            .collect();
        self.store.replace_expenses(expenses)?;
        Ok(())
    }

    /// Get a single expense by its id.
    #[must_use]
    pub fn get_expense(&self, expense_id: &str) -> Option<&Expense> {
        self.store.expenses().iter().find(|e| e.id == expense_id)
    }

    /// All expenses, in stored order.
    #[must_use]
    pub fn expenses(&self) -> &[Expense] {
        self.store.expenses()
    }

    /// Expenses referencing a category. Works for archived and deleted
    /// categories alike; the reference is matched as an opaque id.
    #[must_use]
    pub fn expenses_for_category(&self, category_id: &str) -> Vec<&Expense> {
        self.store
            .expenses()
            .iter()
            .filter(|e| e.category_id.as_deref() == Some(category_id))
            .collect()
    }

    /// Search descriptions and notes, case-insensitive.
    #[must_use]
    pub fn search_expenses(&self, query: &str) -> Vec<&Expense> {
        let q = query.to_lowercase();
        self.store
            .expenses()
            .iter()
            .filter(|e| {
                e.description.to_lowercase().contains(&q)
                    || e.notes.as_deref().unwrap_or("").to_lowercase().contains(&q)
            })
            .collect()
    }

    #[must_use]
    pub fn expense_count(&self) -> usize {
        self.store.expenses().len()
    }

    // ── Category Management ─────────────────────────────────────────

    /// Create a category, optionally with a budget ceiling.
    pub fn add_category(
        &mut self,
        name: impl Into<String>,
        color: impl Into<String>,
        budget: Option<f64>,
    ) -> Result<String, CoreError> {
        let mut category = Category::new(name, color);
        category.budget = budget;
        category.validate()?;

        let id = category.id.clone();
        let mut categories = self.store.categories().to_vec();
        categories.push(category);
        self.store.replace_categories(categories)?;
        Ok(id)
    }

    /// Set or clear a category's budget.
    pub fn set_category_budget(
        &mut self,
        category_id: &str,
        budget: Option<f64>,
    ) -> Result<(), CoreError> {
        if let Some(budget) = budget {
            if !(budget >= 0.0) || !budget.is_finite() {
                return Err(CoreError::ValidationError(format!(
                    "Category budget must be non-negative, got {budget}"
                )));
            }
        }
        self.modify_category(category_id, |c| c.budget = budget)
    }

    /// Soft-hide a category: it stays valid for historical expense
    /// lookups but disappears from active selection.
    pub fn archive_category(&mut self, category_id: &str) -> Result<(), CoreError> {
        self.modify_category(category_id, |c| c.archived = true)
    }

    /// Hard delete. Dependent expenses are NOT removed or reassigned;
    /// their dangling references resolve to "Uncategorized" at read time.
    pub fn remove_category(&mut self, category_id: &str) -> Result<(), CoreError> {
        if !self.store.categories().iter().any(|c| c.id == category_id) {
            return Err(CoreError::CategoryNotFound(category_id.to_string()));
        }
        let categories = self
            .store
            .categories()
            .iter()
            .filter(|c| c.id != category_id)
            .cloned()
            .collect();
        self.store.replace_categories(categories)?;
        Ok(())
    }

    #[must_use]
    pub fn get_category(&self, category_id: &str) -> Option<&Category> {
        self.store.categories().iter().find(|c| c.id == category_id)
    }

    /// All categories, archived included.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        self.store.categories()
    }

    /// Categories offered for selection: everything not archived.
    #[must_use]
    pub fn active_categories(&self) -> Vec<&Category> {
        self.store
            .categories()
            .iter()
            .filter(|c| !c.archived)
            .collect()
    }

    fn modify_category(
        &mut self,
        category_id: &str,
        apply: impl FnOnce(&mut Category),
    ) -> Result<(), CoreError> {
        let mut categories = self.store.categories().to_vec();
        let category = categories
            .iter_mut()
            .find(|c| c.id == category_id)
            .ok_or_else(|| CoreError::CategoryNotFound(category_id.to_string()))?;
        apply(category);
        category.validate()?;
        self.store.replace_categories(categories)?;
        Ok(())
    }

    // ── Preferences ─────────────────────────────────────────────────

    #[must_use]
    pub fn preferences(&self) -> &UserPreferences {
        self.store.preferences()
    }

    /// Persist new preferences. The currency code is normalized to
    /// uppercase and validated; no change notification is emitted.
    pub fn set_preferences(&mut self, mut preferences: UserPreferences) -> Result<(), CoreError> {
        preferences.currency = preferences.currency.trim().to_uppercase();
        validate_currency_code(&preferences.currency)?;
        self.store.set_preferences(preferences)
    }

    // ── Derived Views ───────────────────────────────────────────────

    /// Nominal sum over all expenses in the display currency.
    #[must_use]
    pub fn total_spending(&self) -> f64 {
        self.analytics_service.total_spending(self.store.expenses())
    }

    /// Fixed-length bucketed series for the spending chart.
    #[must_use]
    pub fn chart_data(&self, period: Period, today: NaiveDate) -> Vec<ChartPoint> {
        self.chart_service
            .chart_data(self.store.expenses(), period, today)
    }

    /// Per-category totals, sorted descending, with fallback metadata
    /// for unknown references.
    #[must_use]
    pub fn category_breakdown(&self) -> Vec<CategorySlice> {
        self.analytics_service
            .category_breakdown(self.store.expenses(), self.store.categories())
    }

    /// Current vs previous calendar month totals.
    #[must_use]
    pub fn month_over_month(&self, today: NaiveDate) -> MonthComparison {
        self.analytics_service
            .month_over_month(self.store.expenses(), today)
    }

    /// Budget standing for one category; `Ok(None)` when it has no budget.
    pub fn budget_progress(
        &self,
        category_id: &str,
    ) -> Result<Option<BudgetProgress>, CoreError> {
        let category = self
            .get_category(category_id)
            .ok_or_else(|| CoreError::CategoryNotFound(category_id.to_string()))?;
        Ok(self
            .analytics_service
            .budget_progress(category, self.store.expenses()))
    }

    /// Budget standings for every active category with a budget set.
    #[must_use]
    pub fn budget_overview(&self) -> Vec<BudgetProgress> {
        self.store
            .categories()
            .iter()
            .filter(|c| !c.archived)
            .filter_map(|c| {
                self.analytics_service
                    .budget_progress(c, self.store.expenses())
            })
            .collect()
    }

    /// Dashboard quick stats.
    #[must_use]
    pub fn spending_summary(&self, today: NaiveDate) -> SpendingSummary {
        self.analytics_service
            .spending_summary(self.store.expenses(), today)
    }

    /// Answer a free-text question about the recorded expenses (local
    /// pattern matching, no external calls).
    #[must_use]
    pub fn ask(&self, query: &str) -> String {
        self.assistant_service
            .answer(query, self.store.expenses(), self.store.preferences())
    }

    // ── Remote Sync ─────────────────────────────────────────────────

    /// Pull the remote state and adopt it wholesale. The snapshot only
    /// applies if no local write happened while the requests were in
    /// flight; otherwise the call fails with `StaleResponse` and local
    /// state is untouched.
    pub async fn sync_from_remote(&mut self) -> Result<WriteOutcome, CoreError> {
        let adapter = self.adapter.as_deref().ok_or(CoreError::NoAdapter)?;
        let user_id = self.user_id.as_deref().ok_or(CoreError::NoAdapter)?;

        let ticket = self.store.ticket();
        let expenses = adapter.list_expenses(user_id).await?;
        let categories = adapter.list_categories(user_id).await?;
        let preferences = adapter.fetch_preferences(user_id).await?;

        let outcome = self
            .store
            .apply_remote_snapshot(ticket, expenses, categories)?;
        if let Some(preferences) = preferences {
            self.store.set_preferences(preferences)?;
        }
        Ok(outcome)
    }

    /// Create an expense remotely, then adopt the stored record locally.
    /// On adapter failure nothing is applied anywhere; the caller decides
    /// whether to fall back to a cache-only `add_expense`.
    pub async fn push_expense_remote(
        &mut self,
        expense: NewExpense,
    ) -> Result<Expense, CoreError> {
        let adapter = self.adapter.as_deref().ok_or(CoreError::NoAdapter)?;
        let user_id = self.user_id.as_deref().ok_or(CoreError::NoAdapter)?;

        let created = adapter.create_expense(user_id, &expense).await?;
        created.validate()?;

        let mut expenses = self.store.expenses().to_vec();
        expenses.push(created.clone());
        self.store.replace_expenses(expenses)?;
        Ok(created)
    }

    /// Create a category remotely, then adopt the stored record locally.
    pub async fn push_category_remote(
        &mut self,
        category: NewCategory,
    ) -> Result<Category, CoreError> {
        let adapter = self.adapter.as_deref().ok_or(CoreError::NoAdapter)?;
        let user_id = self.user_id.as_deref().ok_or(CoreError::NoAdapter)?;

        let created = adapter.create_category(user_id, &category).await?;
        created.validate()?;

        let mut categories = self.store.categories().to_vec();
        categories.push(created.clone());
        self.store.replace_categories(categories)?;
        Ok(created)
    }

    /// Update a category budget remotely, then mirror the confirmed
    /// value locally.
    pub async fn push_category_budget_remote(
        &mut self,
        category_id: &str,
        budget: Option<f64>,
    ) -> Result<Category, CoreError> {
        let adapter = self.adapter.as_deref().ok_or(CoreError::NoAdapter)?;
        let user_id = self.user_id.as_deref().ok_or(CoreError::NoAdapter)?;

        let updated = adapter
            .update_category_budget(user_id, category_id, budget)
            .await?;
        updated.validate()?;

        let mut categories = self.store.categories().to_vec();
        match categories.iter_mut().find(|c| c.id == category_id) {
            Some(category) => *category = updated.clone(),
            None => categories.push(updated.clone()),
        }
        self.store.replace_categories(categories)?;
        Ok(updated)
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Export the full expense collection as indented JSON.
    pub fn export_expenses_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self.store.expenses())
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize expenses: {e}")))
    }

    /// Export expenses as CSV. Lossy by design (no history column);
    /// category ids are resolved to names where possible.
    /// Columns: id, date, description, category, amount, currency, notes
    #[must_use]
    pub fn export_expenses_to_csv(&self) -> String {
        let mut csv = String::from("id,date,description,category,amount,currency,notes\n");
        for expense in self.store.expenses() {
            let category = expense
                .category_id
                .as_deref()
                .and_then(|id| self.store.categories().iter().find(|c| c.id == id))
                .map(|c| c.name.as_str())
                .unwrap_or("Uncategorized");
            csv.push_str(&format!(
                "{},{},{},{},{:.2},{},{}\n",
                expense.id,
                expense.date,
                escape_csv(&expense.description),
                escape_csv(category),
                expense.amount,
                expense.currency,
                escape_csv(expense.notes.as_deref().unwrap_or("")),
            ));
        }
        csv
    }

    /// Import an expense collection from the JSON shape produced by
    /// export, replacing the current collection wholesale. Malformed
    /// input or any invalid record rejects the whole import; nothing
    /// is partially applied. Returns the number of expenses imported.
    pub fn import_expenses_from_json(&mut self, json: &str) -> Result<usize, CoreError> {
        let expenses: Vec<Expense> = serde_json::from_str(json)?;
        for expense in &expenses {
            expense.validate()?;
        }
        let count = expenses.len();
        self.store.replace_expenses(expenses)?;
        Ok(count)
    }
}

/// Quote fields containing commas, quotes, or newlines.
fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
