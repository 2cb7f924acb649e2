//! The authoritative in-process state: expense, category, and preference
//! collections, with durable persistence and change notification.
//!
//! Single-threaded, event-driven: every operation runs synchronously to
//! completion, subscribers are dispatched inline, and a `replace`
//! followed by a read on the same thread always observes the new value.

use crate::errors::CoreError;
use crate::models::category::Category;
use crate::models::expense::Expense;
use crate::models::preferences::UserPreferences;
use crate::storage::manager::StorageManager;

/// Which collection a store notification refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataChange {
    Expenses,
    Categories,
}

/// How a write landed. Cache-only writes hit durable local storage but
/// made no remote round-trip; synced writes were confirmed remotely
/// before being applied locally. Callers must not treat the two alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    CacheOnly,
    Synced,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Captures the store revision at the moment a remote request started.
/// Applying the response later succeeds only if the store has not moved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

type Subscriber = Box<dyn Fn(DataChange)>;

/// Holds the current collections, mediates all reads and writes, and
/// notifies subscribers on expense/category mutation.
///
/// Constructed once per session and passed to consumers explicitly —
/// there is no ambient global instance.
pub struct ExpenseStore {
    expenses: Vec<Expense>,
    categories: Vec<Category>,
    preferences: UserPreferences,
    storage: StorageManager,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
    revision: u64,
}

impl std::fmt::Debug for ExpenseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpenseStore")
            .field("expenses", &self.expenses.len())
            .field("categories", &self.categories.len())
            .field("preferences", &self.preferences)
            .field("subscribers", &self.subscribers.len())
            .field("revision", &self.revision)
            .finish()
    }
}

impl ExpenseStore {
    /// Open the store over a storage root, loading whatever is persisted.
    /// Keys that were never written load as empty/default collections.
    pub fn open(storage: StorageManager) -> Result<Self, CoreError> {
        let expenses = storage.load_expenses()?;
        let categories = storage.load_categories()?;
        let preferences = storage.load_preferences()?;
        Ok(Self {
            expenses,
            categories,
            preferences,
            storage,
            subscribers: Vec::new(),
            next_subscription: 0,
            revision: 0,
        })
    }

    // ── Snapshot Reads ──────────────────────────────────────────────

    /// Current expense snapshot. Never blocks; empty before first load.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Current category snapshot.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Current preferences. Read directly — preference changes are not
    /// broadcast on the expense/category channel.
    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    // ── Writes ──────────────────────────────────────────────────────

    /// Atomically swap the full expense collection: persist to durable
    /// storage, then emit a single change notification. Local cache
    /// write only — remote mirroring is signaled separately.
    pub fn replace_expenses(
        &mut self,
        expenses: Vec<Expense>,
    ) -> Result<WriteOutcome, CoreError> {
        self.storage.save_expenses(&expenses)?;
        self.expenses = expenses;
        self.revision += 1;
        self.notify(DataChange::Expenses);
        Ok(WriteOutcome::CacheOnly)
    }

    /// Atomically swap the full category collection.
    pub fn replace_categories(
        &mut self,
        categories: Vec<Category>,
    ) -> Result<WriteOutcome, CoreError> {
        self.storage.save_categories(&categories)?;
        self.categories = categories;
        self.revision += 1;
        self.notify(DataChange::Categories);
        Ok(WriteOutcome::CacheOnly)
    }

    /// Persist new preferences. Deliberately no notification: preference
    /// consumers read on demand instead of subscribing.
    pub fn set_preferences(&mut self, preferences: UserPreferences) -> Result<(), CoreError> {
        self.storage.save_preferences(&preferences)?;
        self.preferences = preferences;
        Ok(())
    }

    // ── Change Notification ─────────────────────────────────────────

    /// Register a callback for expense/category changes. Dispatch is
    /// synchronous, in subscription order.
    pub fn subscribe(&mut self, callback: impl Fn(DataChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription. Returns `false` if the id is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    fn notify(&self, change: DataChange) {
        for (_, subscriber) in &self.subscribers {
            subscriber(change);
        }
    }

    // ── Stale-Response Guard ────────────────────────────────────────

    /// Monotonic revision, bumped on every expense/category write.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Take a ticket before starting a remote request. The response can
    /// only be applied while the store is still at this revision.
    pub fn ticket(&self) -> RequestTicket {
        RequestTicket(self.revision)
    }

    /// Apply a remote expense snapshot, unless the store advanced past
    /// `ticket` in the meantime (abandoned or slow responses must not
    /// clobber newer local state).
    pub fn apply_remote_expenses(
        &mut self,
        ticket: RequestTicket,
        expenses: Vec<Expense>,
    ) -> Result<WriteOutcome, CoreError> {
        if ticket.0 != self.revision {
            return Err(CoreError::StaleResponse);
        }
        self.storage.save_expenses(&expenses)?;
        self.expenses = expenses;
        self.revision += 1;
        self.notify(DataChange::Expenses);
        Ok(WriteOutcome::Synced)
    }

    /// Apply a full remote snapshot (expenses and categories fetched
    /// under one ticket). Checks the ticket once, persists both
    /// collections, and notifies each channel once.
    pub fn apply_remote_snapshot(
        &mut self,
        ticket: RequestTicket,
        expenses: Vec<Expense>,
        categories: Vec<Category>,
    ) -> Result<WriteOutcome, CoreError> {
        if ticket.0 != self.revision {
            return Err(CoreError::StaleResponse);
        }
        self.storage.save_expenses(&expenses)?;
        self.storage.save_categories(&categories)?;
        self.expenses = expenses;
        self.categories = categories;
        self.revision += 1;
        self.notify(DataChange::Expenses);
        self.notify(DataChange::Categories);
        Ok(WriteOutcome::Synced)
    }

    /// Apply a remote category snapshot under the same ticket rule.
    pub fn apply_remote_categories(
        &mut self,
        ticket: RequestTicket,
        categories: Vec<Category>,
    ) -> Result<WriteOutcome, CoreError> {
        if ticket.0 != self.revision {
            return Err(CoreError::StaleResponse);
        }
        self.storage.save_categories(&categories)?;
        self.categories = categories;
        self.revision += 1;
        self.notify(DataChange::Categories);
        Ok(WriteOutcome::Synced)
    }
}
