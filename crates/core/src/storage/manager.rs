use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::CoreError;
use crate::models::category::Category;
use crate::models::expense::Expense;
use crate::models::preferences::UserPreferences;

/// Storage key for the expense collection.
pub const EXPENSES_KEY: &str = "expenses";
/// Storage key for the category collection.
pub const CATEGORIES_KEY: &str = "categories";
/// Storage key for user preferences.
pub const PREFERENCES_KEY: &str = "preferences";

/// Durable local storage: three named keys, each an indented JSON
/// document in its own file under a root directory.
///
/// A key that was never written reads back as the empty/default value —
/// "not yet stored" and "empty" are indistinguishable on read. Corrupt
/// or schema-mismatched data surfaces as `CoreError::Deserialization`,
/// never a panic.
pub struct StorageManager {
    root: PathBuf,
}

impl StorageManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn load_expenses(&self) -> Result<Vec<Expense>, CoreError> {
        self.load_or(EXPENSES_KEY, Vec::new)
    }

    pub fn load_categories(&self) -> Result<Vec<Category>, CoreError> {
        self.load_or(CATEGORIES_KEY, Vec::new)
    }

    pub fn load_preferences(&self) -> Result<UserPreferences, CoreError> {
        self.load_or(PREFERENCES_KEY, UserPreferences::default)
    }

    pub fn save_expenses(&self, expenses: &[Expense]) -> Result<(), CoreError> {
        self.save(EXPENSES_KEY, &expenses)
    }

    pub fn save_categories(&self, categories: &[Category]) -> Result<(), CoreError> {
        self.save(CATEGORIES_KEY, &categories)
    }

    pub fn save_preferences(&self, preferences: &UserPreferences) -> Result<(), CoreError> {
        self.save(PREFERENCES_KEY, preferences)
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    fn load_or<T, F>(&self, key: &str, default: F) -> Result<T, CoreError>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(default());
        }
        let raw = std::fs::read_to_string(&path)?;
        serde_json::from_str(&raw)
            .map_err(|e| CoreError::Deserialization(format!("Corrupt '{key}' data: {e}")))
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CoreError> {
        std::fs::create_dir_all(&self.root)?;
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize '{key}': {e}")))?;
        std::fs::write(self.key_path(key), json)?;
        Ok(())
    }
}
