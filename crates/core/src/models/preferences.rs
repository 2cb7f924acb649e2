use serde::{Deserialize, Serialize};

/// Display theme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
            Theme::System => write!(f, "system"),
        }
    }
}

/// Global per-user display preferences, stored under their own key.
///
/// Preference writes do not go through the expense/category change
/// notification channel — consumers read them directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    /// Display currency (ISO 4217 code)
    pub currency: String,

    /// Date format token, e.g., "dd.MM.yyyy"
    pub date_format: String,

    /// Number format locale token, e.g., "en-US"
    pub number_format: String,

    /// Display theme
    pub theme: Theme,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            date_format: "dd.MM.yyyy".to_string(),
            number_format: "en-US".to_string(),
            theme: Theme::System,
        }
    }
}
