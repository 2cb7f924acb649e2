use crate::format::{format_amount, format_date};
use crate::models::expense::Expense;
use crate::models::preferences::UserPreferences;

/// Local query answering behind the "Ask" box.
///
/// Not NLP — fixed substring checks over the lowercased query, answered
/// from the in-memory expense list. Everything runs locally; no data
/// leaves the process.
pub struct AssistantService;

impl AssistantService {
    pub fn new() -> Self {
        Self
    }

    /// Answer a free-text question about the recorded expenses.
    /// Unrecognized questions get a hint listing what can be asked.
    pub fn answer(
        &self,
        query: &str,
        expenses: &[Expense],
        preferences: &UserPreferences,
    ) -> String {
        let query = query.to_lowercase();

        if query.contains("total spent") {
            let total: f64 = expenses.iter().map(|e| e.amount).sum();
            format!(
                "The total amount spent is {}.",
                format_amount(total, preferences)
            )
        } else if query.contains("number of expenses") {
            format!("You have recorded {} expenses.", expenses.len())
        } else if query.contains("date range") {
            let start = expenses.iter().map(|e| e.date).min();
            let end = expenses.iter().map(|e| e.date).max();
            match (start, end) {
                (Some(start), Some(end)) => format!(
                    "Your expenses span from {} to {}.",
                    format_date(start, preferences),
                    format_date(end, preferences)
                ),
                _ => "No expenses have been recorded yet.".to_string(),
            }
        } else {
            "I can help you analyze your expenses. Try asking about total spent, \
             number of expenses, or date range."
                .to_string()
        }
    }
}

impl Default for AssistantService {
    fn default() -> Self {
        Self::new()
    }
}
