// ═══════════════════════════════════════════════════════════════════
// Integration Tests — full flows through the ExpenseTracker facade
// ═══════════════════════════════════════════════════════════════════

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use expense_tracker_core::errors::CoreError;
use expense_tracker_core::models::chart::Period;
use expense_tracker_core::models::expense::ExpenseUpdate;
use expense_tracker_core::models::preferences::UserPreferences;
use expense_tracker_core::services::analytics_service::UNCATEGORIZED_LABEL;
use expense_tracker_core::storage::manager::StorageManager;
use expense_tracker_core::store::ExpenseStore;
use expense_tracker_core::ExpenseTracker;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn ts(y: i32, m: u32, day: u32) -> NaiveDateTime {
    d(y, m, day).and_hms_opt(12, 0, 0).unwrap()
}

fn tracker(dir: &TempDir) -> ExpenseTracker {
    ExpenseTracker::new(ExpenseStore::open(StorageManager::new(dir.path())).unwrap())
}

// ═══════════════════════════════════════════════════════════════════
//  Expense lifecycle
// ═══════════════════════════════════════════════════════════════════

mod expense_lifecycle {
    use super::*;

    #[test]
    fn add_edit_delete_with_audit_trail() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker(&dir);

        let id = t
            .add_expense(10.0, None, d(2026, 3, 1), "Lunch", None, ts(2026, 3, 1))
            .unwrap();
        assert_eq!(t.expense_count(), 1);
        assert_eq!(t.get_expense(&id).unwrap().currency, "USD");

        let mut update = ExpenseUpdate::from_expense(t.get_expense(&id).unwrap());
        update.amount = 12.5;
        t.update_expense(&id, update, ts(2026, 3, 2)).unwrap();

        let edited = t.get_expense(&id).unwrap();
        assert_eq!(edited.amount, 12.5);
        assert_eq!(edited.history.len(), 1);
        assert_eq!(edited.history[0].field, "amount");
        assert_eq!(edited.history[0].old_value, "10.00");
        assert_eq!(edited.history[0].new_value, "12.50");
        assert_eq!(edited.updated_at, ts(2026, 3, 2));
        assert_eq!(edited.created_at, ts(2026, 3, 1));

        t.remove_expense(&id).unwrap();
        assert_eq!(t.expense_count(), 0);
        assert!(matches!(
            t.remove_expense(&id),
            Err(CoreError::ExpenseNotFound(_))
        ));
    }

    #[test]
    fn add_uses_the_display_currency_of_the_moment() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker(&dir);
        t.set_preferences(UserPreferences {
            currency: "eur ".into(), // normalized on set
            ..UserPreferences::default()
        })
        .unwrap();

        let id = t
            .add_expense(8.0, None, d(2026, 3, 1), "Coffee", None, ts(2026, 3, 1))
            .unwrap();
        assert_eq!(t.get_expense(&id).unwrap().currency, "EUR");
    }

    #[test]
    fn invalid_add_leaves_the_store_unchanged() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker(&dir);
        let result = t.add_expense(-5.0, None, d(2026, 3, 1), "Bad", None, ts(2026, 3, 1));
        assert!(matches!(result, Err(CoreError::ValidationError(_))));
        assert_eq!(t.expense_count(), 0);
    }

    #[test]
    fn successive_edits_accumulate_history() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker(&dir);
        let id = t
            .add_expense(10.0, None, d(2026, 3, 1), "Lunch", None, ts(2026, 3, 1))
            .unwrap();

        let mut update = ExpenseUpdate::from_expense(t.get_expense(&id).unwrap());
        update.amount = 12.0;
        t.update_expense(&id, update, ts(2026, 3, 2)).unwrap();

        let mut update = ExpenseUpdate::from_expense(t.get_expense(&id).unwrap());
        update.description = "Team lunch".into();
        t.update_expense(&id, update, ts(2026, 3, 3)).unwrap();

        let history = &t.get_expense(&id).unwrap().history;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].field, "amount");
        assert_eq!(history[1].field, "description");
        assert!(history[0].timestamp < history[1].timestamp);
    }

    #[test]
    fn search_matches_descriptions_and_notes() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker(&dir);
        t.add_expense(1.0, None, d(2026, 3, 1), "Groceries", None, ts(2026, 3, 1))
            .unwrap();
        t.add_expense(
            2.0,
            None,
            d(2026, 3, 2),
            "Taxi",
            Some("airport run".into()),
            ts(2026, 3, 2),
        )
        .unwrap();

        assert_eq!(t.search_expenses("GROC").len(), 1);
        assert_eq!(t.search_expenses("airport").len(), 1);
        assert!(t.search_expenses("hotel").is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Categories and derived views
// ═══════════════════════════════════════════════════════════════════

mod categories_and_views {
    use super::*;

    #[test]
    fn deleting_a_category_leaves_expenses_uncategorized() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker(&dir);
        let cat = t.add_category("Food", "#f00", None).unwrap();
        t.add_expense(10.0, Some(cat.clone()), d(2026, 3, 1), "Lunch", None, ts(2026, 3, 1))
            .unwrap();

        t.remove_category(&cat).unwrap();

        // The expense keeps its reference.
        assert_eq!(t.expenses()[0].category_id.as_deref(), Some(cat.as_str()));
        assert_eq!(t.expenses_for_category(&cat).len(), 1);
        // But derived views resolve it to the fallback.
        let breakdown = t.category_breakdown();
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].name, UNCATEGORIZED_LABEL);
    }

    #[test]
    fn archived_categories_stay_valid_for_history() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker(&dir);
        let cat = t.add_category("Food", "#f00", Some(100.0)).unwrap();
        t.add_expense(10.0, Some(cat.clone()), d(2026, 3, 1), "Lunch", None, ts(2026, 3, 1))
            .unwrap();

        t.archive_category(&cat).unwrap();

        assert!(t.active_categories().is_empty());
        assert_eq!(t.categories().len(), 1);
        assert_eq!(t.category_breakdown()[0].name, "Food");
        // Archived categories drop out of the budget overview.
        assert!(t.budget_overview().is_empty());
    }

    #[test]
    fn budget_progress_for_unknown_category_errors() {
        let dir = TempDir::new().unwrap();
        let t = tracker(&dir);
        assert!(matches!(
            t.budget_progress("ghost"),
            Err(CoreError::CategoryNotFound(_))
        ));
    }

    #[test]
    fn budget_overview_covers_budgeted_active_categories() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker(&dir);
        let food = t.add_category("Food", "#f00", Some(100.0)).unwrap();
        t.add_category("Misc", "#999", None).unwrap();
        t.add_expense(150.0, Some(food), d(2026, 3, 1), "Feast", None, ts(2026, 3, 1))
            .unwrap();

        let overview = t.budget_overview();
        assert_eq!(overview.len(), 1);
        assert!(overview[0].over_budget);
        assert_eq!(overview[0].remaining, 0.0);
        assert_eq!(overview[0].ratio, 1.0);
    }

    #[test]
    fn chart_and_totals_reflect_the_store() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker(&dir);
        let today = d(2026, 3, 15);
        t.add_expense(5.0, None, today, "Today", None, ts(2026, 3, 15))
            .unwrap();
        t.add_expense(7.0, None, d(2026, 3, 1), "Earlier", None, ts(2026, 3, 1))
            .unwrap();

        assert_eq!(t.total_spending(), 12.0);

        let week = t.chart_data(Period::Week, today);
        assert_eq!(week.len(), 7);
        assert_eq!(week[6].amount, 5.0);

        let month = t.chart_data(Period::Month, today);
        assert_eq!(month.iter().map(|p| p.amount).sum::<f64>(), 12.0);

        let comparison = t.month_over_month(today);
        assert_eq!(comparison.current_total, 12.0);

        let summary = t.spending_summary(today);
        assert_eq!(summary.expense_count, 2);
        assert_eq!(summary.first_expense, Some(d(2026, 3, 1)));
    }

    #[test]
    fn ask_answers_from_current_state() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker(&dir);
        t.add_expense(25.0, None, d(2026, 3, 1), "Lunch", None, ts(2026, 3, 1))
            .unwrap();
        assert_eq!(t.ask("how much total spent?"), "The total amount spent is 25.00.");
        assert_eq!(t.ask("number of expenses"), "You have recorded 1 expenses.");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Export / Import
// ═══════════════════════════════════════════════════════════════════

mod export_import {
    use super::*;

    #[test]
    fn json_roundtrip_reproduces_the_collection() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker(&dir);
        let cat = t.add_category("Food", "#f00", None).unwrap();
        let id = t
            .add_expense(
                10.0,
                Some(cat),
                d(2026, 3, 1),
                "Lunch",
                Some("with client".into()),
                ts(2026, 3, 1),
            )
            .unwrap();
        // Generate a history record so it travels through export too.
        let mut update = ExpenseUpdate::from_expense(t.get_expense(&id).unwrap());
        update.amount = 12.5;
        t.update_expense(&id, update, ts(2026, 3, 2)).unwrap();

        let exported = t.export_expenses_to_json().unwrap();
        let before = t.expenses().to_vec();

        // Import into a fresh tracker.
        let dir2 = TempDir::new().unwrap();
        let mut t2 = tracker(&dir2);
        let count = t2.import_expenses_from_json(&exported).unwrap();

        assert_eq!(count, 1);
        assert_eq!(t2.expenses(), &before[..]);
        assert_eq!(t2.get_expense(&id).unwrap().history.len(), 1);
    }

    #[test]
    fn import_replaces_wholesale() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker(&dir);
        t.add_expense(1.0, None, d(2026, 3, 1), "Old", None, ts(2026, 3, 1))
            .unwrap();
        let exported = t.export_expenses_to_json().unwrap();
        t.add_expense(2.0, None, d(2026, 3, 2), "Newer", None, ts(2026, 3, 2))
            .unwrap();

        t.import_expenses_from_json(&exported).unwrap();
        assert_eq!(t.expense_count(), 1);
        assert_eq!(t.expenses()[0].description, "Old");
    }

    #[test]
    fn malformed_or_invalid_import_applies_nothing() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker(&dir);
        t.add_expense(1.0, None, d(2026, 3, 1), "Keep", None, ts(2026, 3, 1))
            .unwrap();

        assert!(t.import_expenses_from_json("not json").is_err());

        // Well-formed JSON, invalid record (negative amount).
        let invalid = r#"[{
            "id": "bad",
            "amount": -1.0,
            "currency": "USD",
            "date": "2026-03-01",
            "description": "Refund",
            "createdAt": "2026-03-01T12:00:00",
            "updatedAt": "2026-03-01T12:00:00"
        }]"#;
        assert!(matches!(
            t.import_expenses_from_json(invalid),
            Err(CoreError::ValidationError(_))
        ));

        assert_eq!(t.expense_count(), 1);
        assert_eq!(t.expenses()[0].description, "Keep");
    }

    #[test]
    fn csv_resolves_categories_and_escapes_fields() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker(&dir);
        let cat = t.add_category("Food", "#f00", None).unwrap();
        t.add_expense(
            12.5,
            Some(cat),
            d(2026, 3, 1),
            "Lunch, with \"friends\"",
            None,
            ts(2026, 3, 1),
        )
        .unwrap();
        t.add_expense(3.0, None, d(2026, 3, 2), "Bus", None, ts(2026, 3, 2))
            .unwrap();

        let csv = t.export_expenses_to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "id,date,description,category,amount,currency,notes");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("\"Lunch, with \"\"friends\"\"\""));
        assert!(lines[1].contains(",Food,12.50,USD,"));
        assert!(lines[2].contains(",Uncategorized,3.00,USD,"));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Persistence across sessions
// ═══════════════════════════════════════════════════════════════════

mod persistence {
    use super::*;

    #[test]
    fn a_reopened_tracker_sees_everything() {
        let dir = TempDir::new().unwrap();
        let id;
        {
            let mut t = tracker(&dir);
            let cat = t.add_category("Food", "#f00", Some(200.0)).unwrap();
            id = t
                .add_expense(10.0, Some(cat), d(2026, 3, 1), "Lunch", None, ts(2026, 3, 1))
                .unwrap();
            let mut update = ExpenseUpdate::from_expense(t.get_expense(&id).unwrap());
            update.amount = 11.0;
            t.update_expense(&id, update, ts(2026, 3, 2)).unwrap();
        }

        let t = tracker(&dir);
        assert_eq!(t.expense_count(), 1);
        let expense = t.get_expense(&id).unwrap();
        assert_eq!(expense.amount, 11.0);
        assert_eq!(expense.history.len(), 1);
        assert_eq!(t.categories()[0].budget, Some(200.0));
        assert_eq!(t.category_breakdown()[0].name, "Food");
    }
}
