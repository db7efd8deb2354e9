#![allow(clippy::unwrap_used)]

use chrono::{Local, NaiveDate};
use rust_decimal_macros::dec;

use super::*;
use crate::config::{Config, Theme};
use crate::models::NewExpense;

fn setup() -> (tempfile::TempDir, App, Database) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::load(dir.path(), dir.path()).unwrap();
    let db = Database::open_in_memory().unwrap();
    let session = Session::sign_in("ada@example.com", &mut config, &db).unwrap();
    let mut app = App::new(config, session, Local::now().date_naive());
    let today = app.today;
    for (title, amount, category) in [
        ("Lunch", dec!(50), "Food & Dining"),
        ("Taxi", dec!(30), "Transportation"),
    ] {
        db.insert_expense(
            app.user_id(),
            &NewExpense {
                title: title.into(),
                amount,
                category: category.into(),
                date: today,
                is_recurring: false,
            },
        )
        .unwrap();
    }
    app.refresh(&db).unwrap();
    (dir, app, db)
}

#[test]
fn test_unknown_command_suggests_closest() {
    let (_dir, mut app, db) = setup();
    handle_command("buget 100", &mut app, &db).unwrap();
    assert_eq!(
        app.status_message,
        "Unknown command: :buget. Did you mean :budget?"
    );
}

#[test]
fn test_levenshtein() {
    assert_eq!(levenshtein("", "sort"), 4);
    assert_eq!(levenshtein("sort", "sort"), 0);
    assert_eq!(levenshtein("srot", "sort"), 2);
    assert_eq!(levenshtein("them", "theme"), 1);
}

#[test]
fn test_every_command_has_description() {
    assert!(COMMANDS.values().all(|c| !c.description.is_empty()));
    for name in ["budget", "from", "to", "category", "range", "sort", "export", "theme", "logout", "q"] {
        assert!(COMMANDS.contains_key(name), "missing :{name}");
    }
}

#[test]
fn test_quit_stops_app() {
    let (_dir, mut app, db) = setup();
    handle_command("q", &mut app, &db).unwrap();
    assert!(!app.running);
}

#[test]
fn test_budget_sets_and_reports() {
    let (_dir, mut app, db) = setup();
    handle_command("budget 100", &mut app, &db).unwrap();
    assert!(app.status_message.starts_with("Budget set: ₦100.00"));
    let progress = app.view.summary.budget.as_ref().unwrap();
    assert_eq!(progress.remaining, dec!(20));

    handle_command("budget", &mut app, &db).unwrap();
    assert!(app.status_message.contains("80% used"));
    assert!(app.status_message.contains("₦20.00 remaining"));
}

#[test]
fn test_budget_rejects_non_positive() {
    let (_dir, mut app, db) = setup();
    handle_command("budget -5", &mut app, &db).unwrap();
    assert_eq!(app.status_message, "Budget must be greater than 0");
    assert!(app.budget.is_none());
}

#[test]
fn test_from_and_to_switch_to_custom_range() {
    let (_dir, mut app, db) = setup();
    handle_command("from 2024-01-01", &mut app, &db).unwrap();
    handle_command("to 2024-01-31", &mut app, &db).unwrap();
    assert_eq!(
        app.filter.date_range,
        DateRange::Custom {
            start: NaiveDate::from_ymd_opt(2024, 1, 1),
            end: NaiveDate::from_ymd_opt(2024, 1, 31),
        }
    );
    assert!(app.view.expenses.is_empty());

    handle_command("to clear", &mut app, &db).unwrap();
    assert_eq!(app.status_message, "Range: 2024-01-01 to …");
    assert_eq!(app.view.expenses.len(), 2);
}

#[test]
fn test_from_rejects_bad_date() {
    let (_dir, mut app, db) = setup();
    handle_command("from 01/02/2024", &mut app, &db).unwrap();
    assert_eq!(app.status_message, "Invalid date: 01/02/2024. Use YYYY-MM-DD");
    assert_eq!(app.filter.date_range, DateRange::Month);
}

#[test]
fn test_category_filter() {
    let (_dir, mut app, db) = setup();
    handle_command("category transportation", &mut app, &db).unwrap();
    assert_eq!(app.status_message, "Category: Transportation");
    assert_eq!(app.view.summary.total, dec!(30));

    handle_command("category Groceries", &mut app, &db).unwrap();
    assert_eq!(app.status_message, "Category 'Groceries' not found");
    assert_eq!(app.view.summary.total, dec!(30));

    handle_command("category all", &mut app, &db).unwrap();
    assert_eq!(app.view.summary.total, dec!(80));
}

#[test]
fn test_range_and_sort() {
    let (_dir, mut app, db) = setup();
    handle_command("range week", &mut app, &db).unwrap();
    assert_eq!(app.filter.date_range, DateRange::Week);
    handle_command("range fortnight", &mut app, &db).unwrap();
    assert_eq!(app.status_message, "Usage: :range <all|week|month|custom>");

    handle_command("sort amount-asc", &mut app, &db).unwrap();
    assert_eq!(app.view.expenses[0].title, "Taxi");
    handle_command("sort sideways", &mut app, &db).unwrap();
    assert!(app.status_message.starts_with("Usage: :sort <date-desc|"));
}

#[test]
fn test_reset_restores_default_filters() {
    let (_dir, mut app, db) = setup();
    handle_command("sort oldest", &mut app, &db).unwrap();
    handle_command("range all", &mut app, &db).unwrap();
    handle_command("reset", &mut app, &db).unwrap();
    assert_eq!(app.filter, Default::default());
}

#[test]
fn test_export_writes_current_view() {
    let (dir, mut app, db) = setup();
    handle_command("category Food & Dining", &mut app, &db).unwrap();
    let path = dir.path().join("out.csv");
    handle_command(&format!("export {}", path.display()), &mut app, &db).unwrap();

    assert!(app.status_message.starts_with("Exported 1 expenses"));
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("Lunch"));
    assert!(!text.contains("Taxi"));
}

#[test]
fn test_theme_toggles_and_persists() {
    let (dir, mut app, db) = setup();
    handle_command("theme", &mut app, &db).unwrap();
    assert_eq!(app.config.settings.theme, Theme::Light);
    assert_eq!(app.status_message, "Theme: light");

    let reloaded = Config::load(dir.path(), dir.path()).unwrap();
    assert_eq!(reloaded.settings.theme, Theme::Light);
}

#[test]
fn test_logout_clears_session_and_quits() {
    let (dir, mut app, db) = setup();
    handle_command("logout", &mut app, &db).unwrap();
    assert!(!app.running);
    let reloaded = Config::load(dir.path(), dir.path()).unwrap();
    assert!(reloaded.settings.current_user.is_none());
}

#[test]
fn test_delete_requires_expenses_screen() {
    let (_dir, mut app, db) = setup();
    handle_command("delete", &mut app, &db).unwrap();
    assert_eq!(app.input_mode, InputMode::Normal);

    app.screen = Screen::Expenses;
    handle_command("delete", &mut app, &db).unwrap();
    assert_eq!(app.input_mode, InputMode::Confirm);
    let title = app.selected_expense().unwrap().title.clone();
    assert_eq!(app.confirm_message, format!("Delete '{title}'?"));
}

#[test]
fn test_add_and_edit_open_form() {
    let (_dir, mut app, db) = setup();
    handle_command("add", &mut app, &db).unwrap();
    assert_eq!(app.input_mode, InputMode::Form);
    assert!(app.form.as_ref().unwrap().editing_id.is_none());

    app.input_mode = InputMode::Normal;
    app.screen = Screen::Expenses;
    handle_command("edit", &mut app, &db).unwrap();
    let form = app.form.as_ref().unwrap();
    assert_eq!(form.editing_id, app.selected_expense().map(|e| e.id));
}
