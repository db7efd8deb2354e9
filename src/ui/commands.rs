use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::info;

use super::app::{App, InputMode, PendingAction, Screen};
use super::form::ExpenseForm;
use crate::db::Database;
use crate::models::{
    format_month_year, parse_amount, parse_date, Category, CategoryFilter, DateRange, SortKey,
};
use crate::session::Session;
use crate::ui::util::{format_amount, format_percent};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit Spendwise", cmd_quit, r);
    register_command!("quit", "Quit Spendwise", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("e", "Go to Expenses", cmd_expenses, r);
    register_command!("expenses", "Go to Expenses", cmd_expenses, r);
    register_command!("c", "Go to Categories", cmd_categories, r);
    register_command!("categories", "Go to Categories", cmd_categories, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("add", "Add a new expense", cmd_add, r);
    register_command!("edit", "Edit selected expense", cmd_edit, r);
    register_command!("delete", "Delete selected expense", cmd_delete, r);
    register_command!(
        "budget",
        "Set this month's budget (e.g. :budget 50000)",
        cmd_budget,
        r
    );
    register_command!(
        "from",
        "Custom range start (e.g. :from 2024-01-01, :from clear)",
        cmd_from,
        r
    );
    register_command!(
        "to",
        "Custom range end (e.g. :to 2024-01-31, :to clear)",
        cmd_to,
        r
    );
    register_command!(
        "category",
        "Filter by category (e.g. :category Shopping, :category all)",
        cmd_category,
        r
    );
    register_command!(
        "range",
        "Date range: all, week, month, custom",
        cmd_range,
        r
    );
    register_command!(
        "sort",
        "Sort: date-desc, date-asc, amount-desc, amount-asc",
        cmd_sort,
        r
    );
    register_command!("reset", "Reset all filters", cmd_reset, r);
    register_command!(
        "export",
        "Export the current view to CSV (e.g. :export ~/spending.csv)",
        cmd_export,
        r
    );
    register_command!("theme", "Toggle dark/light theme", cmd_theme, r);
    register_command!("logout", "Sign out and quit", cmd_logout, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    app.refresh(db)
}

fn cmd_expenses(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Expenses;
    app.refresh(db)
}

fn cmd_categories(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Categories;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_add(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.form = Some(ExpenseForm::new(app.today));
    app.input_mode = InputMode::Form;
    Ok(())
}

fn cmd_edit(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    if app.screen != Screen::Expenses {
        app.set_status("Navigate to Expenses and select one first");
        return Ok(());
    }
    match app.selected_expense().map(ExpenseForm::edit) {
        Some(form) => {
            app.form = Some(form);
            app.input_mode = InputMode::Form;
        }
        None => app.set_status("No expense selected"),
    }
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    if app.screen != Screen::Expenses || app.view.expenses.is_empty() {
        app.set_status("Navigate to Expenses and select one first");
        return Ok(());
    }

    if let Some(expense) = app.selected_expense() {
        let (id, title) = (expense.id, expense.title.clone());
        app.confirm_message = format!("Delete '{title}'?");
        app.pending_action = Some(PendingAction::DeleteExpense { id, title });
        app.input_mode = InputMode::Confirm;
    }

    Ok(())
}

fn cmd_budget(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let month = format_month_year(app.today);
    if args.is_empty() {
        let msg = match &app.view.summary.budget {
            Some(progress) => format!(
                "Budget for {month}: {} ({} used, {} remaining)",
                format_amount(progress.budget, app.currency()),
                format_percent(progress.percentage),
                format_amount(progress.remaining, app.currency()),
            ),
            None => format!("No budget set for {month}. Usage: :budget <amount>"),
        };
        app.set_status(msg);
        return Ok(());
    }

    let Some(amount) = parse_amount(args) else {
        app.set_status("Budget must be greater than 0");
        return Ok(());
    };

    db.upsert_budget(app.user_id(), app.today, amount)?;
    info!(month = %month, amount = %amount, "budget set");
    app.refresh(db)?;
    app.set_status(format!(
        "Budget set: {} for {month}",
        format_amount(amount, app.currency())
    ));
    Ok(())
}

/// `clear`, `none` or nothing opens the bound; anything else must be a date.
fn parse_bound(args: &str) -> Result<Option<chrono::NaiveDate>, String> {
    match args.to_lowercase().as_str() {
        "" | "clear" | "none" => Ok(None),
        _ => parse_date(args)
            .map(Some)
            .ok_or_else(|| format!("Invalid date: {args}. Use YYYY-MM-DD")),
    }
}

fn cmd_from(args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    match parse_bound(args) {
        Ok(date) => {
            app.filter.set_custom_start(date);
            app.recompute();
            app.set_status(format!("Range: {}", app.filter.date_range.label()));
        }
        Err(msg) => app.set_status(msg),
    }
    Ok(())
}

fn cmd_to(args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    match parse_bound(args) {
        Ok(date) => {
            app.filter.set_custom_end(date);
            app.recompute();
            app.set_status(format!("Range: {}", app.filter.date_range.label()));
        }
        Err(msg) => app.set_status(msg),
    }
    Ok(())
}

fn cmd_category(args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    if args.is_empty() {
        let names: Vec<&str> = Category::all().iter().map(|c| c.name).collect();
        app.set_status(format!("Usage: :category <name|all>. {}", names.join(", ")));
        return Ok(());
    }

    let filter = CategoryFilter::parse(args);
    if let CategoryFilter::Only(name) = &filter {
        if Category::find(name).is_none() {
            app.set_status(format!("Category '{args}' not found"));
            return Ok(());
        }
    }
    app.filter.category = filter;
    app.recompute();
    app.set_status(format!("Category: {}", app.filter.category));
    Ok(())
}

fn cmd_range(args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    match DateRange::parse(args) {
        Some(range) => {
            app.filter.date_range = range;
            app.recompute();
            app.set_status(format!("Range: {}", app.filter.date_range.label()));
        }
        None => app.set_status("Usage: :range <all|week|month|custom>"),
    }
    Ok(())
}

fn cmd_sort(args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    match SortKey::parse(args) {
        Some(key) => {
            app.filter.sort = key;
            app.recompute();
            app.set_status(format!("Sort: {}", key.label()));
        }
        None => {
            let keys: Vec<&str> = SortKey::all().iter().map(|k| k.as_str()).collect();
            app.set_status(format!("Usage: :sort <{}>", keys.join("|")));
        }
    }
    Ok(())
}

fn cmd_reset(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.filter = Default::default();
    app.recompute();
    app.set_status(format!("Filters reset: {}", app.filter));
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        let home = directories::UserDirs::new()
            .map(|d| d.home_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        crate::export::default_export_path(&home, app.today)
    } else {
        PathBuf::from(crate::run::shellexpand(args))
    };

    if app.view.expenses.is_empty() {
        app.set_status("No expenses to export");
        return Ok(());
    }

    let count = crate::export::export_csv(&path, &app.view.expenses)?;
    info!(count, path = %path.display(), "exported expenses");
    app.set_status(format!("Exported {count} expenses to {}", path.display()));
    Ok(())
}

fn cmd_theme(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.config.settings.theme = app.config.settings.theme.toggle();
    app.config.save()?;
    app.apply_theme();
    app.set_status(format!("Theme: {}", app.config.settings.theme));
    Ok(())
}

fn cmd_logout(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    Session::sign_out(&mut app.config)?;
    app.running = false;
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
