use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use tracing::info;

use crate::config::Config;
use crate::db::Database;
use crate::models::{
    format_month_year, parse_amount, parse_date, Category, CategoryFilter, DateRange,
    ExpenseDraft, FilterSpec, SortKey, DATE_FORMAT,
};
use crate::session::Session;
use crate::ui::util::{format_amount, format_percent, truncate};
use crate::view::{self, BudgetStatus, ExpenseView};

/// Flags that consume the following argument.
const VALUE_FLAGS: &[&str] = &[
    "--title",
    "--amount",
    "--category",
    "--date",
    "--range",
    "--from",
    "--to",
    "--sort",
];

pub(crate) fn as_cli(args: &[String], mut config: Config, db: &Database) -> Result<()> {
    let rest = &args[2..];
    match args[1].as_str() {
        "login" => cli_login(rest, &mut config, db),
        "logout" => cli_logout(&mut config),
        "whoami" => cli_whoami(&config, db),
        "add" | "a" => cli_add(rest, &config, db),
        "edit" => cli_edit(rest, &config, db),
        "delete" | "rm" => cli_delete(rest, &config, db),
        "list" | "ls" => cli_list(rest, &config, db),
        "summary" | "s" => cli_summary(rest, &config, db),
        "budget" => cli_budget(rest, &config, db),
        "export" => cli_export(rest, &config, db),
        "categories" => cli_categories(),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("spendwise {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Spendwise - personal expense tracker");
    println!();
    println!("Usage: spendwise [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  login <email>                 Sign in (creates the profile if new)");
    println!("  logout                        Sign out");
    println!("  whoami                        Show the signed-in profile");
    println!("  add                           Add an expense");
    println!("    --title <t> --amount <n> --category <c> [--date YYYY-MM-DD] [--recurring]");
    println!("  edit <id>                     Edit an expense (same flags as add,");
    println!("                                plus --no-recurring)");
    println!("  delete <id>                   Delete an expense");
    println!("  list [filters]                List expenses");
    println!("  summary [filters]             Totals, top category, budget and daily spending");
    println!("  budget [amount]               Show or set this month's budget");
    println!("  export [path] [filters]       Export expenses to CSV");
    println!("  categories                    List categories");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("Filters:");
    println!("  --category <name|all>         Only this category (default: all)");
    println!("  --range <all|week|month>      Date range (default: month)");
    println!("  --from <YYYY-MM-DD>           Custom range start (inclusive)");
    println!("  --to <YYYY-MM-DD>             Custom range end (inclusive)");
    println!("  --sort <key>                  date-desc, date-asc, amount-desc, amount-asc");
}

// ── Argument helpers ─────────────────────────────────────────

pub(crate) fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

/// First argument that is neither a flag nor a flag's value.
pub(crate) fn positional(args: &[String]) -> Option<&str> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            return Some(arg.as_str());
        }
    }
    None
}

pub(crate) fn parse_filter_args(args: &[String]) -> Result<FilterSpec> {
    let mut spec = FilterSpec::default();

    if let Some(name) = flag(args, "--category") {
        let category = CategoryFilter::parse(name);
        if let CategoryFilter::Only(ref n) = category {
            if Category::find(n).is_none() {
                bail!("Unknown category '{name}'. Run `spendwise categories` to list them");
            }
        }
        spec.category = category;
    }
    if let Some(range) = flag(args, "--range") {
        spec.date_range = DateRange::parse(range)
            .with_context(|| format!("Invalid range '{range}'. Use all, week, month or custom"))?;
    }
    if let Some(from) = flag(args, "--from") {
        spec.set_custom_start(Some(parse_date_arg("--from", from)?));
    }
    if let Some(to) = flag(args, "--to") {
        spec.set_custom_end(Some(parse_date_arg("--to", to)?));
    }
    if let Some(sort) = flag(args, "--sort") {
        spec.sort = SortKey::parse(sort).with_context(|| {
            format!("Invalid sort '{sort}'. Use date-desc, date-asc, amount-desc or amount-asc")
        })?;
    }

    Ok(spec)
}

fn parse_date_arg(name: &str, value: &str) -> Result<NaiveDate> {
    parse_date(value).with_context(|| format!("Invalid {name} date '{value}'. Use YYYY-MM-DD"))
}

fn parse_id(args: &[String], usage: &str) -> Result<i64> {
    let Some(raw) = positional(args) else {
        bail!("Usage: {usage}");
    };
    raw.parse()
        .with_context(|| format!("Invalid expense id '{raw}'"))
}

/// Apply `add`/`edit` flags to a draft. Only flags that are present change the draft.
pub(crate) fn apply_draft_flags(draft: &mut ExpenseDraft, args: &[String]) {
    if let Some(title) = flag(args, "--title") {
        draft.title = title.to_string();
    }
    if let Some(amount) = flag(args, "--amount") {
        draft.amount_input = amount.to_string();
    }
    if let Some(category) = flag(args, "--category") {
        draft.category = category.to_string();
    }
    if let Some(date) = flag(args, "--date") {
        draft.date_input = date.to_string();
    }
    if has_flag(args, "--recurring") {
        draft.is_recurring = true;
    }
    if has_flag(args, "--no-recurring") {
        draft.is_recurring = false;
    }
}

fn validate_draft(draft: &ExpenseDraft) -> Result<crate::models::NewExpense> {
    draft.validate().map_err(|errors| {
        let lines: Vec<String> = errors.iter().map(|e| format!("  {e}")).collect();
        anyhow::anyhow!("Invalid expense:\n{}", lines.join("\n"))
    })
}

fn current_view(
    args: &[String],
    session: &Session,
    db: &Database,
) -> Result<(FilterSpec, ExpenseView)> {
    let spec = parse_filter_args(args)?;
    let today = Local::now().date_naive();
    let expenses = db.get_expenses(session.user.id)?;
    let budget = db.get_budget(session.user.id, today)?.map(|b| b.amount);
    let view = view::build_view(&expenses, &spec, budget, today);
    Ok((spec, view))
}

// ── Commands ─────────────────────────────────────────────────

fn cli_login(args: &[String], config: &mut Config, db: &Database) -> Result<()> {
    let Some(email) = args.first() else {
        bail!("Usage: spendwise login <email>");
    };
    let session = Session::sign_in(email, config, db)?;
    println!("Signed in as {}", session.user.email);
    Ok(())
}

fn cli_logout(config: &mut Config) -> Result<()> {
    match Session::sign_out(config)? {
        Some(email) => println!("Signed out {email}"),
        None => println!("Not signed in"),
    }
    Ok(())
}

fn cli_whoami(config: &Config, db: &Database) -> Result<()> {
    match Session::resume(config, db)? {
        Some(session) => println!("{}", session.user.email),
        None => println!("Not signed in"),
    }
    Ok(())
}

fn cli_add(args: &[String], config: &Config, db: &Database) -> Result<()> {
    let session = Session::require(config, db)?;
    let mut draft = ExpenseDraft {
        date_input: Local::now().date_naive().format(DATE_FORMAT).to_string(),
        ..ExpenseDraft::default()
    };
    apply_draft_flags(&mut draft, args);
    let new = validate_draft(&draft)?;

    let expense = db.insert_expense(session.user.id, &new)?;
    info!(id = expense.id, "expense added from cli");
    println!(
        "Added #{}: {} {} ({}, {})",
        expense.id,
        expense.title,
        format_amount(new.amount, &config.settings.currency_symbol),
        expense.category,
        expense.date.format(DATE_FORMAT),
    );
    Ok(())
}

fn cli_edit(args: &[String], config: &Config, db: &Database) -> Result<()> {
    let session = Session::require(config, db)?;
    let id = parse_id(args, "spendwise edit <id> [--title ...]")?;
    let Some(existing) = db.get_expense(session.user.id, id)? else {
        bail!("Expense {id} not found");
    };

    let mut draft = ExpenseDraft::from_expense(&existing);
    apply_draft_flags(&mut draft, args);
    let new = validate_draft(&draft)?;

    let expense = db.update_expense(session.user.id, id, &new)?;
    info!(id, "expense updated from cli");
    println!("Updated #{}: {}", expense.id, expense.title);
    Ok(())
}

fn cli_delete(args: &[String], config: &Config, db: &Database) -> Result<()> {
    let session = Session::require(config, db)?;
    let id = parse_id(args, "spendwise delete <id>")?;
    let Some(existing) = db.get_expense(session.user.id, id)? else {
        bail!("Expense {id} not found");
    };
    db.delete_expense(session.user.id, id)?;
    info!(id, "expense deleted from cli");
    println!("Deleted #{id}: {}", existing.title);
    Ok(())
}

fn cli_list(args: &[String], config: &Config, db: &Database) -> Result<()> {
    let session = Session::require(config, db)?;
    let (spec, view) = current_view(args, &session, db)?;
    let symbol = &config.settings.currency_symbol;

    if view.expenses.is_empty() {
        println!("No expenses ({spec})");
        return Ok(());
    }

    println!(
        "{:<6} {:<10} {:<28} {:<18} {:>14}",
        "ID", "Date", "Title", "Category", "Amount"
    );
    println!("{}", "─".repeat(80));
    for e in &view.expenses {
        let amount = e
            .amount
            .map(|a| format_amount(a, symbol))
            .unwrap_or_else(|| "invalid".into());
        println!(
            "{:<6} {:<10} {:<28} {:<18} {:>14}{}",
            e.id,
            e.date.format(DATE_FORMAT),
            truncate(&e.title, 28),
            truncate(&e.category, 18),
            amount,
            if e.is_recurring { " ↻" } else { "" },
        );
    }
    println!("{}", "─".repeat(80));
    println!(
        "{} expenses, total {} ({spec})",
        view.summary.transaction_count,
        format_amount(view.summary.total, symbol)
    );
    Ok(())
}

fn cli_summary(args: &[String], config: &Config, db: &Database) -> Result<()> {
    let session = Session::require(config, db)?;
    let (spec, view) = current_view(args, &session, db)?;
    let symbol = &config.settings.currency_symbol;
    let summary = &view.summary;

    println!("Spendwise - {spec}");
    println!("{}", "─".repeat(40));
    if !summary.has_data() {
        println!("  No expense data available");
        return Ok(());
    }

    println!("  Total:        {}", format_amount(summary.total, symbol));
    println!("  Transactions: {}", summary.transaction_count);
    if let Some(top) = &summary.top_category {
        println!(
            "  Top category: {} ({})",
            top.name,
            format_amount(top.total, symbol)
        );
    }
    if summary.invalid_amounts > 0 {
        println!(
            "  Unreadable:   {} expense(s) counted as zero",
            summary.invalid_amounts
        );
    }
    if let Some(progress) = &summary.budget {
        let status = match progress.status {
            BudgetStatus::OnTrack => "on track",
            BudgetStatus::Warning => "warning",
            BudgetStatus::Over => "over budget",
        };
        println!(
            "  Budget:       {} ({} used, {} remaining, {status})",
            format_amount(progress.budget, symbol),
            format_percent(progress.percentage),
            format_amount(progress.remaining, symbol),
        );
    }

    println!();
    println!("By category:");
    for ct in &summary.category_totals {
        println!("  {:<24} {}", ct.name, format_amount(ct.total, symbol));
    }

    println!();
    println!("By day:");
    for day in &summary.daily_totals {
        println!(
            "  {:<24} {}",
            day.date.format(DATE_FORMAT),
            format_amount(day.total, symbol)
        );
    }
    Ok(())
}

fn cli_budget(args: &[String], config: &Config, db: &Database) -> Result<()> {
    let session = Session::require(config, db)?;
    let today = Local::now().date_naive();
    let month = format_month_year(today);
    let symbol = &config.settings.currency_symbol;

    if let Some(raw) = args.first() {
        let Some(amount) = parse_amount(raw) else {
            bail!("Budget must be greater than 0");
        };
        let budget = db.upsert_budget(session.user.id, today, amount)?;
        info!(month = %month, amount = %budget.amount, "budget set from cli");
        println!("Budget for {month} set to {}", format_amount(budget.amount, symbol));
        return Ok(());
    }

    // Budget progress always measures this month's spending.
    let (_, view) = current_view(&[], &session, db)?;
    match view.summary.budget {
        Some(progress) => {
            println!("Budget for {month}: {}", format_amount(progress.budget, symbol));
            println!(
                "  Spent:     {} ({})",
                format_amount(view.summary.total, symbol),
                format_percent(progress.percentage)
            );
            println!("  Remaining: {}", format_amount(progress.remaining, symbol));
        }
        None => println!("No budget set for {month}. Usage: spendwise budget <amount>"),
    }
    Ok(())
}

fn cli_export(args: &[String], config: &Config, db: &Database) -> Result<()> {
    let session = Session::require(config, db)?;
    let (spec, view) = current_view(args, &session, db)?;

    let path = match positional(args) {
        Some(p) => PathBuf::from(shellexpand(p)),
        None => {
            let home = directories::UserDirs::new()
                .map(|d| d.home_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."));
            crate::export::default_export_path(&home, Local::now().date_naive())
        }
    };

    if view.expenses.is_empty() {
        println!("No expenses to export ({spec})");
        return Ok(());
    }
    let count = crate::export::export_csv(&path, &view.expenses)?;
    info!(count, path = %path.display(), "exported expenses");
    println!("Exported {count} expenses to {}", path.display());
    Ok(())
}

fn cli_categories() -> Result<()> {
    for cat in Category::all() {
        println!("  {:<20} {}", cat.name, cat.color);
    }
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
