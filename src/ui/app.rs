use anyhow::Result;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use tracing::debug;

use super::form::ExpenseForm;
use super::theme::Palette;
use super::util::clamp_cursor;
use crate::config::Config;
use crate::db::Database;
use crate::models::{Budget, Category, Expense, FilterSpec};
use crate::session::Session;
use crate::view::{self, ExpenseView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Expenses,
    Categories,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Expenses, Self::Categories]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Expenses => write!(f, "Expenses"),
            Self::Categories => write!(f, "Categories"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Form,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Form => write!(f, "FORM"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    DeleteExpense { id: i64, title: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    pub(crate) config: Config,
    pub(crate) session: Session,
    pub(crate) palette: Palette,

    // Snapshot of the signed-in user's records
    pub(crate) expenses: Vec<Expense>,
    pub(crate) budget: Option<Budget>,
    pub(crate) today: NaiveDate,

    // Derived
    pub(crate) filter: FilterSpec,
    pub(crate) view: ExpenseView,

    // Expenses
    pub(crate) expense_index: usize,
    pub(crate) expense_scroll: usize,

    // Categories
    pub(crate) category_index: usize,

    pub(crate) form: Option<ExpenseForm>,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(config: Config, session: Session, today: NaiveDate) -> Self {
        let filter = FilterSpec::default();
        let view = view::build_view(&[], &filter, None, today);
        let palette = Palette::for_theme(config.settings.theme);

        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,

            config,
            session,
            palette,

            expenses: Vec::new(),
            budget: None,
            today,

            filter,
            view,

            expense_index: 0,
            expense_scroll: 0,

            category_index: 0,

            form: None,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn user_id(&self) -> i64 {
        self.session.user.id
    }

    pub(crate) fn currency(&self) -> &str {
        &self.config.settings.currency_symbol
    }

    pub(crate) fn budget_amount(&self) -> Option<Decimal> {
        self.budget.as_ref().map(|b| b.amount)
    }

    /// Reload the user's expenses and this month's budget, then re-derive the view.
    pub(crate) fn refresh(&mut self, db: &Database) -> Result<()> {
        self.today = Local::now().date_naive();
        self.expenses = db.get_expenses(self.user_id())?;
        self.budget = db.get_budget(self.user_id(), self.today)?;
        self.recompute();
        Ok(())
    }

    /// Re-derive the view from the cached snapshot after a filter change.
    pub(crate) fn recompute(&mut self) {
        self.view = view::build_view(
            &self.expenses,
            &self.filter,
            self.budget_amount(),
            self.today,
        );
        debug!(
            category = %self.filter.category,
            range = self.filter.date_range.as_str(),
            sort = self.filter.sort.as_str(),
            shown = self.view.expenses.len(),
            "view recomputed"
        );
        clamp_cursor(
            &mut self.expense_index,
            &mut self.expense_scroll,
            self.view.expenses.len(),
        );
    }

    pub(crate) fn selected_expense(&self) -> Option<&Expense> {
        self.view.expenses.get(self.expense_index)
    }

    pub(crate) fn selected_category(&self) -> Option<&'static Category> {
        Category::all().get(self.category_index)
    }

    pub(crate) fn apply_theme(&mut self) {
        self.palette = Palette::for_theme(self.config.settings.theme);
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
