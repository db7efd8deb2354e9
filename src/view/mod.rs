//! Derived dashboard view: filter, sort, then summarize an in-memory expense snapshot.
//!
//! Everything here is pure. Callers pass the current date in explicitly so a view can be
//! recomputed on every input change and tested without a clock.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use crate::models::{month_start, DateRange, Expense, FilterSpec, SortKey};

const WEEK_DAYS: u64 = 7;
const WARNING_PERCENT: Decimal = Decimal::from_parts(80, 0, 0, false, 0);
const FULL_PERCENT: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub name: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayTotal {
    pub date: NaiveDate,
    pub total: Decimal,
}

impl DayTotal {
    /// Display label, e.g. `"Jan 5"`. Never used for ordering.
    pub fn label(&self) -> String {
        self.date.format("%b %-d").to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    OnTrack,
    Warning,
    Over,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetProgress {
    pub budget: Decimal,
    /// Negative once spending exceeds the budget.
    pub remaining: Decimal,
    /// Unclamped: 250 spent against 200 is 125.
    pub percentage: Decimal,
    pub status: BudgetStatus,
}

impl BudgetProgress {
    pub fn new(budget: Decimal, total: Decimal) -> Option<Self> {
        if budget <= Decimal::ZERO {
            return None;
        }
        let percentage = total / budget * Decimal::ONE_HUNDRED;
        let status = if percentage > FULL_PERCENT {
            BudgetStatus::Over
        } else if percentage > WARNING_PERCENT {
            BudgetStatus::Warning
        } else {
            BudgetStatus::OnTrack
        };
        Some(Self {
            budget,
            remaining: budget - total,
            percentage,
            status,
        })
    }

    /// Percentage for progress indicators, capped at 100.
    pub fn clamped_percentage(&self) -> Decimal {
        self.percentage.min(FULL_PERCENT)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: Decimal,
    pub transaction_count: usize,
    /// Sorted by total descending, ties by name ascending.
    pub category_totals: Vec<CategoryTotal>,
    pub top_category: Option<CategoryTotal>,
    /// Chronological. Empty when there is nothing to chart.
    pub daily_totals: Vec<DayTotal>,
    pub budget: Option<BudgetProgress>,
    /// Rows listed but contributing zero because their amount is unusable.
    pub invalid_amounts: usize,
}

impl Summary {
    pub fn has_data(&self) -> bool {
        self.transaction_count > 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseView {
    pub expenses: Vec<Expense>,
    pub summary: Summary,
}

/// Apply the category and date-range filters. Both must hold for a record to survive.
pub fn filter_expenses(expenses: &[Expense], spec: &FilterSpec, today: NaiveDate) -> Vec<Expense> {
    expenses
        .iter()
        .filter(|e| spec.category.matches(&e.category))
        .filter(|e| in_date_range(e.date, &spec.date_range, today))
        .cloned()
        .collect()
}

fn in_date_range(date: NaiveDate, range: &DateRange, today: NaiveDate) -> bool {
    match range {
        DateRange::All => true,
        DateRange::Week => {
            let week_ago = today
                .checked_sub_days(Days::new(WEEK_DAYS))
                .unwrap_or(NaiveDate::MIN);
            date >= week_ago
        }
        DateRange::Month => date >= month_start(today),
        DateRange::Custom { start, end } => {
            start.map_or(true, |s| date >= s) && end.map_or(true, |e| date <= e)
        }
    }
}

/// Stable sort: records with equal keys keep their input order.
pub fn sort_expenses(expenses: &mut [Expense], key: SortKey) {
    match key {
        SortKey::DateDesc => expenses.sort_by(|a, b| b.date.cmp(&a.date)),
        SortKey::DateAsc => expenses.sort_by(|a, b| a.date.cmp(&b.date)),
        SortKey::AmountDesc => {
            expenses.sort_by(|a, b| b.amount_or_zero().cmp(&a.amount_or_zero()))
        }
        SortKey::AmountAsc => {
            expenses.sort_by(|a, b| a.amount_or_zero().cmp(&b.amount_or_zero()))
        }
    }
}

pub fn total(expenses: &[Expense]) -> Decimal {
    expenses.iter().map(Expense::amount_or_zero).sum()
}

pub fn category_totals(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut sums: HashMap<&str, Decimal> = HashMap::new();
    for expense in expenses {
        *sums.entry(expense.category.as_str()).or_default() += expense.amount_or_zero();
    }
    let mut totals: Vec<CategoryTotal> = sums
        .into_iter()
        .map(|(name, total)| CategoryTotal {
            name: name.to_string(),
            total,
        })
        .collect();
    totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    totals
}

/// Largest total wins; equal totals go to the alphabetically first name.
pub fn top_category(totals: &[CategoryTotal]) -> Option<&CategoryTotal> {
    totals
        .iter()
        .reduce(|best, next| match next.total.cmp(&best.total) {
            std::cmp::Ordering::Greater => next,
            std::cmp::Ordering::Equal if next.name < best.name => next,
            _ => best,
        })
}

pub fn daily_totals(expenses: &[Expense]) -> Vec<DayTotal> {
    let mut days: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for expense in expenses {
        *days.entry(expense.date).or_default() += expense.amount_or_zero();
    }
    days.into_iter()
        .map(|(date, total)| DayTotal { date, total })
        .collect()
}

/// Reduce an already-filtered list into dashboard figures.
pub fn summarize(expenses: &[Expense], budget: Option<Decimal>) -> Summary {
    let total = total(expenses);
    let category_totals = category_totals(expenses);
    let top_category = top_category(&category_totals).cloned();
    Summary {
        total,
        transaction_count: expenses.len(),
        top_category,
        category_totals,
        daily_totals: daily_totals(expenses),
        budget: budget.and_then(|b| BudgetProgress::new(b, total)),
        invalid_amounts: expenses.iter().filter(|e| !e.has_valid_amount()).count(),
    }
}

/// Filter, sort and summarize a snapshot of a user's expenses.
pub fn build_view(
    expenses: &[Expense],
    spec: &FilterSpec,
    budget: Option<Decimal>,
    today: NaiveDate,
) -> ExpenseView {
    let mut filtered = filter_expenses(expenses, spec, today);
    sort_expenses(&mut filtered, spec.sort);
    let summary = summarize(&filtered, budget);
    ExpenseView {
        expenses: filtered,
        summary,
    }
}

#[cfg(test)]
mod tests;
