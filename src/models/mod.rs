mod budget;
mod category;
mod expense;
mod filter;
mod user;

pub use budget::{format_month_year, month_start, Budget};
pub use category::Category;
pub use expense::{
    parse_amount, parse_date, Expense, ExpenseDraft, Field, FieldError, NewExpense, DATE_FORMAT,
};
pub use filter::{CategoryFilter, DateRange, FilterSpec, SortKey};
pub use user::{normalize_email, User};
