use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    /// Always the first day of the month. Together with `user_id` this is the natural key.
    pub month: NaiveDate,
    pub amount: Decimal,
    pub created_at: String,
    pub updated_at: String,
}

/// First calendar day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// e.g. `"October 2026"`
pub fn format_month_year(month: NaiveDate) -> String {
    month.format("%B %Y").to_string()
}
