use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::Category;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    /// `None` when the stored amount was missing, non-numeric or not positive.
    pub amount: Option<Decimal>,
    pub category: String,
    pub date: NaiveDate,
    pub is_recurring: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Expense {
    /// Amount as it contributes to sums: invalid amounts count as zero.
    pub fn amount_or_zero(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }

    pub fn has_valid_amount(&self) -> bool {
        self.amount.is_some()
    }
}

/// Validated, client-editable expense fields.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub title: String,
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    pub is_recurring: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Amount,
    Category,
    Date,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Amount => "amount",
            Self::Category => "category",
            Self::Date => "date",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field.as_str(), self.message)
    }
}

/// Raw user input for creating or editing an expense.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseDraft {
    pub title: String,
    pub amount_input: String,
    pub category: String,
    pub date_input: String,
    pub is_recurring: bool,
}

impl ExpenseDraft {
    pub fn from_expense(expense: &Expense) -> Self {
        Self {
            title: expense.title.clone(),
            amount_input: expense.amount.map(|a| a.to_string()).unwrap_or_default(),
            category: expense.category.clone(),
            date_input: expense.date.format(DATE_FORMAT).to_string(),
            is_recurring: expense.is_recurring,
        }
    }

    /// Validate every field, collecting all errors rather than stopping at the first.
    pub fn validate(&self) -> Result<NewExpense, Vec<FieldError>> {
        let mut errors = Vec::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.push(FieldError {
                field: Field::Title,
                message: "Title is required".into(),
            });
        }

        let amount = parse_amount(&self.amount_input);
        if amount.is_none() {
            errors.push(FieldError {
                field: Field::Amount,
                message: "Amount must be greater than 0".into(),
            });
        }

        let category = if self.category.trim().is_empty() {
            errors.push(FieldError {
                field: Field::Category,
                message: "Category is required".into(),
            });
            None
        } else {
            let found = Category::find(&self.category);
            if found.is_none() {
                errors.push(FieldError {
                    field: Field::Category,
                    message: format!("Unknown category '{}'", self.category.trim()),
                });
            }
            found
        };

        let date = if self.date_input.trim().is_empty() {
            errors.push(FieldError {
                field: Field::Date,
                message: "Date is required".into(),
            });
            None
        } else {
            let parsed = parse_date(&self.date_input);
            if parsed.is_none() {
                errors.push(FieldError {
                    field: Field::Date,
                    message: "Date must be YYYY-MM-DD".into(),
                });
            }
            parsed
        };

        match (amount, category, date) {
            (Some(amount), Some(category), Some(date)) if errors.is_empty() => Ok(NewExpense {
                title: title.to_string(),
                amount,
                category: category.name.to_string(),
                date,
                is_recurring: self.is_recurring,
            }),
            _ => Err(errors),
        }
    }
}

/// Parse a user- or store-supplied amount. Only strictly positive decimals are accepted.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .ok()
        .filter(|amount| *amount > Decimal::ZERO)
}

pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).ok()
}
