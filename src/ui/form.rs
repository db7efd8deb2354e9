use chrono::NaiveDate;

use crate::models::{Category, Expense, ExpenseDraft, Field, FieldError, NewExpense, DATE_FORMAT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    Title,
    Amount,
    Category,
    Date,
    Recurring,
}

impl FormField {
    pub(crate) fn all() -> &'static [FormField] {
        &[
            Self::Title,
            Self::Amount,
            Self::Category,
            Self::Date,
            Self::Recurring,
        ]
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Amount => "Amount",
            Self::Category => "Category",
            Self::Date => "Date",
            Self::Recurring => "Recurring",
        }
    }

    fn validated_as(&self) -> Option<Field> {
        match self {
            Self::Title => Some(Field::Title),
            Self::Amount => Some(Field::Amount),
            Self::Category => Some(Field::Category),
            Self::Date => Some(Field::Date),
            Self::Recurring => None,
        }
    }
}

/// Add/edit overlay state.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ExpenseForm {
    /// `Some` when editing an existing expense.
    pub(crate) editing_id: Option<i64>,
    pub(crate) draft: ExpenseDraft,
    pub(crate) field: FormField,
    pub(crate) errors: Vec<FieldError>,
}

impl ExpenseForm {
    pub(crate) fn new(today: NaiveDate) -> Self {
        Self {
            editing_id: None,
            draft: ExpenseDraft {
                category: Category::all()
                    .first()
                    .map(|c| c.name.to_string())
                    .unwrap_or_default(),
                date_input: today.format(DATE_FORMAT).to_string(),
                ..ExpenseDraft::default()
            },
            field: FormField::Title,
            errors: Vec::new(),
        }
    }

    pub(crate) fn edit(expense: &Expense) -> Self {
        Self {
            editing_id: Some(expense.id),
            draft: ExpenseDraft::from_expense(expense),
            field: FormField::Title,
            errors: Vec::new(),
        }
    }

    pub(crate) fn title(&self) -> &'static str {
        if self.editing_id.is_some() {
            "Edit Expense"
        } else {
            "Add New Expense"
        }
    }

    pub(crate) fn next_field(&mut self) {
        let all = FormField::all();
        let idx = all.iter().position(|f| *f == self.field).unwrap_or(0);
        self.field = all[(idx + 1) % all.len()];
    }

    pub(crate) fn prev_field(&mut self) {
        let all = FormField::all();
        let idx = all.iter().position(|f| *f == self.field).unwrap_or(0);
        self.field = all[(idx + all.len() - 1) % all.len()];
    }

    pub(crate) fn input_char(&mut self, c: char) {
        match self.field {
            FormField::Title => self.draft.title.push(c),
            FormField::Amount => self.draft.amount_input.push(c),
            FormField::Date => self.draft.date_input.push(c),
            FormField::Category => match c {
                '+' | '=' | 'l' => self.adjust(1),
                '-' | 'h' => self.adjust(-1),
                _ => {}
            },
            FormField::Recurring => {
                if c == ' ' {
                    self.draft.is_recurring = !self.draft.is_recurring;
                }
            }
        }
    }

    pub(crate) fn backspace(&mut self) {
        match self.field {
            FormField::Title => {
                self.draft.title.pop();
            }
            FormField::Amount => {
                self.draft.amount_input.pop();
            }
            FormField::Date => {
                self.draft.date_input.pop();
            }
            FormField::Category | FormField::Recurring => {}
        }
    }

    /// Step the category through the reference list, or flip the recurring flag.
    pub(crate) fn adjust(&mut self, delta: i32) {
        match self.field {
            FormField::Category => {
                let all = Category::all();
                let len = all.len() as i32;
                let current = Category::find(&self.draft.category)
                    .and_then(|c| all.iter().position(|a| a.name == c.name))
                    .map(|i| i as i32)
                    .unwrap_or(-1);
                let next = if current < 0 {
                    0
                } else {
                    (current + delta).rem_euclid(len)
                };
                if let Some(cat) = all.get(next as usize) {
                    self.draft.category = cat.name.to_string();
                }
            }
            FormField::Recurring => self.draft.is_recurring = !self.draft.is_recurring,
            _ => {}
        }
    }

    /// Validate the draft. On failure the errors are kept for display and focus moves
    /// to the first invalid field.
    pub(crate) fn submit(&mut self) -> Option<NewExpense> {
        match self.draft.validate() {
            Ok(expense) => {
                self.errors.clear();
                Some(expense)
            }
            Err(errors) => {
                if let Some(first) = errors.first() {
                    if let Some(field) = FormField::all()
                        .iter()
                        .find(|f| f.validated_as() == Some(first.field))
                    {
                        self.field = *field;
                    }
                }
                self.errors = errors;
                None
            }
        }
    }

    pub(crate) fn error_for(&self, field: FormField) -> Option<&str> {
        let field = field.validated_as()?;
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub(crate) fn value_of(&self, field: FormField) -> String {
        match field {
            FormField::Title => self.draft.title.clone(),
            FormField::Amount => self.draft.amount_input.clone(),
            FormField::Category => format!("< {} >", self.draft.category),
            FormField::Date => self.draft.date_input.clone(),
            FormField::Recurring => {
                if self.draft.is_recurring {
                    "[x] Recurring expense".into()
                } else {
                    "[ ] Recurring expense".into()
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "form_tests.rs"]
mod tests;
