use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::models::{Expense, DATE_FORMAT};

const HEADER: [&str; 5] = ["date", "title", "category", "amount", "recurring"];

/// Write expenses to a CSV file in the given order. Returns the number of rows written.
/// Unusable amounts are written as an empty cell.
pub(crate) fn export_csv(path: &Path, expenses: &[Expense]) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    wtr.write_record(HEADER)?;
    for expense in expenses {
        wtr.write_record([
            expense.date.format(DATE_FORMAT).to_string(),
            expense.title.clone(),
            expense.category.clone(),
            expense.amount.map(|a| a.to_string()).unwrap_or_default(),
            expense.is_recurring.to_string(),
        ])?;
    }
    wtr.flush()
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;
    Ok(expenses.len())
}

/// `<dir>/spendwise-export-YYYY-MM-DD.csv`
pub(crate) fn default_export_path(dir: &Path, today: NaiveDate) -> PathBuf {
    dir.join(format!("spendwise-export-{}.csv", today.format(DATE_FORMAT)))
}

#[cfg(test)]
#[path = "csv_export_tests.rs"]
mod tests;
