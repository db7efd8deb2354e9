mod schema;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::models::*;

const MONTH_FORMAT: &str = "%Y-%m-%d";

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                debug!(from_version, "applying migration");
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Users ─────────────────────────────────────────────────

    pub(crate) fn find_or_create_user(&self, email: &str) -> Result<User> {
        let Some(email) = normalize_email(email) else {
            bail!("Invalid email address: '{email}'");
        };
        if let Some(user) = self.get_user_by_email(&email)? {
            return Ok(user);
        }
        let created_at = now();
        self.conn.execute(
            "INSERT INTO users (email, created_at) VALUES (?1, ?2)",
            params![email, created_at],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(user_id = id, "created profile");
        Ok(User {
            id,
            email,
            created_at,
        })
    }

    pub(crate) fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let result = self.conn.query_row(
            "SELECT id, email, created_at FROM users WHERE email = ?1",
            params![email.trim().to_lowercase()],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    created_at: row.get(2)?,
                })
            },
        );
        match result {
            Ok(u) => Ok(Some(u)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // ── Expenses ──────────────────────────────────────────────

    pub(crate) fn insert_expense(&self, user_id: i64, expense: &NewExpense) -> Result<Expense> {
        let ts = now();
        self.conn.execute(
            "INSERT INTO expenses (user_id, title, amount, category, date, is_recurring, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                user_id,
                expense.title,
                expense.amount.to_string(),
                expense.category,
                expense.date.format(DATE_FORMAT).to_string(),
                expense.is_recurring,
                ts,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(user_id, expense_id = id, "expense added");
        self.get_expense(user_id, id)?
            .ok_or_else(|| anyhow::anyhow!("Expense {id} vanished after insert"))
    }

    /// All of a user's expenses, newest first.
    pub(crate) fn get_expenses(&self, user_id: i64) -> Result<Vec<Expense>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, amount, category, date, is_recurring, created_at, updated_at
             FROM expenses WHERE user_id = ?1
             ORDER BY date DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![user_id], expense_from_row)?;
        let expenses = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(user_id, count = expenses.len(), "loaded expenses");
        Ok(expenses)
    }

    pub(crate) fn get_expense(&self, user_id: i64, id: i64) -> Result<Option<Expense>> {
        let result = self.conn.query_row(
            "SELECT id, user_id, title, amount, category, date, is_recurring, created_at, updated_at
             FROM expenses WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
            expense_from_row,
        );
        match result {
            Ok(e) => Ok(Some(e)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn update_expense(
        &self,
        user_id: i64,
        id: i64,
        expense: &NewExpense,
    ) -> Result<Expense> {
        let changed = self.conn.execute(
            "UPDATE expenses
             SET title = ?1, amount = ?2, category = ?3, date = ?4, is_recurring = ?5, updated_at = ?6
             WHERE id = ?7 AND user_id = ?8",
            params![
                expense.title,
                expense.amount.to_string(),
                expense.category,
                expense.date.format(DATE_FORMAT).to_string(),
                expense.is_recurring,
                now(),
                id,
                user_id,
            ],
        )?;
        if changed == 0 {
            bail!("Expense {id} not found");
        }
        info!(user_id, expense_id = id, "expense updated");
        self.get_expense(user_id, id)?
            .ok_or_else(|| anyhow::anyhow!("Expense {id} not found"))
    }

    pub(crate) fn delete_expense(&self, user_id: i64, id: i64) -> Result<()> {
        let changed = self.conn.execute(
            "DELETE FROM expenses WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        if changed == 0 {
            bail!("Expense {id} not found");
        }
        info!(user_id, expense_id = id, "expense deleted");
        Ok(())
    }

    // ── Budgets ───────────────────────────────────────────────

    /// The budget for the month containing `month`, if one is set.
    pub(crate) fn get_budget(&self, user_id: i64, month: NaiveDate) -> Result<Option<Budget>> {
        let month = month_start(month);
        let result = self.conn.query_row(
            "SELECT id, user_id, month, amount, created_at, updated_at
             FROM budgets WHERE user_id = ?1 AND month = ?2",
            params![user_id, month.format(MONTH_FORMAT).to_string()],
            |row| {
                let amount_str: String = row.get(3)?;
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    amount_str,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            },
        );
        let (id, user_id, amount_str, created_at, updated_at) = match result {
            Ok(r) => r,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match parse_amount(&amount_str) {
            Some(amount) => Ok(Some(Budget {
                id,
                user_id,
                month,
                amount,
                created_at,
                updated_at,
            })),
            None => {
                warn!(budget_id = id, amount = %amount_str, "ignoring budget with invalid amount");
                Ok(None)
            }
        }
    }

    /// Create the month's budget or replace its amount. At most one per user and month.
    pub(crate) fn upsert_budget(
        &self,
        user_id: i64,
        month: NaiveDate,
        amount: Decimal,
    ) -> Result<Budget> {
        if amount <= Decimal::ZERO {
            bail!("Budget must be greater than 0");
        }
        let month = month_start(month);
        let ts = now();
        self.conn.execute(
            "INSERT INTO budgets (user_id, month, amount, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT(user_id, month) DO UPDATE SET amount = ?3, updated_at = ?4",
            params![
                user_id,
                month.format(MONTH_FORMAT).to_string(),
                amount.to_string(),
                ts,
            ],
        )?;
        info!(user_id, month = %month, %amount, "budget saved");
        self.get_budget(user_id, month)?
            .ok_or_else(|| anyhow::anyhow!("Budget for {month} vanished after save"))
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let id: i64 = row.get(0)?;
    let amount_str: String = row.get(3)?;
    let date_str: String = row.get(5)?;

    let amount = parse_amount(&amount_str);
    if amount.is_none() {
        warn!(expense_id = id, amount = %amount_str, "expense has an invalid amount; counting it as zero");
    }
    let date = NaiveDate::from_str(&date_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Expense {
        id,
        user_id: row.get(1)?,
        title: row.get(2)?,
        amount,
        category: row.get(4)?,
        date,
        is_recurring: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
