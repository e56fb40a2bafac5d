mod schema;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::*;

/// Complete persisted contents of the expense collection.
#[derive(Debug, Clone)]
pub(crate) struct ExpenseSnapshot {
    pub(crate) records: Vec<Expense>,
    /// Next identifier to hand out. Never decreases.
    pub(crate) next_id: i64,
}

/// SQLite-backed snapshot storage. Each collection is written as a whole,
/// inside a single transaction, replacing whatever was there before.
pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let mut db = Self { conn };
        db.migrate()?;
        tracing::debug!(path = %path.display(), "opened expense database");
        Ok(db)
    }

    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Create the schema on first open and record its version. A database
    /// written by a newer schema is refused rather than misread.
    fn migrate(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(schema::SCHEMA_V1)?;
        let version: Option<i32> = tx
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        match version {
            None => {
                tx.execute(
                    "INSERT INTO schema_version (version) VALUES (?1)",
                    params![schema::CURRENT_VERSION],
                )?;
            }
            Some(v) if v > schema::CURRENT_VERSION => {
                return Err(Error::Config(format!(
                    "database schema version {v} is newer than supported version {}",
                    schema::CURRENT_VERSION
                )));
            }
            Some(_) => {}
        }
        tx.commit()?;
        Ok(())
    }

    /// `None` when the snapshot marker is absent, i.e. the collection was never written.
    fn snapshot_next_id(&self, name: &str) -> Result<Option<i64>> {
        Ok(self
            .conn
            .query_row(
                "SELECT next_id FROM snapshots WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?)
    }

    // ── Expenses ──────────────────────────────────────────────

    pub(crate) fn load_expenses(&self) -> Result<Option<ExpenseSnapshot>> {
        let Some(next_id) = self.snapshot_next_id(schema::EXPENSES)? else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT id, amount, category, description, date, created_at
             FROM expenses ORDER BY position",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, amount, category, description, date, created_at) = row?;
            let amount = parse_amount(schema::EXPENSES, &amount)?;
            if amount < Decimal::ZERO || amount > MAX_AMOUNT {
                return Err(corrupt(
                    schema::EXPENSES,
                    format!("amount {amount} out of range"),
                ));
            }
            records.push(Expense {
                id: ExpenseId::from_raw(id),
                amount,
                category: parse_category(schema::EXPENSES, &category)?,
                description,
                date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                    .map_err(|_| corrupt(schema::EXPENSES, format!("bad date '{date}'")))?,
                created_at: DateTime::parse_from_rfc3339(&created_at)
                    .map(|d| d.with_timezone(&Utc))
                    .map_err(|_| {
                        corrupt(schema::EXPENSES, format!("bad timestamp '{created_at}'"))
                    })?,
            });
        }

        if let Some(max) = records.iter().map(|e| e.id.raw()).max() {
            if max >= next_id {
                return Err(corrupt(
                    schema::EXPENSES,
                    format!("id {max} is not below the id counter {next_id}"),
                ));
            }
        }

        Ok(Some(ExpenseSnapshot { records, next_id }))
    }

    pub(crate) fn save_expenses(&mut self, expenses: &[Expense], next_id: i64) -> Result<()> {
        let tx = self.conn.transaction()?;
        write_expenses(&tx, expenses, next_id)?;
        tx.commit()?;
        Ok(())
    }

    // ── Budgets ───────────────────────────────────────────────

    pub(crate) fn load_budgets(&self) -> Result<Option<Vec<Budget>>> {
        if self.snapshot_next_id(schema::BUDGETS)?.is_none() {
            return Ok(None);
        }

        let mut stmt = self
            .conn
            .prepare("SELECT category, month, limit_amount FROM budgets ORDER BY position")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut budgets = Vec::new();
        for row in rows {
            let (category, month, limit) = row?;
            let limit = parse_amount(schema::BUDGETS, &limit)?;
            if limit <= Decimal::ZERO || limit > MAX_AMOUNT {
                return Err(corrupt(
                    schema::BUDGETS,
                    format!("limit {limit} out of range"),
                ));
            }
            budgets.push(Budget {
                category: parse_category(schema::BUDGETS, &category)?,
                month: Month::parse(&month)
                    .ok_or_else(|| corrupt(schema::BUDGETS, format!("bad month '{month}'")))?,
                limit,
            });
        }
        Ok(Some(budgets))
    }

    pub(crate) fn save_budgets(&mut self, budgets: &[Budget]) -> Result<()> {
        let tx = self.conn.transaction()?;
        write_budgets(&tx, budgets)?;
        tx.commit()?;
        Ok(())
    }

    /// Write whichever first snapshots are given in one transaction, so a
    /// fresh database ends up with both collections or neither.
    pub(crate) fn save_initial(
        &mut self,
        expenses: Option<(&[Expense], i64)>,
        budgets: Option<&[Budget]>,
    ) -> Result<()> {
        let tx = self.conn.transaction()?;
        if let Some((records, next_id)) = expenses {
            write_expenses(&tx, records, next_id)?;
        }
        if let Some(budgets) = budgets {
            write_budgets(&tx, budgets)?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn write_expenses(tx: &Transaction<'_>, expenses: &[Expense], next_id: i64) -> Result<()> {
    tx.execute("DELETE FROM expenses", [])?;
    for (position, e) in expenses.iter().enumerate() {
        tx.execute(
            "INSERT INTO expenses (position, id, amount, category, description, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                position as i64,
                e.id.raw(),
                e.amount.to_string(),
                e.category.as_str(),
                e.description,
                e.date.format("%Y-%m-%d").to_string(),
                e.created_at.to_rfc3339(),
            ],
        )?;
    }
    mark_written(tx, schema::EXPENSES, next_id)
}

fn write_budgets(tx: &Transaction<'_>, budgets: &[Budget]) -> Result<()> {
    tx.execute("DELETE FROM budgets", [])?;
    for (position, b) in budgets.iter().enumerate() {
        tx.execute(
            "INSERT INTO budgets (position, category, month, limit_amount)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                position as i64,
                b.category.as_str(),
                b.month.to_string(),
                b.limit.to_string(),
            ],
        )?;
    }
    mark_written(tx, schema::BUDGETS, 1)
}

fn mark_written(tx: &Transaction<'_>, name: &str, next_id: i64) -> Result<()> {
    tx.execute(
        "INSERT INTO snapshots (name, next_id, written_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(name) DO UPDATE SET next_id = ?2, written_at = ?3",
        params![name, next_id, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

fn corrupt(collection: &'static str, reason: String) -> Error {
    Error::CorruptSnapshot { collection, reason }
}

fn parse_amount(collection: &'static str, raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw).map_err(|_| corrupt(collection, format!("bad amount '{raw}'")))
}

fn parse_category(collection: &'static str, raw: &str) -> Result<Category> {
    Category::parse(raw).ok_or_else(|| corrupt(collection, format!("unknown category '{raw}'")))
}
