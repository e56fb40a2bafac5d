//! The record store: the authoritative expense and budget collections.
//!
//! Every mutation follows the same cycle: copy the in-memory collection,
//! apply the change to the copy, persist the copy as a complete snapshot in
//! one database transaction, and only then swap it in. A failed write leaves
//! both the database and the in-memory state as they were.

mod seed;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::analytics::{self, Analytics, AnalyticsFilter};
use crate::config::StoreConfig;
use crate::db::Database;
use crate::error::Result;
use crate::models::*;

pub struct RecordStore {
    db: Database,
    expenses: Vec<Expense>,
    next_id: i64,
    budgets: Vec<Budget>,
}

impl RecordStore {
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let db = Database::open(&config.db_path)?;
        Self::load(db, config.seed_demo_data)
    }

    pub fn open_in_memory(seed_demo_data: bool) -> Result<Self> {
        Self::load(Database::open_in_memory()?, seed_demo_data)
    }

    /// Load both snapshots. Collections that were never written are seeded
    /// (or initialized empty) and persisted together in one transaction, so
    /// later opens never seed again. Corrupt snapshots are returned as errors.
    fn load(mut db: Database, seed_demo_data: bool) -> Result<Self> {
        let stored_expenses = db.load_expenses()?;
        let stored_budgets = db.load_budgets()?;

        let fresh_expenses = stored_expenses.is_none().then(|| {
            if seed_demo_data {
                seed::demo_expenses(Utc::now())
            } else {
                (Vec::new(), 1)
            }
        });
        let fresh_budgets = stored_budgets.is_none().then(|| {
            if seed_demo_data {
                seed::default_budgets()
            } else {
                Vec::new()
            }
        });

        if fresh_expenses.is_some() || fresh_budgets.is_some() {
            db.save_initial(
                fresh_expenses
                    .as_ref()
                    .map(|(records, next_id)| (records.as_slice(), *next_id)),
                fresh_budgets.as_deref(),
            )?;
            info!(
                expenses = fresh_expenses.as_ref().map(|(r, _)| r.len()),
                budgets = fresh_budgets.as_ref().map(Vec::len),
                "initialized snapshots"
            );
        }

        let (expenses, next_id) = match stored_expenses {
            Some(snapshot) => (snapshot.records, snapshot.next_id),
            None => fresh_expenses.unwrap_or_else(|| (Vec::new(), 1)),
        };
        let budgets = stored_budgets.or(fresh_budgets).unwrap_or_default();

        Ok(Self {
            db,
            expenses,
            next_id,
            budgets,
        })
    }

    // ── Expenses ──────────────────────────────────────────────

    /// All expenses, most recently added first.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn add_expense(&mut self, new: NewExpense) -> Result<Expense> {
        new.validate()?;
        let expense = Expense::from_new(ExpenseId::from_raw(self.next_id), new, Utc::now());

        let mut next = Vec::with_capacity(self.expenses.len() + 1);
        next.push(expense.clone());
        next.extend(self.expenses.iter().cloned());
        self.commit_expenses(next, self.next_id + 1)?;

        debug!(id = %expense.id, amount = %expense.amount, category = %expense.category, "added expense");
        Ok(expense)
    }

    /// Merge `update` into the expense with `id`. Returns `Ok(None)` without
    /// touching storage when no such expense exists.
    pub fn update_expense(
        &mut self,
        id: ExpenseId,
        update: &ExpenseUpdate,
    ) -> Result<Option<Expense>> {
        update.validate()?;
        let Some(index) = self.expenses.iter().position(|e| e.id == id) else {
            debug!(%id, "update of unknown expense ignored");
            return Ok(None);
        };

        let mut next = self.expenses.clone();
        update.apply_to(&mut next[index]);
        let updated = next[index].clone();
        self.commit_expenses(next, self.next_id)?;

        debug!(%id, "updated expense");
        Ok(Some(updated))
    }

    /// Remove the expense with `id`. Deleting an unknown id is a no-op and
    /// returns `false`.
    pub fn delete_expense(&mut self, id: ExpenseId) -> Result<bool> {
        if self.expense(id).is_none() {
            debug!(%id, "delete of unknown expense ignored");
            return Ok(false);
        }

        let next: Vec<Expense> = self
            .expenses
            .iter()
            .filter(|e| e.id != id)
            .cloned()
            .collect();
        self.commit_expenses(next, self.next_id)?;

        debug!(%id, "deleted expense");
        Ok(true)
    }

    /// Insert already-normalized candidates ahead of the existing records,
    /// keeping their order. Nothing is inserted if any candidate is invalid.
    pub fn import_expenses(&mut self, candidates: Vec<NewExpense>) -> Result<usize> {
        for candidate in &candidates {
            candidate.validate()?;
        }
        if candidates.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        let mut next_id = self.next_id;
        let mut next = Vec::with_capacity(candidates.len() + self.expenses.len());
        for candidate in candidates {
            next.push(Expense::from_new(ExpenseId::from_raw(next_id), candidate, now));
            next_id += 1;
        }
        let count = next.len();
        next.extend(self.expenses.iter().cloned());
        self.commit_expenses(next, next_id)?;

        info!(count, "imported expenses");
        Ok(count)
    }

    fn commit_expenses(&mut self, next: Vec<Expense>, next_id: i64) -> Result<()> {
        self.db.save_expenses(&next, next_id)?;
        self.expenses = next;
        self.next_id = next_id;
        Ok(())
    }

    // ── Budgets ───────────────────────────────────────────────

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn get_budget(&self, category: Category, month: Month) -> Option<Decimal> {
        self.budgets
            .iter()
            .find(|b| b.matches(category, month))
            .map(|b| b.limit)
    }

    /// Set the limit for `(category, month)`, replacing any earlier value.
    pub fn update_budget(&mut self, category: Category, limit: Decimal, month: Month) -> Result<()> {
        validate_amount(limit)?;

        let mut next = self.budgets.clone();
        match next.iter_mut().find(|b| b.matches(category, month)) {
            Some(existing) => existing.limit = limit,
            None => next.push(Budget::new(category, month, limit)),
        }
        self.db.save_budgets(&next)?;
        self.budgets = next;

        debug!(%category, %month, %limit, "updated budget");
        Ok(())
    }

    // ── Analytics ─────────────────────────────────────────────

    /// Run the analytics engine over the current collections.
    pub fn analyze(&self, filter: &AnalyticsFilter, today: NaiveDate) -> Analytics {
        analytics::analyze(&self.expenses, &self.budgets, filter, today)
    }
}

#[cfg(test)]
mod tests;
