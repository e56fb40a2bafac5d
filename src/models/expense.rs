use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use super::{Category, Month};
use crate::error::{Error, Result};

/// Opaque record identifier. Assigned by the store, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExpenseId(i64);

impl ExpenseId {
    pub(crate) fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    pub(crate) fn raw(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: ExpenseId,
    pub amount: Decimal,
    pub category: Category,
    pub description: String,
    /// Transaction date, distinct from `created_at`.
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub(crate) fn from_new(id: ExpenseId, new: NewExpense, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            amount: new.amount,
            category: new.category,
            description: new.description,
            date: new.date,
            created_at,
        }
    }

    pub fn month(&self) -> Month {
        Month::from_date(self.date)
    }
}

/// Fields supplied by the caller when recording an expense.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub amount: Decimal,
    pub category: Category,
    pub description: String,
    pub date: NaiveDate,
}

impl NewExpense {
    pub fn new(amount: Decimal, category: Category, date: NaiveDate) -> Self {
        Self {
            amount,
            category,
            description: String::new(),
            date,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Build from raw form input. Amount, category and date are required;
    /// the description may be empty.
    pub fn parse(amount: &str, category: &str, description: &str, date: &str) -> Result<Self> {
        let amount = amount.trim();
        if amount.is_empty() {
            return Err(Error::Validation("amount is required".into()));
        }
        let amount = Decimal::from_str(amount)
            .map_err(|_| Error::Validation(format!("amount '{amount}' is not a number")))?;

        let category = Category::parse(category)
            .ok_or_else(|| Error::Validation(format!("unknown category '{}'", category.trim())))?;

        let date = date.trim();
        if date.is_empty() {
            return Err(Error::Validation("date is required".into()));
        }
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| Error::Validation(format!("date '{date}' is not YYYY-MM-DD")))?;

        let new = Self::new(amount, category, date).with_description(description.trim());
        new.validate()?;
        Ok(new)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate_amount(self.amount)
    }
}

/// Partial edit of an existing expense. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseUpdate {
    pub amount: Option<Decimal>,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

impl ExpenseUpdate {
    pub(crate) fn validate(&self) -> Result<()> {
        match self.amount {
            Some(amount) => validate_amount(amount),
            None => Ok(()),
        }
    }

    pub(crate) fn apply_to(&self, expense: &mut Expense) {
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(category) = self.category {
            expense.category = category;
        }
        if let Some(description) = &self.description {
            expense.description = description.clone();
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
    }
}

/// Largest accepted amount or budget limit. Keeps every sum the analytics
/// engine computes far below `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Amounts and limits must lie in `(0, MAX_AMOUNT]`.
pub(crate) fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::Validation(format!(
            "amount must be positive, got {amount}"
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(Error::Validation(format!(
            "amount {amount} exceeds the maximum of {MAX_AMOUNT}"
        )));
    }
    Ok(())
}
