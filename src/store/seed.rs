use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::models::{Budget, Category, Expense, ExpenseId, Month, NewExpense};

/// (cents, category, description, year, month, day), most recent first.
const DEMO_EXPENSES: &[(i64, Category, &str, i32, u32, u32)] = &[
    (4550, Category::Food, "Groceries", 2026, 1, 10),
    (12000, Category::Bills, "Electric bill", 2026, 1, 8),
    (3500, Category::Travel, "Uber rides", 2026, 1, 7),
    (8999, Category::Shopping, "New headphones", 2026, 1, 6),
    (6000, Category::Health, "Gym membership", 2026, 1, 5),
    (2500, Category::Food, "Restaurant dinner", 2026, 1, 4),
    (15000, Category::Shopping, "Winter jacket", 2026, 1, 3),
    (8000, Category::Bills, "Internet", 2026, 1, 2),
    (1500, Category::Others, "Subscription", 2026, 1, 1),
    (20000, Category::Travel, "Flight booking", 2025, 12, 28),
    (5500, Category::Food, "Weekly groceries", 2025, 12, 25),
    (4000, Category::Health, "Vitamins", 2025, 12, 20),
];

pub(crate) fn demo_month() -> Month {
    Month::from_date(ymd(2026, 1, 1))
}

/// Demonstration expenses with ids starting at 1, plus the next free id.
pub(crate) fn demo_expenses(now: DateTime<Utc>) -> (Vec<Expense>, i64) {
    let mut next_id = 1;
    let mut records = Vec::with_capacity(DEMO_EXPENSES.len());
    for &(cents, category, description, y, m, d) in DEMO_EXPENSES {
        let new = NewExpense::new(Decimal::new(cents, 2), category, ymd(y, m, d))
            .with_description(description);
        records.push(Expense::from_new(ExpenseId::from_raw(next_id), new, now));
        next_id += 1;
    }
    (records, next_id)
}

/// One budget per category for the demo month, at each category's default limit.
pub(crate) fn default_budgets() -> Vec<Budget> {
    let month = demo_month();
    Category::all()
        .iter()
        .map(|c| Budget::new(*c, month, c.default_budget()))
        .collect()
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
