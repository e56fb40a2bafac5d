//! Spending analytics: a pure function from (expenses, budgets, filter, today)
//! to totals, a per-category breakdown, a monthly trend and insights.
//!
//! Nothing here holds state between calls. "Today" is passed in so that the
//! effective month is deterministic.

mod insights;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::models::{Budget, Category, Expense, Month};

pub use insights::{Insight, InsightKind, MAX_INSIGHTS};

/// Number of most recent months kept in the trend series.
pub const TREND_MONTHS: usize = 6;

/// Query constraints. Unset fields do not constrain; set fields are AND-combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyticsFilter {
    pub month: Option<Month>,
    pub year: Option<i32>,
    pub category: Option<Category>,
}

impl AnalyticsFilter {
    pub fn with_month(mut self, month: Month) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        self.month.map_or(true, |m| m.contains(expense.date))
            && self.year.map_or(true, |y| expense.month().year() == y)
            && self.category.map_or(true, |c| expense.category == c)
    }

    /// Month used for budget lookups: the filter's month, else today's.
    pub fn effective_month(&self, today: NaiveDate) -> Month {
        self.month.unwrap_or_else(|| Month::from_date(today))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category: Category,
    pub total: Decimal,
    pub count: usize,
    /// Share of the query's total spending, 0 when nothing was spent.
    pub percentage: Decimal,
    pub budget: Option<Decimal>,
    pub is_over_budget: bool,
}

impl CategorySummary {
    /// Progress toward the budget, capped at 100. 0 without a budget.
    pub fn budget_used_percent(&self) -> Decimal {
        match self.budget {
            Some(limit) => percent_of(self.total, limit).min(Decimal::ONE_HUNDRED),
            None => Decimal::ZERO,
        }
    }

    /// Budget left over (negative once overspent). `None` without a budget.
    pub fn remaining(&self) -> Option<Decimal> {
        self.budget.map(|limit| limit.saturating_sub(self.total))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyStats {
    pub month: Month,
    pub total_spending: Decimal,
    /// All six categories, highest total first.
    pub category_breakdown: Vec<CategorySummary>,
    pub highest_category: Category,
    pub savings_ratio: Decimal,
    pub budget_vs_actual: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub month: Month,
    pub amount: Decimal,
}

impl TrendPoint {
    pub fn label(&self) -> String {
        self.month.label()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analytics {
    pub filtered_expenses: Vec<Expense>,
    pub stats: MonthlyStats,
    pub total_budget: Decimal,
    pub monthly_trend: Vec<TrendPoint>,
    pub insights: Vec<Insight>,
}

pub fn analyze(
    expenses: &[Expense],
    budgets: &[Budget],
    filter: &AnalyticsFilter,
    today: NaiveDate,
) -> Analytics {
    let month = filter.effective_month(today);
    let filtered_expenses: Vec<Expense> = expenses
        .iter()
        .filter(|e| filter.matches(e))
        .cloned()
        .collect();

    let total_spending = sum_amounts(&filtered_expenses);
    let category_breakdown = category_breakdown(&filtered_expenses, total_spending, budgets, month);
    let highest_category = highest_category(&category_breakdown);
    let total_budget = total_budget(budgets, month);

    let stats = MonthlyStats {
        month,
        total_spending,
        highest_category,
        savings_ratio: savings_ratio(total_budget, total_spending),
        budget_vs_actual: percent_of(total_spending, total_budget),
        category_breakdown,
    };

    Analytics {
        insights: insights::generate(expenses, &stats),
        monthly_trend: monthly_trend(expenses),
        filtered_expenses,
        stats,
        total_budget,
    }
}

/// Saturates at `Decimal::MAX` instead of overflowing.
pub(crate) fn sum_amounts<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Decimal {
    expenses
        .into_iter()
        .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount))
}

/// `part / whole * 100`, or 0 when `whole` is 0 or the result does not fit.
fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

fn category_breakdown(
    filtered: &[Expense],
    total_spending: Decimal,
    budgets: &[Budget],
    month: Month,
) -> Vec<CategorySummary> {
    let mut breakdown: Vec<CategorySummary> = Category::all()
        .iter()
        .map(|&category| {
            let matching = filtered.iter().filter(|e| e.category == category);
            let total = sum_amounts(matching.clone());
            let budget = budgets
                .iter()
                .find(|b| b.matches(category, month))
                .map(|b| b.limit);
            CategorySummary {
                category,
                total,
                count: matching.count(),
                percentage: percent_of(total, total_spending),
                budget,
                is_over_budget: budget.is_some_and(|limit| total > limit),
            }
        })
        .collect();

    // Stable: equal totals keep category order.
    breakdown.sort_by(|a, b| b.total.cmp(&a.total));
    breakdown
}

fn highest_category(breakdown: &[CategorySummary]) -> Category {
    if breakdown.iter().all(|c| c.total.is_zero()) {
        return Category::Others;
    }
    breakdown
        .first()
        .map(|c| c.category)
        .unwrap_or(Category::Others)
}

/// Sum of every category's limit in `month`, regardless of any category filter.
fn total_budget(budgets: &[Budget], month: Month) -> Decimal {
    budgets
        .iter()
        .filter(|b| b.month == month)
        .fold(Decimal::ZERO, |acc, b| acc.saturating_add(b.limit))
}

fn savings_ratio(total_budget: Decimal, total_spending: Decimal) -> Decimal {
    percent_of(total_budget.saturating_sub(total_spending), total_budget).max(Decimal::ZERO)
}

/// Per-month totals over every expense, oldest first, last `TREND_MONTHS` months with data.
fn monthly_trend(expenses: &[Expense]) -> Vec<TrendPoint> {
    let mut by_month: BTreeMap<Month, Decimal> = BTreeMap::new();
    for e in expenses {
        let total = by_month.entry(e.month()).or_default();
        *total = total.saturating_add(e.amount);
    }
    let skip = by_month.len().saturating_sub(TREND_MONTHS);
    by_month
        .into_iter()
        .skip(skip)
        .map(|(month, amount)| TrendPoint { month, amount })
        .collect()
}
