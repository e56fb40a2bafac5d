//! Heuristic, human-readable observations derived from one query's stats.
//!
//! Rules run in a fixed priority order and the result is truncated to
//! `MAX_INSIGHTS`: month-over-month change, over-budget categories,
//! dominant category, good savings.

use rust_decimal::{Decimal, RoundingStrategy};

use super::{percent_of, sum_amounts, MonthlyStats};
use crate::models::Expense;

pub const MAX_INSIGHTS: usize = 4;

/// Month-over-month change (in percent) that must be exceeded either way.
const CHANGE_THRESHOLD: Decimal = Decimal::TEN;
/// Share of total spending above which the top category is called out.
const DOMINANT_SHARE: i64 = 40;
/// Savings ratio above which the user is congratulated.
const SAVINGS_TARGET: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsightKind {
    Positive,
    Negative,
    Neutral,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for InsightKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insight {
    /// Stable key, e.g. `spending-increase` or `over-budget-Food`.
    pub id: String,
    pub kind: InsightKind,
    pub message: String,
    pub icon: &'static str,
}

impl Insight {
    fn new(id: impl Into<String>, kind: InsightKind, message: String, icon: &'static str) -> Self {
        Self {
            id: id.into(),
            kind,
            message,
            icon,
        }
    }
}

pub(crate) fn generate(expenses: &[Expense], stats: &MonthlyStats) -> Vec<Insight> {
    let mut insights = Vec::new();
    insights.extend(month_over_month(expenses, stats));
    insights.extend(over_budget(stats));
    insights.extend(dominant_category(stats));
    insights.extend(good_savings(stats));
    insights.truncate(MAX_INSIGHTS);
    insights
}

/// Compares the query total with every expense of the previous calendar month.
fn month_over_month(expenses: &[Expense], stats: &MonthlyStats) -> Option<Insight> {
    let previous = stats.month.previous();
    let previous_total = sum_amounts(expenses.iter().filter(|e| previous.contains(e.date)));
    if previous_total <= Decimal::ZERO || stats.total_spending <= Decimal::ZERO {
        return None;
    }

    let change = percent_of(
        stats.total_spending.saturating_sub(previous_total),
        previous_total,
    );
    if change > CHANGE_THRESHOLD {
        Some(Insight::new(
            "spending-increase",
            InsightKind::Negative,
            format!(
                "Spending is up {}% compared to last month",
                whole_percent(change)
            ),
            "📈",
        ))
    } else if change < -CHANGE_THRESHOLD {
        Some(Insight::new(
            "spending-decrease",
            InsightKind::Positive,
            format!(
                "Great! You've reduced spending by {}% this month",
                whole_percent(change.abs())
            ),
            "💰",
        ))
    } else {
        None
    }
}

fn over_budget(stats: &MonthlyStats) -> impl Iterator<Item = Insight> + '_ {
    stats.category_breakdown.iter().filter_map(|summary| {
        let limit = summary.budget.filter(|_| summary.is_over_budget)?;
        let over_by = percent_of(summary.total.saturating_sub(limit), limit);
        Some(Insight::new(
            format!("over-budget-{}", summary.category),
            InsightKind::Negative,
            format!(
                "{} is {}% over budget",
                summary.category,
                whole_percent(over_by)
            ),
            "⚠️",
        ))
    })
}

fn dominant_category(stats: &MonthlyStats) -> Option<Insight> {
    let top = stats.category_breakdown.first()?;
    if top.percentage <= Decimal::from(DOMINANT_SHARE) {
        return None;
    }
    Some(Insight::new(
        "top-category",
        InsightKind::Neutral,
        format!(
            "{} accounts for {}% of your spending",
            top.category,
            whole_percent(top.percentage)
        ),
        "📊",
    ))
}

fn good_savings(stats: &MonthlyStats) -> Option<Insight> {
    if stats.savings_ratio <= Decimal::from(SAVINGS_TARGET) {
        return None;
    }
    Some(Insight::new(
        "good-savings",
        InsightKind::Positive,
        format!(
            "You're on track to save {}% of your budget!",
            whole_percent(stats.savings_ratio)
        ),
        "🎯",
    ))
}

/// Round to a whole number, halves away from zero.
fn whole_percent(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}
