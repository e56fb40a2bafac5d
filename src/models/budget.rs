use rust_decimal::Decimal;

use super::{Category, Month};

/// Spending ceiling for one category in one month. `(category, month)` is unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    pub category: Category,
    pub month: Month,
    pub limit: Decimal,
}

impl Budget {
    pub fn new(category: Category, month: Month, limit: Decimal) -> Self {
        Self {
            category,
            month,
            limit,
        }
    }

    pub fn matches(&self, category: Category, month: Month) -> bool {
        self.category == category && self.month == month
    }
}
