//! SpendIQ: a local personal finance tracker.
//!
//! [`RecordStore`] owns the expense and budget collections and persists each
//! mutation as a full snapshot in SQLite. [`analyze`] derives statistics,
//! trend data and insights from a view of those collections.

pub mod analytics;
pub mod config;
mod db;
pub mod error;
pub mod export;
pub mod import;
pub mod models;
pub mod store;

pub use analytics::{analyze, Analytics, AnalyticsFilter};
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use models::{Budget, Category, Expense, ExpenseId, ExpenseUpdate, Month, NewExpense};
pub use store::RecordStore;
