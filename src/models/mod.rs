mod budget;
mod category;
mod expense;
mod month;

pub use budget::Budget;
pub use category::Category;
pub(crate) use expense::validate_amount;
pub use expense::{Expense, ExpenseId, ExpenseUpdate, NewExpense, MAX_AMOUNT};
pub use month::Month;
