pub mod category;
pub mod expense;

pub use category::{Category, NewCategory};
pub use expense::{Expense, NewExpense, OTHER_CATEGORY};
