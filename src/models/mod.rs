//! Core data models for shareledger
//!
//! Users, the expenses they share, and the derived balance records.

pub mod balance;
pub mod expense;
pub mod ids;
pub mod money;
pub mod user;

pub use balance::{Balance, BalanceSheet};
pub use expense::{Expense, ExpenseCategory, ExpenseType, ExpenseValidationError};
pub use ids::{ExpenseId, UserId};
pub use money::{Money, MoneyParseError};
pub use user::{User, UserValidationError};
