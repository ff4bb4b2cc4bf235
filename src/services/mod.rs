//! Service layer for shareledger
//!
//! Business logic on top of the storage layer: validation, referential
//! checks, audit logging, and the hand-off to the balance engine.

pub mod balance;
pub mod expense;
pub mod import;
pub mod user;

pub use balance::{BalanceService, DebtEdge, UserBalance};
pub use expense::{
    CreateExpenseInput, ExpenseFilter, ExpenseService, Involvement, UpdateExpenseInput,
};
pub use import::{ImportIssue, ImportResult, ImportService};
pub use user::UserService;
