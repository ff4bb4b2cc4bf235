//! Display formatting for terminal output

pub mod balance;
pub mod expense;
pub mod user;

pub use balance::{format_debt_table, format_net_line, format_user_balance};
pub use expense::{format_expense_details, format_expense_list, format_expense_row};
pub use user::{format_user_details, format_user_list};
