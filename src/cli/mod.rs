//! CLI command handlers
//!
//! Bridges the clap argument parsing with the service layer.

pub mod balance;
pub mod expense;
pub mod export;
pub mod history;
pub mod import;
pub mod summary;
pub mod user;

pub use balance::{handle_balance_command, BalanceCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportCommands, ExportFormat};
pub use history::handle_history_command;
pub use import::handle_import_command;
pub use summary::handle_summary_command;
pub use user::{handle_user_command, UserCommands};
