//! shareledger - terminal-based shared expense ledger
//!
//! Records who paid for each shared cost and who shares it, then derives
//! pairwise debts and per-user net balances.
//!
//! # Architecture
//!
//! - `models`: typed records (users, expenses, money, balances)
//! - `ledger`: the pure balance engine and net position calculator
//! - `storage`: JSON file storage layer
//! - `services`: business logic, validation and import
//! - `audit`: audit logging system
//! - `export` / `reports`: data export and the group summary
//! - `display` / `cli`: terminal rendering and command handlers
//! - `config`: configuration and path management
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use shareledger::ledger::{compute_balances, net_balance};
//! use shareledger::models::{Expense, Money, User, UserId};
//!
//! let alice = User::with_id(UserId::from_raw("alice"), "Alice");
//! let bob = User::with_id(UserId::from_raw("bob"), "Bob");
//! let date = NaiveDate::from_ymd_opt(2023, 10, 15).unwrap();
//! let dinner = Expense::new(
//!     "Dinner",
//!     Money::from_cents(4000),
//!     date,
//!     alice.id.clone(),
//!     [alice.id.clone(), bob.id.clone()],
//! );
//!
//! let sheet = compute_balances(&[alice.clone(), bob.clone()], &[dinner]).unwrap();
//! assert_eq!(net_balance(&sheet, &alice.id), Money::from_cents(2000));
//! assert_eq!(net_balance(&sheet, &bob.id), Money::from_cents(-2000));
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod ledger;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
