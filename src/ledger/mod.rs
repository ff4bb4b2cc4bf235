//! Balance computation
//!
//! The pure core of shareledger. Everything here works on borrowed slices of
//! users and expenses and never touches storage.

pub mod engine;
pub mod net;
pub mod stats;

pub use engine::{
    compute_balances, compute_balances_with, unknown_user_ids, BalanceOptions, UnknownUserPolicy,
};
pub use net::{net_balance, NetPosition};
pub use stats::{category_totals, total_group_expenses, total_income, total_paid, user_share};
