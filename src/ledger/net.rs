//! Net position calculator
//!
//! Reduces one user's debt edges to a single signed figure. Positive means
//! the user is a net creditor, negative a net debtor.

use serde::Serialize;
use std::fmt;

use crate::models::{BalanceSheet, Money, UserId};

/// Total owed to the user minus total the user owes.
///
/// A user with no balance record is financially neutral and nets to zero.
pub fn net_balance(balances: &BalanceSheet, user: &UserId) -> Money {
    balances
        .get(user)
        .map(|balance| balance.total_owed() - balance.total_owes())
        .unwrap_or_default()
}

/// Sign-aware view of a net balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "position", content = "amount", rename_all = "lowercase")]
pub enum NetPosition {
    /// Others owe this user
    Creditor(Money),
    /// This user owes others
    Debtor(Money),
    /// Nothing outstanding either way
    Settled,
}

impl NetPosition {
    /// Classify a net amount; the carried amount is always non-negative
    pub fn from_net(net: Money) -> Self {
        if net.is_positive() {
            Self::Creditor(net)
        } else if net.is_negative() {
            Self::Debtor(net.abs())
        } else {
            Self::Settled
        }
    }

    /// Position of one user in a balance sheet
    pub fn of(balances: &BalanceSheet, user: &UserId) -> Self {
        Self::from_net(net_balance(balances, user))
    }

    /// Magnitude of the position
    pub fn amount(&self) -> Money {
        match self {
            Self::Creditor(amount) | Self::Debtor(amount) => *amount,
            Self::Settled => Money::zero(),
        }
    }

    /// Short label as shown on the dashboard
    pub fn label(&self) -> &'static str {
        match self {
            Self::Creditor(_) => "to receive",
            Self::Debtor(_) => "you owe",
            Self::Settled => "settled up",
        }
    }
}

impl fmt::Display for NetPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.amount(), self.label())
    }
}
