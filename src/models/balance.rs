//! Balance model
//!
//! Derived per-user debt records. Never persisted: a balance sheet is rebuilt
//! from the expense set every time it is needed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ids::UserId;
use super::money::Money;

/// One user's debt edges, keyed by counterparty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Counterparty -> amount this user owes them
    pub owes: BTreeMap<UserId, Money>,

    /// Counterparty -> amount they owe this user
    pub is_owed: BTreeMap<UserId, Money>,
}

impl Balance {
    /// An empty balance (no recorded debt relationships)
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of everything this user owes
    pub fn total_owes(&self) -> Money {
        self.owes.values().sum()
    }

    /// Sum of everything owed to this user
    pub fn total_owed(&self) -> Money {
        self.is_owed.values().sum()
    }

    /// Amount this user owes one counterparty (zero when no edge exists)
    pub fn owes_to(&self, counterparty: &UserId) -> Money {
        self.owes.get(counterparty).copied().unwrap_or_default()
    }

    /// Amount one counterparty owes this user (zero when no edge exists)
    pub fn owed_by(&self, counterparty: &UserId) -> Money {
        self.is_owed.get(counterparty).copied().unwrap_or_default()
    }

    /// No debt relationships in either direction
    pub fn is_empty(&self) -> bool {
        self.owes.is_empty() && self.is_owed.is_empty()
    }

    pub(crate) fn add_owes(&mut self, counterparty: &UserId, amount: Money) {
        *self.owes.entry(counterparty.clone()).or_default() += amount;
    }

    pub(crate) fn add_is_owed(&mut self, counterparty: &UserId, amount: Money) {
        *self.is_owed.entry(counterparty.clone()).or_default() += amount;
    }
}

/// Balances for every known user, keyed by user id
pub type BalanceSheet = BTreeMap<UserId, Balance>;
