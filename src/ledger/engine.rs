//! Balance engine
//!
//! Turns a snapshot of users and expenses into a per-user debt map. Pure: no
//! I/O, no shared state, and the inputs are only borrowed.
//!
//! Every debt edge is tracked per ordered pair. If X owes Y 10 from one
//! expense and Y owes X 4 from another, both edges are kept; collapsing them
//! is debt simplification, which this engine does not do.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Balance, BalanceSheet, Expense, Money, User, UserId};

/// What to do with an id that is not in the user set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownUserPolicy {
    /// Drop the edge and keep going
    #[default]
    Ignore,
    /// Fail with `LedgerError::UnknownUser`
    Reject,
}

/// Knobs for balance computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BalanceOptions {
    /// Let income records create debt edges like expenses do
    #[serde(default)]
    pub include_income: bool,

    /// Handling of ids missing from the user set
    #[serde(default)]
    pub unknown_users: UnknownUserPolicy,
}

impl BalanceOptions {
    /// Options that fail on unknown ids instead of dropping edges
    pub fn strict() -> Self {
        Self {
            unknown_users: UnknownUserPolicy::Reject,
            ..Self::default()
        }
    }
}

/// Compute balances with the default options: income excluded, unknown ids
/// ignored.
///
/// # Errors
///
/// Returns `LedgerError::InvalidExpense` for an expense with an empty split
/// group or a non-positive amount.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use shareledger::ledger::{compute_balances, net_balance};
/// use shareledger::models::{Expense, Money, User};
///
/// let alice = User::new("Alice");
/// let bob = User::new("Bob");
/// let dinner = Expense::new(
///     "Dinner",
///     Money::from_cents(4000),
///     NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
///     alice.id.clone(),
///     [alice.id.clone(), bob.id.clone()],
/// );
///
/// let sheet = compute_balances(&[alice.clone(), bob.clone()], &[dinner]).unwrap();
/// assert_eq!(sheet[&bob.id].owes_to(&alice.id), Money::from_cents(2000));
/// assert_eq!(net_balance(&sheet, &alice.id), Money::from_cents(2000));
/// ```
pub fn compute_balances(users: &[User], expenses: &[Expense]) -> LedgerResult<BalanceSheet> {
    compute_balances_with(users, expenses, &BalanceOptions::default())
}

/// Compute balances with explicit options
///
/// Fails like [`compute_balances`], and with `LedgerError::AmountOverflow`
/// if a pair total leaves the `Decimal` range.
///
/// Shares for each ordered pair are collected first and summed in sorted
/// order, so the sheet depends only on the set of expenses, not on the
/// order they are listed in.
pub fn compute_balances_with(
    users: &[User],
    expenses: &[Expense],
    options: &BalanceOptions,
) -> LedgerResult<BalanceSheet> {
    let mut sheet: BalanceSheet = users
        .iter()
        .map(|user| (user.id.clone(), Balance::new()))
        .collect();

    // (debtor, creditor) -> every share owed along that edge
    let mut pair_shares: BTreeMap<(UserId, UserId), Vec<Money>> = BTreeMap::new();

    for expense in expenses {
        if !expense.is_expense() && !options.include_income {
            trace!(expense = %expense.id, "income record skipped");
            continue;
        }

        let share = expense
            .share()
            .map_err(|reason| LedgerError::invalid_expense(expense.id.as_str(), reason))?;

        if options.unknown_users == UnknownUserPolicy::Reject {
            ensure_known(&sheet, expense)?;
        }

        let payer = &expense.paid_by;
        for participant in expense.split_with.iter().filter(|p| *p != payer) {
            if !sheet.contains_key(payer) || !sheet.contains_key(participant) {
                debug!(
                    expense = %expense.id,
                    payer = %payer,
                    participant = %participant,
                    "edge dropped: user not in user set"
                );
                continue;
            }

            pair_shares
                .entry((participant.clone(), payer.clone()))
                .or_default()
                .push(share);
        }
    }

    for ((debtor, creditor), mut shares) in pair_shares {
        shares.sort_unstable();
        let total = Money::checked_sum(&shares).ok_or_else(|| {
            LedgerError::AmountOverflow(format!("debt of {} to {}", debtor, creditor))
        })?;

        if let Some(balance) = sheet.get_mut(&debtor) {
            balance.add_owes(&creditor, total);
        }
        if let Some(balance) = sheet.get_mut(&creditor) {
            balance.add_is_owed(&debtor, total);
        }
    }

    Ok(sheet)
}

fn ensure_known(sheet: &BalanceSheet, expense: &Expense) -> LedgerResult<()> {
    let unknown = std::iter::once(&expense.paid_by)
        .chain(expense.split_with.iter())
        .find(|id| !sheet.contains_key(*id));

    match unknown {
        Some(user_id) => Err(LedgerError::UnknownUser {
            expense_id: expense.id.to_string(),
            user_id: user_id.to_string(),
        }),
        None => Ok(()),
    }
}

/// Ids referenced by expenses that are missing from the user set, sorted
pub fn unknown_user_ids(users: &[User], expenses: &[Expense]) -> Vec<UserId> {
    let known: std::collections::HashSet<&UserId> = users.iter().map(|u| &u.id).collect();
    let mut missing: Vec<UserId> = expenses
        .iter()
        .flat_map(|e| std::iter::once(&e.paid_by).chain(e.split_with.iter()))
        .filter(|id| !known.contains(id))
        .cloned()
        .collect();
    missing.sort();
    missing.dedup();
    missing
}
