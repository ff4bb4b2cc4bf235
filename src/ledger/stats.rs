//! Presentation aggregates
//!
//! Totals shown next to the balances. They are computed straight from the
//! expense list and are independent of the debt graph.

use std::collections::BTreeMap;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, ExpenseCategory, Money, UserId};

/// Sum of all `expense`-type amounts
pub fn total_group_expenses(expenses: &[Expense]) -> LedgerResult<Money> {
    checked_total(
        expenses.iter().filter(|e| e.is_expense()).map(|e| e.amount),
        "group total",
    )
}

/// The user's share of every `expense`-type record they are split into
pub fn user_share(expenses: &[Expense], user: &UserId) -> LedgerResult<Money> {
    expenses
        .iter()
        .filter(|e| e.is_expense() && e.involves(user))
        .try_fold(Money::zero(), |total, e| -> LedgerResult<Money> {
            let share = e
                .share()
                .map_err(|reason| LedgerError::invalid_expense(e.id.as_str(), reason))?;
            total
                .checked_add(share)
                .ok_or_else(|| LedgerError::AmountOverflow(format!("share of {}", user)))
        })
}

/// Sum of `expense`-type amounts the user paid for
pub fn total_paid(expenses: &[Expense], user: &UserId) -> LedgerResult<Money> {
    checked_total(
        expenses
            .iter()
            .filter(|e| e.is_expense() && e.is_paid_by(user))
            .map(|e| e.amount),
        "amount paid",
    )
}

/// Sum of `income`-type amounts recorded against the user
pub fn total_income(expenses: &[Expense], user: &UserId) -> LedgerResult<Money> {
    checked_total(
        expenses
            .iter()
            .filter(|e| !e.is_expense() && e.is_paid_by(user))
            .map(|e| e.amount),
        "income",
    )
}

/// `expense`-type totals per category, only categories with spending
pub fn category_totals(expenses: &[Expense]) -> LedgerResult<BTreeMap<ExpenseCategory, Money>> {
    let mut totals = BTreeMap::new();
    for expense in expenses.iter().filter(|e| e.is_expense()) {
        let total = totals.entry(expense.category).or_insert_with(Money::zero);
        *total = total.checked_add(expense.amount).ok_or_else(|| {
            LedgerError::AmountOverflow(format!("{} total", expense.category))
        })?;
    }
    Ok(totals)
}

fn checked_total(mut amounts: impl Iterator<Item = Money>, what: &str) -> LedgerResult<Money> {
    amounts.try_fold(Money::zero(), |total, amount| {
        total
            .checked_add(amount)
            .ok_or_else(|| LedgerError::AmountOverflow(what.to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseType;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn id(raw: &str) -> UserId {
        UserId::from_raw(raw)
    }

    fn expense(amount: rust_decimal::Decimal, paid_by: &str, split: &[&str]) -> Expense {
        Expense::new(
            "Shared",
            Money::new(amount),
            NaiveDate::from_ymd_opt(2023, 10, 15).unwrap(),
            id(paid_by),
            split.iter().map(|s| id(s)),
        )
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense(dec!(75), "user1", &["user1", "user2", "user3"])
                .with_category(ExpenseCategory::Food),
            expense(dec!(45), "user2", &["user1", "user2", "user3"])
                .with_category(ExpenseCategory::Entertainment),
            expense(dec!(120), "user3", &["user1", "user2", "user3"])
                .with_category(ExpenseCategory::Food),
            expense(dec!(500), "user1", &["user1"]).with_type(ExpenseType::Income),
        ]
    }

    #[test]
    fn test_total_group_expenses_skips_income() {
        assert_eq!(total_group_expenses(&sample()).unwrap(), Money::new(dec!(240)));
    }

    #[test]
    fn test_user_share() {
        assert_eq!(user_share(&sample(), &id("user1")).unwrap(), Money::new(dec!(80)));
        assert_eq!(user_share(&sample(), &id("nobody")).unwrap(), Money::zero());
    }

    #[test]
    fn test_user_share_propagates_invalid_expense() {
        let expenses = vec![expense(dec!(10), "user1", &[])];
        assert_eq!(user_share(&expenses, &id("user1")).unwrap(), Money::zero());

        let mut bad = expense(dec!(10), "user1", &["user1"]);
        bad.amount = Money::zero();
        assert!(matches!(
            user_share(&[bad], &id("user1")),
            Err(LedgerError::InvalidExpense { .. })
        ));
    }

    #[test]
    fn test_total_paid_and_income() {
        let expenses = sample();
        assert_eq!(total_paid(&expenses, &id("user1")).unwrap(), Money::new(dec!(75)));
        assert_eq!(total_income(&expenses, &id("user1")).unwrap(), Money::new(dec!(500)));
        assert_eq!(total_income(&expenses, &id("user2")).unwrap(), Money::zero());
    }

    #[test]
    fn test_category_totals() {
        let totals = category_totals(&sample()).unwrap();
        assert_eq!(totals[&ExpenseCategory::Food], Money::new(dec!(195)));
        assert_eq!(totals[&ExpenseCategory::Entertainment], Money::new(dec!(45)));
        assert!(!totals.contains_key(&ExpenseCategory::Other));
    }

    #[test]
    fn test_totals_report_overflow_instead_of_panicking() {
        let huge = vec![
            expense(rust_decimal::Decimal::MAX, "user1", &["user1", "user2"]),
            expense(rust_decimal::Decimal::MAX, "user1", &["user1", "user2"]),
        ];

        assert!(matches!(
            total_group_expenses(&huge),
            Err(LedgerError::AmountOverflow(_))
        ));
        assert!(matches!(
            total_paid(&huge, &id("user1")),
            Err(LedgerError::AmountOverflow(_))
        ));
        assert!(matches!(
            category_totals(&huge),
            Err(LedgerError::AmountOverflow(_))
        ));
        assert!(matches!(
            user_share(&huge, &id("user2")),
            Err(LedgerError::InvalidExpense { .. })
        ));
        assert_eq!(total_paid(&huge, &id("user2")).unwrap(), Money::zero());
    }
}
