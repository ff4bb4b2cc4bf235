//! Balance service
//!
//! Takes a snapshot of the stored users and expenses and hands it to the
//! pure balance engine with the options from settings.

use serde::Serialize;
use tracing::warn;

use crate::config::settings::Settings;
use crate::error::LedgerResult;
use crate::ledger::{
    self, compute_balances_with, net_balance, unknown_user_ids, BalanceOptions, NetPosition,
};
use crate::models::{BalanceSheet, Expense, Money, User, UserId};
use crate::storage::Storage;

/// One directed debt between two named users
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebtEdge {
    pub debtor: UserId,
    pub debtor_name: String,
    pub creditor: UserId,
    pub creditor_name: String,
    pub amount: Money,
}

/// A user's full position
#[derive(Debug, Clone, Serialize)]
pub struct UserBalance {
    pub user: User,
    /// What this user owes, per creditor
    pub owes: Vec<DebtEdge>,
    /// What others owe this user, per debtor
    pub owed: Vec<DebtEdge>,
    pub net: Money,
    pub position: NetPosition,
}

/// Service for balance queries
pub struct BalanceService<'a> {
    storage: &'a Storage,
}

impl<'a> BalanceService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Engine options from settings
    pub fn options(&self) -> LedgerResult<BalanceOptions> {
        Ok(Settings::load_or_create(self.storage.paths())?.balance)
    }

    fn snapshot(&self) -> LedgerResult<(Vec<User>, Vec<Expense>)> {
        Ok((
            self.storage.users.get_all()?,
            self.storage.expenses.get_all()?,
        ))
    }

    /// Compute the balance sheet for the whole group
    pub fn balances(&self) -> LedgerResult<BalanceSheet> {
        let options = self.options()?;
        let (users, expenses) = self.snapshot()?;

        let unknown = unknown_user_ids(&users, &expenses);
        if !unknown.is_empty() {
            warn!(count = unknown.len(), ids = ?unknown, "expenses reference unknown users");
        }

        compute_balances_with(&users, &expenses, &options)
    }

    /// Net balance of one user; zero for ids without activity
    pub fn net_balance(&self, user: &UserId) -> LedgerResult<Money> {
        Ok(net_balance(&self.balances()?, user))
    }

    /// Every user with their net balance, in user order
    pub fn nets(&self) -> LedgerResult<Vec<(User, Money)>> {
        let sheet = self.balances()?;
        Ok(self
            .storage
            .users
            .get_all()?
            .into_iter()
            .map(|user| {
                let net = net_balance(&sheet, &user.id);
                (user, net)
            })
            .collect())
    }

    /// Full position of one user, with counterparty names resolved
    pub fn user_balance(&self, user: &User) -> LedgerResult<UserBalance> {
        let sheet = self.balances()?;
        let edges = self.edges_from(&sheet)?;

        let owes = edges
            .iter()
            .filter(|e| e.debtor == user.id)
            .cloned()
            .collect();
        let owed = edges
            .iter()
            .filter(|e| e.creditor == user.id)
            .cloned()
            .collect();
        let net = net_balance(&sheet, &user.id);

        Ok(UserBalance {
            user: user.clone(),
            owes,
            owed,
            net,
            position: NetPosition::from_net(net),
        })
    }

    /// Every debt edge in the group, ordered by debtor then creditor
    pub fn edges(&self) -> LedgerResult<Vec<DebtEdge>> {
        let sheet = self.balances()?;
        self.edges_from(&sheet)
    }

    fn edges_from(&self, sheet: &BalanceSheet) -> LedgerResult<Vec<DebtEdge>> {
        let users = self.storage.users.get_all()?;
        let name_of = |id: &UserId| {
            users
                .iter()
                .find(|u| &u.id == id)
                .map(|u| u.name.clone())
                .unwrap_or_else(|| id.to_string())
        };

        let mut edges = Vec::new();
        for (debtor, balance) in sheet {
            for (creditor, amount) in &balance.owes {
                edges.push(DebtEdge {
                    debtor: debtor.clone(),
                    debtor_name: name_of(debtor),
                    creditor: creditor.clone(),
                    creditor_name: name_of(creditor),
                    amount: *amount,
                });
            }
        }
        Ok(edges)
    }

    /// Share of group spending borne by the user
    pub fn user_share(&self, user: &UserId) -> LedgerResult<Money> {
        ledger::user_share(&self.storage.expenses.get_all()?, user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::error::LedgerError;
    use crate::ledger::UnknownUserPolicy;
    use crate::models::ExpenseType;
    use crate::storage::initialize_storage;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn sample_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths, true).unwrap();
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn id(raw: &str) -> UserId {
        UserId::from_raw(raw)
    }

    #[test]
    fn test_sample_group_nets() {
        let (_temp_dir, storage) = sample_storage();
        let service = BalanceService::new(&storage);

        // 75 / 45 / 120 split three ways: shares 25, 15, 40
        assert_eq!(service.net_balance(&id("user1")).unwrap(), Money::new(dec!(-5)));
        assert_eq!(service.net_balance(&id("user2")).unwrap(), Money::new(dec!(-35)));
        assert_eq!(service.net_balance(&id("user3")).unwrap(), Money::new(dec!(40)));

        let total: Money = service.nets().unwrap().iter().map(|(_, net)| *net).sum();
        assert!(total.is_zero());
    }

    #[test]
    fn test_user_balance_lists_both_directions() {
        let (_temp_dir, storage) = sample_storage();
        let service = BalanceService::new(&storage);
        let alex = storage.users.get(&id("user1")).unwrap().unwrap();

        let position = service.user_balance(&alex).unwrap();
        let owes: Vec<_> = position
            .owes
            .iter()
            .map(|e| (e.creditor_name.as_str(), e.amount))
            .collect();
        assert_eq!(
            owes,
            vec![("Blake", Money::new(dec!(15))), ("Casey", Money::new(dec!(40)))]
        );
        assert_eq!(position.owed.len(), 2);
        assert_eq!(position.position, NetPosition::Debtor(Money::new(dec!(5))));

        assert_eq!(service.edges().unwrap().len(), 6);
        assert_eq!(service.user_share(&alex.id).unwrap(), Money::new(dec!(80)));
    }

    #[test]
    fn test_settings_options_are_applied() {
        let (_temp_dir, storage) = sample_storage();
        storage
            .expenses
            .upsert(
                Expense::new(
                    "Refund",
                    Money::new(dec!(30)),
                    NaiveDate::from_ymd_opt(2023, 10, 21).unwrap(),
                    id("user1"),
                    [id("user1"), id("ghost")],
                )
                .with_type(ExpenseType::Income),
            )
            .unwrap();

        let service = BalanceService::new(&storage);
        assert_eq!(service.net_balance(&id("user1")).unwrap(), Money::new(dec!(-5)));

        let mut settings = Settings::load_or_create(storage.paths()).unwrap();
        settings.balance.include_income = true;
        settings.balance.unknown_users = UnknownUserPolicy::Reject;
        settings.save(storage.paths()).unwrap();

        assert!(matches!(
            service.balances(),
            Err(LedgerError::UnknownUser { .. })
        ));
    }
}
