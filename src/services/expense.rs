//! Expense service
//!
//! Recording, editing and listing shared expenses. Unlike the balance
//! engine, this layer enforces that every referenced user exists.

use chrono::NaiveDate;

use crate::audit::{diff_entities, EntityType};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, ExpenseCategory, ExpenseId, ExpenseType, Money, UserId};
use crate::storage::Storage;

/// How an expense relates to the user a list is filtered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Involvement {
    /// No restriction
    #[default]
    All,
    /// The user paid
    Paid,
    /// The user is in the split group
    Involved,
}

impl Involvement {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(Self::All),
            "paid" => Some(Self::Paid),
            "involved" => Some(Self::Involved),
            _ => None,
        }
    }
}

/// Options for filtering expenses
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub involvement: Involvement,
    /// User the involvement filter applies to
    pub user: Option<UserId>,
    pub category: Option<ExpenseCategory>,
    pub expense_type: Option<ExpenseType>,
    /// Case-insensitive substring of the description
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only expenses the user paid for
    pub fn paid_by(mut self, user: UserId) -> Self {
        self.involvement = Involvement::Paid;
        self.user = Some(user);
        self
    }

    /// Only expenses the user shares
    pub fn involving(mut self, user: UserId) -> Self {
        self.involvement = Involvement::Involved;
        self.user = Some(user);
        self
    }

    pub fn category(mut self, category: ExpenseCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn expense_type(mut self, expense_type: ExpenseType) -> Self {
        self.expense_type = Some(expense_type);
        self
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.search = (!query.trim().is_empty()).then(|| query.trim().to_lowercase());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, expense: &Expense) -> bool {
        let involved = match (&self.involvement, &self.user) {
            (Involvement::Paid, Some(user)) => expense.is_paid_by(user),
            (Involvement::Involved, Some(user)) => expense.involves(user),
            _ => true,
        };

        involved
            && self.category.map_or(true, |c| expense.category == c)
            && self.expense_type.map_or(true, |t| expense.expense_type == t)
            && self
                .search
                .as_ref()
                .map_or(true, |q| expense.description.to_lowercase().contains(q))
    }
}

/// Input for recording a new expense
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub paid_by: UserId,
    pub split_with: Vec<UserId>,
    pub category: ExpenseCategory,
    pub expense_type: ExpenseType,
}

/// Field changes for an existing expense; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct UpdateExpenseInput {
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub paid_by: Option<UserId>,
    pub split_with: Option<Vec<UserId>>,
    pub category: Option<ExpenseCategory>,
    pub expense_type: Option<ExpenseType>,
}

impl UpdateExpenseInput {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.paid_by.is_none()
            && self.split_with.is_none()
            && self.category.is_none()
            && self.expense_type.is_none()
    }
}

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a new expense
    pub fn create(&self, input: CreateExpenseInput) -> LedgerResult<Expense> {
        let expense = Expense::new(
            input.description,
            input.amount,
            input.date,
            input.paid_by,
            input.split_with,
        )
        .with_category(input.category)
        .with_type(input.expense_type);

        self.check(&expense)?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.as_str(),
            Some(expense.description.clone()),
            &expense,
        )?;

        Ok(expense)
    }

    /// Validate shape, then check that every referenced user exists
    fn check(&self, expense: &Expense) -> LedgerResult<()> {
        expense
            .validate()
            .map_err(|reason| LedgerError::invalid_expense(expense.id.as_str(), reason))?;

        for user in std::iter::once(&expense.paid_by).chain(expense.split_with.iter()) {
            if !self.storage.users.contains(user)? {
                return Err(LedgerError::user_not_found(user.as_str()));
            }
        }

        Ok(())
    }

    pub fn get(&self, id: &ExpenseId) -> LedgerResult<Option<Expense>> {
        self.storage.expenses.get(id)
    }

    /// Find an expense by full id or by an unambiguous id prefix
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Expense>> {
        let identifier = identifier.trim();
        if let Some(expense) = self.storage.expenses.get(&ExpenseId::from_raw(identifier))? {
            return Ok(Some(expense));
        }
        if identifier.is_empty() {
            return Ok(None);
        }

        let mut matches: Vec<_> = self
            .storage
            .expenses
            .get_all()?
            .into_iter()
            .filter(|e| e.id.as_str().starts_with(identifier))
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(LedgerError::Validation(format!(
                "'{}' matches {} expenses; use a longer id",
                identifier, n
            ))),
        }
    }

    /// Like `find`, but a miss is an error
    pub fn resolve(&self, identifier: &str) -> LedgerResult<Expense> {
        self.find(identifier)?
            .ok_or_else(|| LedgerError::expense_not_found(identifier))
    }

    /// List expenses newest first
    pub fn list(&self, filter: &ExpenseFilter) -> LedgerResult<Vec<Expense>> {
        let mut expenses = match (&filter.involvement, &filter.user) {
            (Involvement::All, _) | (_, None) => self.storage.expenses.get_all()?,
            (_, Some(user)) => self.storage.expenses.get_by_user(user)?,
        };

        expenses.retain(|e| filter.matches(e));

        if let Some(limit) = filter.limit {
            expenses.truncate(limit);
        }

        Ok(expenses)
    }

    /// Every stored expense, newest first
    pub fn all(&self) -> LedgerResult<Vec<Expense>> {
        self.storage.expenses.get_all()
    }

    /// Apply field changes to an expense
    pub fn update(&self, identifier: &str, changes: UpdateExpenseInput) -> LedgerResult<Expense> {
        let mut expense = self.resolve(identifier)?;
        let before = expense.clone();

        if let Some(description) = changes.description {
            expense.description = description;
        }
        if let Some(amount) = changes.amount {
            expense.amount = amount;
        }
        if let Some(date) = changes.date {
            expense.date = date;
        }
        if let Some(paid_by) = changes.paid_by {
            expense.paid_by = paid_by;
        }
        if let Some(split_with) = changes.split_with {
            expense.split_with = split_with;
        }
        if let Some(category) = changes.category {
            expense.category = category;
        }
        if let Some(expense_type) = changes.expense_type {
            expense.expense_type = expense_type;
        }

        expense.normalize();
        self.check(&expense)?;
        expense.touch();

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_update(
            EntityType::Expense,
            expense.id.as_str(),
            Some(expense.description.clone()),
            &before,
            &expense,
            diff_entities(&before, &expense),
        )?;

        Ok(expense)
    }

    /// Delete an expense
    pub fn delete(&self, identifier: &str) -> LedgerResult<Expense> {
        let expense = self.resolve(identifier)?;

        self.storage.expenses.delete(&expense.id)?;
        self.storage.expenses.save()?;

        self.storage.log_delete(
            EntityType::Expense,
            expense.id.as_str(),
            Some(expense.description.clone()),
            &expense,
        )?;

        Ok(expense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::{ExpenseValidationError, User};
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage, Vec<UserId>) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let ids: Vec<UserId> = ["user1", "user2", "user3"]
            .iter()
            .zip(["Alex", "Blake", "Casey"])
            .map(|(id, name)| {
                let user = User::with_id(UserId::from_raw(*id), name);
                storage.users.upsert(user).unwrap();
                UserId::from_raw(*id)
            })
            .collect();

        (temp_dir, storage, ids)
    }

    fn input(
        description: &str,
        amount: Money,
        day: u32,
        paid_by: &UserId,
        split: &[UserId],
    ) -> CreateExpenseInput {
        CreateExpenseInput {
            description: description.to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(2023, 10, day).unwrap(),
            paid_by: paid_by.clone(),
            split_with: split.to_vec(),
            category: ExpenseCategory::Other,
            expense_type: ExpenseType::Expense,
        }
    }

    #[test]
    fn test_create_expense() {
        let (_temp_dir, storage, users) = create_test_storage();
        let service = ExpenseService::new(&storage);

        let expense = service
            .create(input("Dinner", Money::new(dec!(75)), 15, &users[0], &users))
            .unwrap();

        assert_eq!(expense.split_with.len(), 3);
        assert_eq!(storage.expenses.count().unwrap(), 1);
        assert_eq!(storage.audit().read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_create_rejects_invalid_expenses() {
        let (_temp_dir, storage, users) = create_test_storage();
        let service = ExpenseService::new(&storage);

        match service
            .create(input("Dinner", Money::new(dec!(75)), 15, &users[0], &[]))
            .unwrap_err()
        {
            LedgerError::InvalidExpense { reason, .. } => {
                assert_eq!(reason, ExpenseValidationError::EmptySplitGroup)
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(matches!(
            service.create(input("Dinner", Money::zero(), 15, &users[0], &users)),
            Err(LedgerError::InvalidExpense { .. })
        ));

        let ghost = UserId::from_raw("ghost");
        assert!(service
            .create(input("Dinner", Money::new(dec!(10)), 15, &ghost, &users))
            .unwrap_err()
            .is_not_found());

        assert_eq!(storage.expenses.count().unwrap(), 0);
    }

    #[test]
    fn test_list_filters() {
        let (_temp_dir, storage, users) = create_test_storage();
        let service = ExpenseService::new(&storage);

        let mut dinner = input(
            "Dinner at Italian Restaurant",
            Money::new(dec!(75)),
            15,
            &users[0],
            &users,
        );
        dinner.category = ExpenseCategory::Food;
        service.create(dinner).unwrap();

        let mut movie = input("Movie tickets", Money::new(dec!(45)), 18, &users[1], &users[..2]);
        movie.category = ExpenseCategory::Entertainment;
        service.create(movie).unwrap();

        let mut salary = input("Salary", Money::new(dec!(500)), 20, &users[2], &users[2..]);
        salary.expense_type = ExpenseType::Income;
        service.create(salary).unwrap();

        let all = service.list(&ExpenseFilter::new()).unwrap();
        let descriptions: Vec<_> = all.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec!["Salary", "Movie tickets", "Dinner at Italian Restaurant"]
        );

        let paid = service
            .list(&ExpenseFilter::new().paid_by(users[1].clone()))
            .unwrap();
        assert_eq!(paid.len(), 1);

        let involved = service
            .list(&ExpenseFilter::new().involving(users[2].clone()))
            .unwrap();
        assert_eq!(involved.len(), 2);

        let food = service
            .list(&ExpenseFilter::new().category(ExpenseCategory::Food))
            .unwrap();
        assert_eq!(food.len(), 1);

        let searched = service.list(&ExpenseFilter::new().search("ITALIAN")).unwrap();
        assert_eq!(searched[0].description, "Dinner at Italian Restaurant");

        let income = service
            .list(&ExpenseFilter::new().expense_type(ExpenseType::Income))
            .unwrap();
        assert_eq!(income.len(), 1);

        assert_eq!(service.list(&ExpenseFilter::new().limit(2)).unwrap().len(), 2);
    }

    #[test]
    fn test_update_expense() {
        let (_temp_dir, storage, users) = create_test_storage();
        let service = ExpenseService::new(&storage);
        let expense = service
            .create(input("Dinner", Money::new(dec!(75)), 15, &users[0], &users))
            .unwrap();

        let updated = service
            .update(
                expense.id.as_str(),
                UpdateExpenseInput {
                    amount: Some(Money::new(dec!(90))),
                    split_with: Some(vec![users[0].clone(), users[1].clone(), users[1].clone()]),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.amount, Money::new(dec!(90)));
        assert_eq!(updated.split_with.len(), 2);

        let entries = storage.audit().read_all().unwrap();
        assert!(entries[1]
            .diff_summary
            .as_deref()
            .unwrap()
            .contains("amount"));

        let rejected = service.update(
            expense.id.as_str(),
            UpdateExpenseInput {
                split_with: Some(vec![]),
                ..Default::default()
            },
        );
        assert!(matches!(rejected, Err(LedgerError::InvalidExpense { .. })));
        assert_eq!(
            service.get(&expense.id).unwrap().unwrap().split_with.len(),
            2
        );
    }

    #[test]
    fn test_find_by_prefix_and_delete() {
        let (_temp_dir, storage, users) = create_test_storage();
        let service = ExpenseService::new(&storage);
        let expense = service
            .create(input("Dinner", Money::new(dec!(75)), 15, &users[0], &users))
            .unwrap();

        let prefix = &expense.id.as_str()[..10];
        assert_eq!(service.resolve(prefix).unwrap().id, expense.id);

        service.delete(prefix).unwrap();
        assert!(service.find(expense.id.as_str()).unwrap().is_none());
        assert!(service.resolve("exp-missing").unwrap_err().is_not_found());
    }
}
