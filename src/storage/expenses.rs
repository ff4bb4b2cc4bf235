//! Expense repository for JSON storage
//!
//! Manages loading and saving expenses to expenses.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, ExpenseId, UserId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub(crate) struct ExpenseData {
    pub(crate) expenses: Vec<Expense>,
}

/// Newest first: by date, then by creation time, then by id
pub(crate) fn newest_first(a: &Expense, b: &Expense) -> std::cmp::Ordering {
    b.date
        .cmp(&a.date)
        .then(b.created_at.cmp(&a.created_at))
        .then(b.id.cmp(&a.id))
}

/// Repository for expense persistence
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, Expense>>,
}

impl ExpenseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, HashMap<ExpenseId, Expense>>> {
        self.data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> LedgerResult<RwLockWriteGuard<'_, HashMap<ExpenseId, Expense>>> {
        self.data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load expenses from disk
    ///
    /// Records are normalized on the way in so hand-edited files with padded
    /// descriptions or repeated split members behave like CLI-created ones.
    pub fn load(&self) -> LedgerResult<()> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = self.write()?;
        data.clear();

        for mut expense in file_data.expenses {
            expense.normalize();
            data.insert(expense.id.clone(), expense);
        }

        Ok(())
    }

    /// Save expenses to disk, newest first
    pub fn save(&self) -> LedgerResult<()> {
        let expenses = self.get_all()?;
        write_json_atomic(&self.path, &ExpenseData { expenses })
    }

    pub fn get(&self, id: &ExpenseId) -> LedgerResult<Option<Expense>> {
        Ok(self.read()?.get(id).cloned())
    }

    /// All expenses, newest first
    pub fn get_all(&self) -> LedgerResult<Vec<Expense>> {
        let data = self.read()?;
        let mut expenses: Vec<_> = data.values().cloned().collect();
        expenses.sort_by(newest_first);
        Ok(expenses)
    }

    /// Expenses the user paid for or is split into, newest first
    pub fn get_by_user(&self, user: &UserId) -> LedgerResult<Vec<Expense>> {
        let data = self.read()?;
        let mut expenses: Vec<_> = data
            .values()
            .filter(|e| e.is_paid_by(user) || e.involves(user))
            .cloned()
            .collect();
        expenses.sort_by(newest_first);
        Ok(expenses)
    }

    /// How many expenses name the user as payer or participant
    pub fn count_referencing(&self, user: &UserId) -> LedgerResult<usize> {
        Ok(self
            .read()?
            .values()
            .filter(|e| e.is_paid_by(user) || e.involves(user))
            .count())
    }

    pub fn contains(&self, id: &ExpenseId) -> LedgerResult<bool> {
        Ok(self.read()?.contains_key(id))
    }

    /// Insert or update an expense
    pub fn upsert(&self, expense: Expense) -> LedgerResult<()> {
        self.write()?.insert(expense.id.clone(), expense);
        Ok(())
    }

    /// Remove an expense, returning it if present
    pub fn delete(&self, id: &ExpenseId) -> LedgerResult<Option<Expense>> {
        Ok(self.write()?.remove(id))
    }

    pub fn count(&self) -> LedgerResult<usize> {
        Ok(self.read()?.len())
    }
}
