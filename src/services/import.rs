//! JSON snapshot import
//!
//! Reads `{ "users": [...], "expenses": [...] }` files, either exported by
//! this tool or in the older browser-storage layout (camelCase keys, numeric
//! amounts, ISO timestamps, a `splitWith` that is sometimes a bare string).
//! Loose records are normalised here, at the boundary, so everything stored
//! has the strict `Expense` shape.

use std::collections::HashSet;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::audit::{AuditEntry, EntityType};
use crate::error::{LedgerError, LedgerResult};
use crate::models::expense::parse_date;
use crate::models::{Expense, ExpenseCategory, ExpenseId, ExpenseType, Money, User, UserId};
use crate::storage::Storage;

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    users: Vec<RawUser>,
    #[serde(default)]
    expenses: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawExpense {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    amount: Value,
    #[serde(default)]
    date: Option<String>,
    #[serde(default, alias = "paidBy")]
    paid_by: Option<String>,
    #[serde(default, alias = "splitWith")]
    split_with: Value,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, rename = "type")]
    expense_type: Option<String>,
}

/// A record that could not be imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportIssue {
    /// Record id, or its position when it has none
    pub record: String,
    pub message: String,
}

enum PreparedUser {
    New(User),
    /// Id already stored
    Duplicate,
    Invalid(String),
}

/// What an import did (or would do, for a dry run)
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub users_imported: usize,
    pub expenses_imported: usize,
    pub duplicates_skipped: usize,
    pub errors: Vec<ImportIssue>,
}

impl ImportResult {
    pub fn imported(&self) -> usize {
        self.users_imported + self.expenses_imported
    }
}

/// Turn one loosely shaped expense record into a strict one
pub fn normalize_expense(value: &Value) -> Result<Expense, String> {
    let raw: RawExpense =
        serde_json::from_value(value.clone()).map_err(|e| format!("malformed record: {}", e))?;

    let amount = parse_amount(&raw.amount)?;

    let date = raw
        .date
        .as_deref()
        .ok_or_else(|| "missing date".to_string())
        .and_then(|d| parse_date(d).ok_or_else(|| format!("invalid date '{}'", d)))?;

    let paid_by = raw
        .paid_by
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| "missing paidBy".to_string())?;

    let split_with = parse_split_group(&raw.split_with)?;

    let category = match raw.category.as_deref() {
        None => ExpenseCategory::default(),
        Some(c) => ExpenseCategory::parse(c).unwrap_or_else(|| {
            warn!(category = c, "unknown category, using 'other'");
            ExpenseCategory::Other
        }),
    };

    let expense_type = match raw.expense_type.as_deref() {
        None => ExpenseType::default(),
        Some(t) => ExpenseType::parse(t).ok_or_else(|| format!("unknown type '{}'", t))?,
    };

    let mut expense = Expense::new(
        raw.description.unwrap_or_default(),
        amount,
        date,
        UserId::from_raw(paid_by.trim()),
        split_with,
    )
    .with_category(category)
    .with_type(expense_type);

    if let Some(id) = raw.id.filter(|id| !id.trim().is_empty()) {
        expense = expense.with_id(ExpenseId::from_raw(id.trim()));
    }

    expense.validate().map_err(|e| e.to_string())?;
    Ok(expense)
}

fn parse_amount(value: &Value) -> Result<Money, String> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map(Money::new)
                .map_err(|_| format!("invalid amount {}", text))
        }
        Value::String(s) => Money::parse(s).map_err(|e| e.to_string()),
        Value::Null => Err("missing amount".to_string()),
        other => Err(format!("invalid amount {}", other)),
    }
}

/// `splitWith` as a list of ids, or a single id string
fn parse_split_group(value: &Value) -> Result<Vec<UserId>, String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Ok(vec![UserId::from_raw(s.trim())]),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Ok(UserId::from_raw(s.trim())),
                other => Err(format!("splitWith entry {} is not a user id", other)),
            })
            .collect(),
        Value::Null => Err("missing splitWith".to_string()),
        other => Err(format!("splitWith must be a list of user ids, got {}", other)),
    }
}

fn record_label(value: &Value, index: usize) -> String {
    value
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{}", index + 1))
}

/// Service for snapshot import
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Import a snapshot; with `dry_run` nothing is written
    pub fn import_json(&self, contents: &str, dry_run: bool) -> LedgerResult<ImportResult> {
        let snapshot: RawSnapshot = serde_json::from_str(contents)
            .map_err(|e| LedgerError::Import(format!("Not a ledger snapshot: {}", e)))?;

        let mut result = ImportResult::default();
        let mut audit = Vec::new();

        let mut known: HashSet<UserId> = self
            .storage
            .users
            .get_all()?
            .into_iter()
            .map(|u| u.id)
            .collect();

        let mut new_users = Vec::new();
        for (index, raw) in snapshot.users.into_iter().enumerate() {
            let label = raw.id.clone().unwrap_or_else(|| format!("#{}", index + 1));
            match self.prepare_user(raw)? {
                PreparedUser::New(user) if known.insert(user.id.clone()) => new_users.push(user),
                PreparedUser::New(_) | PreparedUser::Duplicate => result.duplicates_skipped += 1,
                PreparedUser::Invalid(message) => result.errors.push(ImportIssue {
                    record: label,
                    message,
                }),
            }
        }

        let mut new_expenses = Vec::new();
        let mut seen = HashSet::new();
        for (index, value) in snapshot.expenses.iter().enumerate() {
            let label = record_label(value, index);
            match normalize_expense(value) {
                Ok(expense) => {
                    if self.storage.expenses.contains(&expense.id)?
                        || !seen.insert(expense.id.clone())
                    {
                        debug!(expense = %expense.id, "duplicate expense skipped");
                        result.duplicates_skipped += 1;
                        continue;
                    }
                    let unknown = std::iter::once(&expense.paid_by)
                        .chain(expense.split_with.iter())
                        .find(|id| !known.contains(*id));
                    match unknown {
                        Some(user) => result.errors.push(ImportIssue {
                            record: label,
                            message: format!("references unknown user '{}'", user),
                        }),
                        None => new_expenses.push(expense),
                    }
                }
                Err(message) => result.errors.push(ImportIssue {
                    record: label,
                    message,
                }),
            }
        }

        result.users_imported = new_users.len();
        result.expenses_imported = new_expenses.len();

        if dry_run {
            return Ok(result);
        }

        for user in new_users {
            audit.push(AuditEntry::create(
                EntityType::User,
                user.id.as_str(),
                Some(user.name.clone()),
                &user,
            ));
            self.storage.users.upsert(user)?;
        }
        for expense in new_expenses {
            audit.push(AuditEntry::create(
                EntityType::Expense,
                expense.id.as_str(),
                Some(expense.description.clone()),
                &expense,
            ));
            self.storage.expenses.upsert(expense)?;
        }

        if !audit.is_empty() {
            self.storage.save_all()?;
            self.storage.log_batch(&audit)?;
        }

        Ok(result)
    }

    fn prepare_user(&self, raw: RawUser) -> LedgerResult<PreparedUser> {
        let name = raw.name.trim().to_string();
        let mut user = User::new(&name);
        if let Some(id) = raw.id.filter(|id| !id.trim().is_empty()) {
            user.id = UserId::from_raw(id.trim());
        }
        if let Some(avatar) = raw.avatar {
            user.avatar = Some(avatar);
        }

        if self.storage.users.contains(&user.id)? {
            return Ok(PreparedUser::Duplicate);
        }
        if self.storage.users.get_by_name(&name)?.is_some() {
            return Ok(PreparedUser::Invalid(format!(
                "a user named '{}' already exists",
                name
            )));
        }
        if let Err(e) = user.validate() {
            return Ok(PreparedUser::Invalid(e.to_string()));
        }

        Ok(PreparedUser::New(user))
    }
}
