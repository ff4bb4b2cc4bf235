//! JSON Export functionality
//!
//! Dumps users and expenses with a schema version. The output can be fed
//! back through `shareledger import`.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::total_group_expenses;
use crate::models::{Expense, Money, User};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full database export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Version of shareledger that wrote the file
    pub app_version: String,

    pub users: Vec<User>,

    /// Newest first
    pub expenses: Vec<Expense>,

    pub metadata: ExportMetadata,
}

/// Summary figures for a quick look at an export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub user_count: usize,
    pub expense_count: usize,
    /// Sum of `expense`-type amounts
    pub total_group_expenses: Money,
    pub earliest_expense: Option<String>,
    pub latest_expense: Option<String>,
}

impl FullExport {
    pub fn from_storage(storage: &Storage) -> LedgerResult<Self> {
        let users = storage.users.get_all()?;
        let expenses = storage.expenses.get_all()?;

        let metadata = ExportMetadata {
            user_count: users.len(),
            expense_count: expenses.len(),
            total_group_expenses: total_group_expenses(&expenses)?,
            earliest_expense: expenses.iter().map(|e| e.date).min().map(|d| d.to_string()),
            latest_expense: expenses.iter().map(|e| e.date).max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            users,
            expenses,
            metadata,
        })
    }

    /// Check the schema version and that every expense points at a user in
    /// the export
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let user_ids: HashSet<_> = self.users.iter().map(|u| &u.id).collect();
        for expense in &self.expenses {
            let referenced = std::iter::once(&expense.paid_by).chain(expense.split_with.iter());
            for id in referenced {
                if !user_ids.contains(id) {
                    return Err(format!(
                        "Expense {} references unknown user {}",
                        expense.id, id
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Export the full database to JSON
pub fn export_full_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> LedgerResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| LedgerError::Export(e.to_string()))
}
