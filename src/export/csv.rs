//! CSV Export functionality
//!
//! Exports the expense list and the pairwise debts to spreadsheet-friendly CSV.

use std::collections::HashMap;
use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, UserId};
use crate::services::BalanceService;
use crate::storage::Storage;

fn export_err(e: impl std::fmt::Display) -> LedgerError {
    LedgerError::Export(e.to_string())
}

fn plain_amount(amount: Money) -> String {
    format!("{:.2}", amount.amount().round_dp(2))
}

/// Export all expenses to CSV, newest first
pub fn export_expenses_csv<W: Write>(storage: &Storage, writer: &mut W) -> LedgerResult<()> {
    let names: HashMap<UserId, String> = storage
        .users
        .get_all()?
        .into_iter()
        .map(|u| (u.id, u.name))
        .collect();
    let name_of = |id: &UserId| names.get(id).cloned().unwrap_or_else(|| id.to_string());

    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([
        "ID",
        "Date",
        "Description",
        "Category",
        "Type",
        "Amount",
        "Paid By",
        "Split With",
    ])
    .map_err(export_err)?;

    for expense in storage.expenses.get_all()? {
        let split = expense
            .split_with
            .iter()
            .map(&name_of)
            .collect::<Vec<_>>()
            .join("; ");

        csv.write_record([
            expense.id.to_string(),
            expense.date.to_string(),
            expense.description.clone(),
            expense.category.to_string(),
            expense.expense_type.to_string(),
            plain_amount(expense.amount),
            name_of(&expense.paid_by),
            split,
        ])
        .map_err(export_err)?;
    }

    csv.flush().map_err(export_err)
}

/// Export every debt edge (debtor owes creditor) to CSV
pub fn export_balances_csv<W: Write>(storage: &Storage, writer: &mut W) -> LedgerResult<()> {
    let edges = BalanceService::new(storage).edges()?;

    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Debtor ID", "Debtor", "Creditor ID", "Creditor", "Amount"])
        .map_err(export_err)?;

    for edge in edges {
        csv.write_record([
            edge.debtor.to_string(),
            edge.debtor_name,
            edge.creditor.to_string(),
            edge.creditor_name,
            plain_amount(edge.amount),
        ])
        .map_err(export_err)?;
    }

    csv.flush().map_err(export_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::storage::initialize_storage;
    use tempfile::TempDir;

    fn sample_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths, true).unwrap();
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_export_expenses_csv() {
        let (_temp_dir, storage) = sample_storage();
        let mut output = Vec::new();
        export_expenses_csv(&storage, &mut output).unwrap();

        let csv_string = String::from_utf8(output).unwrap();
        let lines: Vec<_> = csv_string.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID,Date,Description"));
        assert!(lines[1].starts_with("exp3,2023-10-20"));
        assert!(lines[1].contains("120.00,Casey,Alex; Blake; Casey"));
    }

    #[test]
    fn test_export_balances_csv() {
        let (_temp_dir, storage) = sample_storage();
        let mut output = Vec::new();
        export_balances_csv(&storage, &mut output).unwrap();

        let csv_string = String::from_utf8(output).unwrap();
        assert!(csv_string.contains("user1,Alex,user2,Blake,15.00"));
        assert!(csv_string.contains("user1,Alex,user3,Casey,40.00"));
        assert_eq!(csv_string.lines().count(), 7);
    }
}
