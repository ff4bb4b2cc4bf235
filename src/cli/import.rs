//! CLI command handler for JSON import
//!
//! Reads a `{users, expenses}` snapshot, either a shareledger export or the
//! looser camelCase layout, and merges it into the store.

use std::path::Path;

use crate::error::{LedgerError, LedgerResult};
use crate::services::ImportService;
use crate::storage::Storage;

/// Handle the import command
pub fn handle_import_command(storage: &Storage, file: &Path, dry_run: bool) -> LedgerResult<()> {
    if !file.exists() {
        return Err(LedgerError::Import(format!(
            "File not found: {}",
            file.display()
        )));
    }

    let contents = std::fs::read_to_string(file)
        .map_err(|e| LedgerError::Import(format!("Failed to read file: {}", e)))?;

    let result = ImportService::new(storage).import_json(&contents, dry_run)?;

    if dry_run {
        println!("Import Preview for '{}'", file.display());
    } else {
        println!("Imported '{}'", file.display());
    }
    println!("{}", "=".repeat(40));
    println!("  Users:              {}", result.users_imported);
    println!("  Expenses:           {}", result.expenses_imported);
    println!("  Duplicates (skip):  {}", result.duplicates_skipped);
    println!("  Errors:             {}", result.errors.len());

    if !result.errors.is_empty() {
        println!();
        println!("Rejected records:");
        for issue in result.errors.iter().take(10) {
            println!("  {}: {}", issue.record, issue.message);
        }
        if result.errors.len() > 10 {
            println!("  ... and {} more", result.errors.len() - 10);
        }
    }

    if dry_run && result.imported() > 0 {
        println!();
        println!("Run again without --dry-run to import.");
    }

    Ok(())
}
