//! Audit history command

use crate::error::LedgerResult;
use crate::storage::Storage;

/// Print the most recent audit entries, oldest first
pub fn handle_history_command(storage: &Storage, count: usize) -> LedgerResult<()> {
    let audit = storage.audit();
    if !audit.exists() {
        println!("No history yet.");
        return Ok(());
    }

    let entries = audit.read_recent(count)?;
    if entries.is_empty() {
        println!("No history yet.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
