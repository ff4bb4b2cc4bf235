//! Storage layer for shareledger
//!
//! JSON file repositories with atomic writes, plus the audit logger every
//! mutation goes through.

pub mod expenses;
pub mod file_io;
pub mod init;
pub mod users;

pub use expenses::ExpenseRepository;
pub use file_io::{read_json, read_json_required, write_json_atomic};
pub use init::{initialize_storage, needs_initialization};
pub use users::UserRepository;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::LedgerPaths;
use crate::error::LedgerResult;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: LedgerPaths,
    pub users: UserRepository,
    pub expenses: ExpenseRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a storage handle; nothing is read until `load_all`
    pub fn new(paths: LedgerPaths) -> LedgerResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            users: UserRepository::new(paths.users_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> LedgerResult<()> {
        self.users.load()?;
        self.expenses.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> LedgerResult<()> {
        self.users.save()?;
        self.expenses.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> LedgerResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> LedgerResult<()> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> LedgerResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// Append several prepared entries at once (imports)
    pub fn log_batch(&self, entries: &[AuditEntry]) -> LedgerResult<()> {
        self.audit.log_batch(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::User;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_round_trip_and_audit() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone()).unwrap();

        let user = User::new("Alex");
        storage.users.upsert(user.clone()).unwrap();
        storage.save_all().unwrap();
        storage
            .log_create(EntityType::User, user.id.as_str(), Some(user.name.clone()), &user)
            .unwrap();

        let mut reopened = Storage::new(paths).unwrap();
        reopened.load_all().unwrap();
        assert_eq!(reopened.users.count().unwrap(), 1);

        let entries = reopened.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_name.as_deref(), Some("Alex"));
    }
}
