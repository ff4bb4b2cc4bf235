//! Audit logging for shareledger
//!
//! Every create, update and delete of a user or an expense is appended to
//! `audit.log` with before/after snapshots.
//!
//! # Example
//!
//! ```rust,ignore
//! use shareledger::audit::{AuditEntry, AuditLogger, EntityType, diff_entities};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! let entry = AuditEntry::update(
//!     EntityType::Expense,
//!     expense.id.as_str(),
//!     Some(expense.description.clone()),
//!     &before,
//!     &expense,
//!     diff_entities(&before, &expense),
//! );
//! logger.log(&entry)?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::{diff_entities, generate_diff};
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
