//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    User,
    Expense,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::User => write!(f, "User"),
            EntityType::Expense => write!(f, "Expense"),
        }
    }
}

/// A single audit log entry
///
/// Snapshots are stored as raw JSON so old entries stay readable after the
/// models change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    pub entity_id: String,

    /// Display label (user name, expense description)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// Entity state before the operation (updates and deletes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// Entity state after the operation (creates and updates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Create,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: None,
            after: serde_json::to_value(entity).ok(),
            diff_summary: None,
        }
    }

    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Update,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            diff_summary,
        }
    }

    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Delete,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: serde_json::to_value(entity).ok(),
            after: None,
            diff_summary: None,
        }
    }

    /// One line per entry, plus a "Changes" line for updates
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display() {
        assert_eq!(Operation::Update.to_string(), "UPDATE");
        assert_eq!(EntityType::Expense.to_string(), "Expense");
    }

    #[test]
    fn test_create_and_delete_snapshots() {
        let data = json!({"name": "Alex"});

        let created = AuditEntry::create(EntityType::User, "user1", Some("Alex".into()), &data);
        assert_eq!(created.operation, Operation::Create);
        assert!(created.before.is_none());
        assert_eq!(created.after, Some(data.clone()));

        let deleted = AuditEntry::delete(EntityType::User, "user1", None, &data);
        assert_eq!(deleted.before, Some(data));
        assert!(deleted.after.is_none());
    }

    #[test]
    fn test_serialization() {
        let entry = AuditEntry::update(
            EntityType::Expense,
            "exp1",
            Some("Dinner".into()),
            &json!({"amount": "75"}),
            &json!({"amount": "90"}),
            Some("amount: \"75\" -> \"90\"".into()),
        );

        let line = serde_json::to_string(&entry).unwrap();
        assert!(line.contains("\"entity_type\":\"expense\""));

        let back: AuditEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(back.operation, Operation::Update);
        assert_eq!(back.entity_id, "exp1");
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::update(
            EntityType::Expense,
            "exp1",
            Some("Dinner".into()),
            &json!({}),
            &json!({}),
            Some("amount: \"75\" -> \"90\"".into()),
        );

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("UPDATE Expense exp1 (Dinner)"));
        assert!(formatted.contains("Changes: amount"));
    }
}
