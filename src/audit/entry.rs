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
    Transaction,
    User,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Transaction => write!(f, "Transaction"),
            EntityType::User => write!(f, "User"),
        }
    }
}

/// A single audit log entry
///
/// `entity_id` is the 1-based list position for transactions and the
/// username for users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// Signed-in user who performed the operation
    pub actor: String,

    pub entity_id: String,

    /// Snapshot before the operation (updates and deletes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// Snapshot after the operation (creates and updates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,
}

impl AuditEntry {
    /// Create a new audit entry for a create operation
    pub fn create<T: Serialize>(
        entity_type: EntityType,
        actor: impl Into<String>,
        entity_id: impl Into<String>,
        entity: &T,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Create,
            entity_type,
            actor: actor.into(),
            entity_id: entity_id.into(),
            before: None,
            after: serde_json::to_value(entity).ok(),
        }
    }

    /// Create a new audit entry for an update operation
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        actor: impl Into<String>,
        entity_id: impl Into<String>,
        before: &T,
        after: &T,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Update,
            entity_type,
            actor: actor.into(),
            entity_id: entity_id.into(),
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
        }
    }

    /// Create a new audit entry for a delete operation
    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        actor: impl Into<String>,
        entity_id: impl Into<String>,
        entity: &T,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Delete,
            entity_type,
            actor: actor.into(),
            entity_id: entity_id.into(),
            before: serde_json::to_value(entity).ok(),
            after: None,
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {} by {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id,
            self.actor
        );

        if let Some(before) = &self.before {
            output.push_str(&format!("\n  before: {}", before));
        }
        if let Some(after) = &self.after {
            output.push_str(&format!("\n  after:  {}", after));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Update.to_string(), "UPDATE");
        assert_eq!(Operation::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_create_entry() {
        let data = json!({"description": "Lunch", "amount": -12.5});
        let entry = AuditEntry::create(EntityType::Transaction, "carol", "3", &data);

        assert_eq!(entry.operation, Operation::Create);
        assert_eq!(entry.entity_type, EntityType::Transaction);
        assert_eq!(entry.actor, "carol");
        assert_eq!(entry.entity_id, "3");
        assert!(entry.before.is_none());
        assert_eq!(entry.after, Some(data));
    }

    #[test]
    fn test_update_entry() {
        let before = json!({"amount": 10});
        let after = json!({"amount": 15});
        let entry = AuditEntry::update(EntityType::Transaction, "bob", "1", &before, &after);

        assert_eq!(entry.operation, Operation::Update);
        assert_eq!(entry.before, Some(before));
        assert_eq!(entry.after, Some(after));
    }

    #[test]
    fn test_delete_entry() {
        let entry = AuditEntry::delete(EntityType::Transaction, "bob", "2", &json!({"amount": 1}));

        assert_eq!(entry.operation, Operation::Delete);
        assert!(entry.before.is_some());
        assert!(entry.after.is_none());
    }

    #[test]
    fn test_serialization_skips_missing_snapshots() {
        let entry = AuditEntry::create(EntityType::User, "alice", "alice", &json!({"admin": false}));

        let line = serde_json::to_string(&entry).unwrap();
        assert!(line.contains("\"entity_type\":\"user\""));
        assert!(!line.contains("before"));

        let parsed: AuditEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.operation, Operation::Create);
        assert_eq!(parsed.entity_type, EntityType::User);
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::delete(EntityType::Transaction, "bob", "2", &json!({"amount": 1}));

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("DELETE Transaction 2 by bob"));
        assert!(formatted.contains("before:"));
        assert!(!formatted.contains("after:"));
    }
}
