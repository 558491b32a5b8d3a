//! Audit trail for ledger mutations
//!
//! Every transaction create, update and delete, and every sign-up, is
//! appended to an append-only log as one JSON object per line (JSONL).
//!
//! - `AuditEntry`: a single record with timestamp, acting user, entity
//!   position or name, and before/after snapshots.
//! - `AuditLogger`: appends entries to the log file and reads them back.
//!
//! # Example
//!
//! ```rust,ignore
//! use tally::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! let entry = AuditEntry::create(EntityType::Transaction, "alice", "1", &txn);
//! logger.log(&entry)?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
