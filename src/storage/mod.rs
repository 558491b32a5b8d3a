//! Storage layer for Tally
//!
//! Two files back the ledger: a comma-delimited transaction file shared by
//! all users and a binary credential file. Both are read whole and
//! rewritten whole.

pub mod file_io;
pub mod transactions;
pub mod users;

pub use transactions::{LoadSummary, RecordLayout, TransactionStore};
pub use users::UserStore;

use serde::Serialize;
use tracing::debug;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::{Settings, TallyPaths};
use crate::error::TallyResult;

/// Main storage coordinator that owns both stores and the audit log
pub struct Storage {
    paths: TallyPaths,
    atomic_save: bool,
    audit_enabled: bool,
    audit: AuditLogger,
    pub users: UserStore,
    pub transactions: TransactionStore,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: TallyPaths, settings: &Settings) -> TallyResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            atomic_save: settings.atomic_save,
            audit_enabled: settings.audit_log,
            audit: AuditLogger::new(paths.audit_log()),
            users: UserStore::new(),
            transactions: TransactionStore::with_layout(settings.record_layout),
            paths,
        })
    }

    pub fn paths(&self) -> &TallyPaths {
        &self.paths
    }

    pub fn audit_logger(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load the credential file; a missing file means no users yet
    pub fn load_users(&mut self) -> TallyResult<usize> {
        let path = self.paths.users_file();
        if !path.exists() {
            debug!("No user file at {}", path.display());
            self.users = UserStore::new();
            return Ok(0);
        }
        self.users.load_file(path)
    }

    pub fn save_users(&self) -> TallyResult<()> {
        self.users
            .save_file(self.paths.users_file(), self.atomic_save)
    }

    /// Load the transaction file for the active user
    ///
    /// A missing file leaves both partitions empty.
    pub fn load_transactions(&mut self) -> TallyResult<LoadSummary> {
        let path = self.paths.transactions_file();
        if !path.exists() {
            debug!("No transaction file at {}", path.display());
            return self.transactions.load(std::io::empty());
        }
        self.transactions.load_file(path)
    }

    pub fn save_transactions(&self) -> TallyResult<()> {
        self.transactions
            .save_file(self.paths.transactions_file(), self.atomic_save)
    }

    /// Log a create operation to the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        actor: &str,
        entity_id: impl Into<String>,
        entity: &T,
    ) -> TallyResult<()> {
        self.log(|| AuditEntry::create(entity_type, actor, entity_id, entity))
    }

    /// Log an update operation to the audit log
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        actor: &str,
        entity_id: impl Into<String>,
        before: &T,
        after: &T,
    ) -> TallyResult<()> {
        self.log(|| AuditEntry::update(entity_type, actor, entity_id, before, after))
    }

    /// Log a delete operation to the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        actor: &str,
        entity_id: impl Into<String>,
        entity: &T,
    ) -> TallyResult<()> {
        self.log(|| AuditEntry::delete(entity_type, actor, entity_id, entity))
    }

    fn log(&self, entry: impl FnOnce() -> AuditEntry) -> TallyResult<()> {
        if !self.audit_enabled {
            return Ok(());
        }
        self.audit.log(&entry())
    }
}
