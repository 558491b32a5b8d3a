//! Ledger service
//!
//! CRUD, search and sort over the signed-in user's transactions. Positions
//! are 0-based here; audit entries record the 1-based position shown to the
//! user.

use tracing::warn;

use crate::audit::EntityType;
use crate::error::TallyResult;
use crate::models::Transaction;
use crate::storage::Storage;

/// Service for the active user's transactions
pub struct LedgerService<'a> {
    storage: &'a mut Storage,
}

impl<'a> LedgerService<'a> {
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    pub fn len(&self) -> usize {
        self.storage.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.transactions.is_empty()
    }

    pub fn get(&self, index: usize) -> TallyResult<&Transaction> {
        self.storage.transactions.get(index)
    }

    /// Append a transaction to the active user's ledger
    pub fn add(&mut self, txn: Transaction) -> TallyResult<()> {
        self.storage.transactions.add(txn);

        let position = self.storage.transactions.len();
        let added = self.storage.transactions.get(position - 1)?;
        self.audit(
            self.storage
                .log_create(EntityType::Transaction, added.username.as_str(), position.to_string(), added),
        );
        Ok(())
    }

    /// Replace the transaction at `index`, returning the previous one
    pub fn modify(&mut self, index: usize, txn: Transaction) -> TallyResult<Transaction> {
        let before = self.storage.transactions.modify(index, txn)?;

        let after = self.storage.transactions.get(index)?;
        self.audit(self.storage.log_update(
            EntityType::Transaction,
            after.username.as_str(),
            (index + 1).to_string(),
            &before,
            after,
        ));
        Ok(before)
    }

    /// Remove the transaction at `index`
    pub fn delete(&mut self, index: usize) -> TallyResult<Transaction> {
        let removed = self.storage.transactions.delete(index)?;

        self.audit(self.storage.log_delete(
            EntityType::Transaction,
            removed.username.as_str(),
            (index + 1).to_string(),
            &removed,
        ));
        Ok(removed)
    }

    /// Matches on date text or category name, numbered from 1
    pub fn search<'s>(
        &'s self,
        keyword: &str,
    ) -> impl Iterator<Item = (usize, &'s Transaction)> + 's {
        self.storage.transactions.search(keyword)
    }

    pub fn sort_by_date_descending(&mut self) -> TallyResult<()> {
        self.storage.transactions.sort_by_date_descending()
    }

    /// All transactions in current order, numbered from 1
    pub fn list(&self) -> impl Iterator<Item = (usize, &Transaction)> + '_ {
        self.storage.transactions.list()
    }

    fn audit(&self, result: TallyResult<()>) {
        if let Err(e) = result {
            warn!("Failed to write audit entry: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::{Settings, TallyPaths};
    use crate::models::{Category, TransactionType};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths, &Settings::default()).unwrap();
        storage.transactions.set_active_user("bob");
        (temp_dir, storage)
    }

    fn expense(date: &str, description: &str, amount: f64) -> Transaction {
        Transaction::new("", TransactionType::Expense, date, Category::Food, description, amount)
    }

    #[test]
    fn test_add_modify_delete() {
        let (_temp, mut storage) = create_test_storage();
        let mut ledger = LedgerService::new(&mut storage);

        ledger.add(expense("01/01/2024", "Lunch", -12.5)).unwrap();
        ledger.add(expense("02/01/2024", "Dinner", -20.0)).unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get(0).unwrap().username, "bob");

        let old = ledger.modify(1, expense("02/01/2024", "Supper", -21.0)).unwrap();
        assert_eq!(old.description, "Dinner");
        assert_eq!(ledger.get(1).unwrap().description, "Supper");

        let removed = ledger.delete(0).unwrap();
        assert_eq!(removed.description, "Lunch");
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_out_of_range_is_index_error() {
        let (_temp, mut storage) = create_test_storage();
        let mut ledger = LedgerService::new(&mut storage);

        assert!(ledger.modify(0, expense("01/01/2024", "x", 1.0)).unwrap_err().is_index());
        assert!(ledger.delete(3).unwrap_err().is_index());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_mutations_are_audited() {
        let (_temp, mut storage) = create_test_storage();
        {
            let mut ledger = LedgerService::new(&mut storage);
            ledger.add(expense("01/01/2024", "Lunch", -12.5)).unwrap();
            ledger.modify(0, expense("01/01/2024", "Brunch", -14.0)).unwrap();
            ledger.delete(0).unwrap();
            // Failed operations leave no entry
            let _ = ledger.delete(0);
        }

        let entries = storage.audit_logger().read_all().unwrap();
        let ops: Vec<_> = entries.iter().map(|e| e.operation).collect();
        assert_eq!(ops, vec![Operation::Create, Operation::Update, Operation::Delete]);
        assert!(entries.iter().all(|e| e.actor == "bob" && e.entity_id == "1"));
        assert_eq!(entries[1].before.as_ref().unwrap()["description"], "Lunch");
        assert_eq!(entries[1].after.as_ref().unwrap()["description"], "Brunch");
    }

    #[test]
    fn test_search_and_sort_pass_through() {
        let (_temp, mut storage) = create_test_storage();
        let mut ledger = LedgerService::new(&mut storage);
        ledger.add(expense("01/01/2024", "old", -1.0)).unwrap();
        ledger.add(expense("05/06/2024", "new", -1.0)).unwrap();

        ledger.sort_by_date_descending().unwrap();
        let order: Vec<_> = ledger.list().map(|(n, t)| (n, t.description.clone())).collect();
        assert_eq!(order, vec![(1, "new".to_string()), (2, "old".to_string())]);

        assert_eq!(ledger.search("/06/").count(), 1);
        assert_eq!(ledger.search("food").count(), 2);
    }
}
