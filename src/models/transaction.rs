//! Transaction model
//!
//! A single income or expense entry in a user's ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::{Category, TransactionType};
use super::date::DateKey;
use crate::error::TallyResult;

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Transaction {
    /// Owning username (empty for records built outside a session)
    pub username: String,

    /// Income or expense
    pub transaction_type: TransactionType,

    /// Date as `DD/MM/YYYY` text
    pub date: String,

    /// Category
    pub category: Category,

    /// Free text; must not contain a comma to survive the transaction file
    pub description: String,

    /// Signed amount
    pub amount: f64,
}

impl Transaction {
    /// Create a transaction with all fields
    pub fn new(
        username: impl Into<String>,
        transaction_type: TransactionType,
        date: impl Into<String>,
        category: Category,
        description: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            username: username.into(),
            transaction_type,
            date: date.into(),
            category,
            description: description.into(),
            amount,
        }
    }

    /// Chronological key derived from the date text
    pub fn date_key(&self) -> TallyResult<DateKey> {
        DateKey::parse(&self.date)
    }

    /// Display name of the type
    pub fn type_name(&self) -> &'static str {
        self.transaction_type.name()
    }

    /// Display name of the category
    pub fn category_name(&self) -> &'static str {
        self.category.name()
    }

    /// Case-insensitive substring match on the date text or category name
    ///
    /// `needle` must already be lowercase.
    pub fn matches_keyword(&self, needle: &str) -> bool {
        self.date.to_lowercase().contains(needle)
            || self.category_name().to_lowercase().contains(needle)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {:.2} {}",
            self.date,
            self.type_name(),
            self.category_name(),
            self.amount,
            self.description
        )
    }
}
