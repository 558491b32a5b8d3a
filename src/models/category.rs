//! Transaction type and category enums
//!
//! Both enums persist as their ordinal in the transaction file, so the
//! variant order here is part of the on-disk format.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether money came in or went out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    Income,
    Expense,
}

impl TransactionType {
    /// All types in ordinal order
    pub const ALL: [TransactionType; 2] = [Self::Income, Self::Expense];

    /// The integer written to the transaction file
    pub fn ordinal(self) -> u8 {
        match self {
            Self::Income => 0,
            Self::Expense => 1,
        }
    }

    /// Decode a persisted ordinal
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(usize::from(ordinal)).copied()
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    /// Categories that are meaningful for this type
    pub fn categories(self) -> &'static [Category] {
        match self {
            Self::Income => &Category::ALL[..3],
            Self::Expense => &Category::ALL[3..],
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Spending or earning category
///
/// Salary, Cash and Gift belong to income; the rest to expenses. The pairing
/// is not enforced on [`crate::models::Transaction`]; callers supply a
/// consistent pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Salary,
    Cash,
    Gift,
    Food,
    Clothes,
    Transportation,
    Entertainment,
    Communication,
    #[default]
    Other,
}

impl Category {
    /// All categories in ordinal order
    pub const ALL: [Category; 9] = [
        Self::Salary,
        Self::Cash,
        Self::Gift,
        Self::Food,
        Self::Clothes,
        Self::Transportation,
        Self::Entertainment,
        Self::Communication,
        Self::Other,
    ];

    /// The integer written to the transaction file
    pub fn ordinal(self) -> u8 {
        // Position in ALL; the array mirrors declaration order
        self as u8
    }

    /// Decode a persisted ordinal
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(usize::from(ordinal)).copied()
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Salary => "Salary",
            Self::Cash => "Cash",
            Self::Gift => "Gift",
            Self::Food => "Food",
            Self::Clothes => "Clothes",
            Self::Transportation => "Transportation",
            Self::Entertainment => "Entertainment",
            Self::Communication => "Communication",
            Self::Other => "Other",
        }
    }

    /// The transaction type this category is meant for
    pub fn transaction_type(self) -> TransactionType {
        match self {
            Self::Salary | Self::Cash | Self::Gift => TransactionType::Income,
            _ => TransactionType::Expense,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
