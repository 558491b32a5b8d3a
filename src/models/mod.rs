//! Core data models for Tally
//!
//! This module contains the value types that make up a ledger: transactions
//! with their type and category, date keys, and user credentials.

pub mod category;
pub mod date;
pub mod transaction;
pub mod user;

pub use category::{Category, TransactionType};
pub use date::{is_valid_entry_date, DateKey};
pub use transaction::Transaction;
pub use user::{Role, User};
