//! Tally - multi-user personal income and expense ledger
//!
//! Users sign up and sign in against a binary credential file. Each signed-in
//! user manages their own transactions, which share one comma-delimited file
//! with every other user's records.
//!
//! # Architecture
//!
//! - `collections`: arena-backed doubly-linked `RecordList`
//! - `config`: path resolution and settings
//! - `error`: custom error types
//! - `models`: transactions, categories, dates and users
//! - `crypto`: password digests and zeroizing password buffers
//! - `storage`: transaction and user stores plus file I/O
//! - `audit`: JSONL audit trail of mutations
//! - `services`: sign-up/sign-in and ledger operations
//! - `display`: register formatting
//! - `cli`: interactive menus
//!
//! # Example
//!
//! ```rust,ignore
//! use tally::config::{Settings, TallyPaths};
//! use tally::storage::Storage;
//!
//! let paths = TallyPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths, &settings)?;
//! storage.load_users()?;
//! ```

pub mod audit;
pub mod cli;
pub mod collections;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{TallyError, TallyResult};
