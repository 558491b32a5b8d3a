//! Service layer for Tally
//!
//! Services sit between the menu and the storage layer: they validate
//! input, apply mutations to the in-memory stores and write the audit trail.

pub mod auth;
pub mod ledger;

pub use auth::AuthService;
pub use ledger::LedgerService;
