//! Display formatting for terminal output

pub mod transaction;

pub use transaction::{format_register, format_register_header, format_transaction_row};
