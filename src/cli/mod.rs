//! Interactive console front end
//!
//! `prompt` reads and validates single answers; `menu` drives a whole
//! session on top of the service layer.

pub mod menu;
pub mod prompt;

pub use menu::{Action, Menu};
pub use prompt::{parse_choice, validate_amount, Console};
