//! Credential handling for Tally
//!
//! Passwords are stored only as a SHA-256 digest, and plaintext read from
//! the console is held in a buffer that is zeroed on drop.

pub mod digest;
pub mod secure_memory;

pub use digest::hash_password;
pub use secure_memory::SecureString;
