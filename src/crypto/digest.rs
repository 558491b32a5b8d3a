//! Password digest
//!
//! One-way SHA-256 of the password bytes, rendered as 64 lowercase hex
//! characters. The digest is unsalted so that the same password always maps
//! to the same stored text.

use std::fmt::Write;

use sha2::{Digest, Sha256};

/// Hash a plaintext password into its stored form
pub fn hash_password(password: &str) -> String {
    let hash = Sha256::digest(password.as_bytes());
    hash.iter().fold(String::with_capacity(64), |mut out, byte| {
        let _ = write!(out, "{:02x}", byte);
        out
    })
}
