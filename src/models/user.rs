//! User credentials model

use std::fmt;

use crate::crypto::hash_password;

/// Access level granted at sign in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Add, modify, delete, sort and display
    Standard,
    /// Everything a standard user can do, plus search
    Admin,
}

impl Role {
    /// Role for a stored admin flag
    pub fn from_admin_flag(admin: bool) -> Self {
        if admin {
            Self::Admin
        } else {
            Self::Standard
        }
    }

    /// Check if this is the admin role
    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// A registered user; only the password digest is kept
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    username: String,
    password_digest: String,
    admin: bool,
}

impl User {
    /// Create a user from a plaintext password
    pub fn new(username: impl Into<String>, password: &str, admin: bool) -> Self {
        Self {
            username: username.into(),
            password_digest: hash_password(password),
            admin,
        }
    }

    /// Rebuild a user from stored fields
    pub fn from_digest(
        username: impl Into<String>,
        password_digest: impl Into<String>,
        admin: bool,
    ) -> Self {
        Self {
            username: username.into(),
            password_digest: password_digest.into(),
            admin,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_digest(&self) -> &str {
        &self.password_digest
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn role(&self) -> Role {
        Role::from_admin_flag(self.admin)
    }
}

// Keep the digest out of logs
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("admin", &self.admin)
            .finish_non_exhaustive()
    }
}
