//! Authentication service
//!
//! Sign-up and sign-in against the user store.

use serde_json::json;
use tracing::{info, warn};

use crate::audit::EntityType;
use crate::error::{TallyError, TallyResult};
use crate::models::{Role, User};
use crate::storage::Storage;

/// Service for user registration and sign in
pub struct AuthService<'a> {
    storage: &'a mut Storage,
}

impl<'a> AuthService<'a> {
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    /// Register a new user
    ///
    /// The user exists in memory only until the user file is saved.
    pub fn sign_up(&mut self, username: &str, password: &str, admin: bool) -> TallyResult<()> {
        if username.is_empty() {
            return Err(TallyError::Validation("Username cannot be empty".into()));
        }
        if username.chars().any(char::is_whitespace) {
            return Err(TallyError::Validation(
                "Username cannot contain whitespace".into(),
            ));
        }
        if username.contains(',') {
            return Err(TallyError::Validation(
                "Username cannot contain commas".into(),
            ));
        }
        if self.storage.users.exists(username) {
            return Err(TallyError::duplicate_user(username));
        }

        self.storage.users.add(User::new(username, password, admin));
        info!(admin, "Registered user {}", username);

        let snapshot = json!({ "username": username, "admin": admin });
        if let Err(e) = self
            .storage
            .log_create(EntityType::User, username, username, &snapshot)
        {
            warn!("Failed to audit sign up: {}", e);
        }

        Ok(())
    }

    /// Check credentials and make `username` the active ledger owner
    pub fn sign_in(&mut self, username: &str, password: &str) -> TallyResult<Role> {
        let role = self
            .storage
            .users
            .authenticate(username, password)
            .ok_or(TallyError::AuthenticationFailed)?;

        self.storage.transactions.set_active_user(username);
        info!(%role, "Signed in as {}", username);
        Ok(role)
    }
}
