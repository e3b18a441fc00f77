//! The user entity and its credential contract.

use serde::Serialize;

use super::password;

/// A user record.
///
/// The stored hash is write-only from outside this module: there is no
/// accessor for it, deliberately. [`User::set_password`] is the only way to
/// write it and [`User::verify_password`] the only way to consume it.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub(super) password_hash: String,
}

/// The subset of a user safe to return to clients: id and username, never
/// the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: i64,
    pub username: String,
}

impl User {
    /// Create a user with no stored hash yet. Not meaningful to persist
    /// until [`User::set_password`] has run.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: 0,
            username: username.into(),
            password_hash: String::new(),
        }
    }

    /// Hash `plaintext` and store the result, overwriting any prior hash.
    /// Each call salts anew, so equal plaintexts store different strings.
    pub fn set_password(&mut self, plaintext: &str) -> Result<(), argon2::password_hash::Error> {
        self.password_hash = password::hash_password(plaintext)?;
        Ok(())
    }

    /// Check a candidate password against the stored hash. False when the
    /// candidate does not match or no hash has been set.
    pub fn verify_password(&self, candidate: &str) -> bool {
        password::verify_password(candidate, &self.password_hash)
    }

    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            username: self.username.clone(),
        }
    }
}
