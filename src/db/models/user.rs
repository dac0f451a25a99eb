//! User model

use chrono::Utc;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// User table name
pub const USER_TABLE: &str = "user";

/// User account
///
/// The password hash stays inside the db layer; API responses carry a
/// separate view without it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub username: String,
    pub password_hash: String,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_admin: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: String,
}

fn default_true() -> bool {
    true
}

impl User {
    /// New active account; the id is assigned by the store
    pub fn new(username: impl Into<String>, password_hash: String, is_admin: bool) -> Self {
        Self {
            id: None,
            username: username.into(),
            password_hash,
            is_admin,
            is_active: true,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    /// Verify a password against the stored argon2 hash
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.password_hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password with argon2 and a fresh random salt
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    /// Full "user:key" id string, if persisted
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let hash = User::hash_password("s3cret-pass").unwrap();
        let user = User::new("john", hash, false);

        assert!(user.verify_password("s3cret-pass").unwrap());
        assert!(!user.verify_password("wrong-pass").unwrap());
    }
}
