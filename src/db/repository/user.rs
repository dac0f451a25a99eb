//! User repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::user::{USER_TABLE, User};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new account; usernames are unique
    ///
    /// The pre-check gives the common case a clean error; the unique
    /// index on `username` is what actually closes the race between
    /// two concurrent registrations.
    pub async fn create(&self, user: User) -> RepoResult<User> {
        let username = user.username.clone();
        if self.find_by_username(&username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username {username} already taken"
            )));
        }

        let created: Option<User> = self
            .base
            .db()
            .create(USER_TABLE)
            .content(user)
            .await
            .map_err(|e| {
                // Index violation from the insert that lost the race
                if e.to_string().contains("user_username") {
                    RepoError::Duplicate(format!("Username {username} already taken"))
                } else {
                    RepoError::from(e)
                }
            })?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE username = $username LIMIT 1")
            .bind(("username", username.to_string()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create the bootstrap admin account if it does not exist yet
    pub async fn ensure_admin(&self, username: &str, password: &str) -> RepoResult<()> {
        if self.find_by_username(username).await?.is_some() {
            return Ok(());
        }

        let hash = User::hash_password(password)
            .map_err(|e| RepoError::Database(format!("Password hashing failed: {e}")))?;
        self.create(User::new(username, hash, true)).await?;
        tracing::info!(username, "Bootstrap admin account created");
        Ok(())
    }
}
