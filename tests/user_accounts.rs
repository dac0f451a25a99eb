//! User account integration tests
//!
//! Username uniqueness is enforced by the store index, not only by the
//! repository's pre-check.

use orderd::db::DbService;
use orderd::db::models::User;
use orderd::db::models::user::USER_TABLE;
use orderd::db::repository::{RepoError, UserRepository};

#[tokio::test]
async fn test_duplicate_username_is_a_duplicate_error() {
    let db_service = DbService::in_memory().await.unwrap();
    let repo = UserRepository::new(db_service.db.clone());
    let hash = User::hash_password("password123").unwrap();

    repo.create(User::new("john_doe", hash.clone(), false))
        .await
        .unwrap();
    let err = repo
        .create(User::new("john_doe", hash, false))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn test_username_unique_index_enforced_by_store() {
    let db_service = DbService::in_memory().await.unwrap();
    let repo = UserRepository::new(db_service.db.clone());
    let hash = User::hash_password("password123").unwrap();

    repo.create(User::new("john_doe", hash.clone(), false))
        .await
        .unwrap();

    // Insert behind the repository's back; the index still refuses,
    // so a registration losing a race cannot slip through
    let result: Result<Option<User>, _> = db_service
        .db
        .create(USER_TABLE)
        .content(User::new("john_doe", hash, false))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_ensure_admin_is_idempotent() {
    let db_service = DbService::in_memory().await.unwrap();
    let repo = UserRepository::new(db_service.db.clone());

    repo.ensure_admin("admin", "admin-password").await.unwrap();
    repo.ensure_admin("admin", "admin-password").await.unwrap();

    let admin = repo.find_by_username("admin").await.unwrap().unwrap();
    assert!(admin.is_admin);
    assert!(admin.verify_password("admin-password").unwrap());
}
