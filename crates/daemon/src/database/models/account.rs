use sqlx::FromRow;
use time::OffsetDateTime;

use common::prelude::{AccountKey, PasswordHash};

use crate::database::types::{DAccountKey, DPasswordHash};
use crate::database::Database;

/// A registered account. The username is the identity; the key never
///  changes after registration.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub username: String,
    pub email: String,
    pub password_hash: DPasswordHash,
    pub encryption_key: DAccountKey,
    pub created_at: OffsetDateTime,
}

impl Account {
    /// Insert a new account. Returns `None` if the username is taken,
    ///  leaving the existing record untouched.
    pub async fn create(
        username: &str,
        email: &str,
        password_hash: &PasswordHash,
        encryption_key: &AccountKey,
        db: &Database,
    ) -> Result<Option<Account>, sqlx::Error> {
        let now = OffsetDateTime::now_utc();

        let result = sqlx::query(
            r#"
            INSERT INTO accounts (
                username, email, password_hash, encryption_key, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(DPasswordHash::from(password_hash.clone()))
        .bind(DAccountKey::from(encryption_key.clone()))
        .bind(now)
        .execute(&**db)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Self::get(username, db).await
    }

    /// Get an account by username
    pub async fn get(username: &str, db: &Database) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT username, email, password_hash, encryption_key, created_at
            FROM accounts
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&**db)
        .await
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn key(&self) -> &AccountKey {
        &self.encryption_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::prelude::{hash_password, verify_password, PasswordParams};

    async fn setup_test_db() -> Database {
        let url = url::Url::parse("sqlite::memory:").unwrap();
        Database::connect(&url).await.unwrap()
    }

    fn fast_params() -> PasswordParams {
        PasswordParams {
            mem_cost_kib: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = setup_test_db().await;
        let hash = hash_password("correct horse", &fast_params()).unwrap();
        let key = AccountKey::from([3u8; 32]);

        let created = Account::create("alice", "alice@example.com", &hash, &key, &db)
            .await
            .unwrap()
            .expect("fresh username");
        assert_eq!(created.username, "alice");
        assert_eq!(created.email, "alice@example.com");
        assert_eq!(created.key(), &key);

        let loaded = Account::get("alice", &db).await.unwrap().unwrap();
        assert!(verify_password("correct horse", loaded.password_hash()));
        assert_eq!(loaded.key(), &key);
    }

    #[tokio::test]
    async fn test_duplicate_username_keeps_original() {
        let db = setup_test_db().await;
        let params = fast_params();
        let first = hash_password("first", &params).unwrap();
        let second = hash_password("second", &params).unwrap();
        let key = AccountKey::from([1u8; 32]);
        let other_key = AccountKey::from([2u8; 32]);

        Account::create("alice", "a@example.com", &first, &key, &db)
            .await
            .unwrap()
            .unwrap();
        let duplicate = Account::create("alice", "b@example.com", &second, &other_key, &db)
            .await
            .unwrap();
        assert!(duplicate.is_none());

        let stored = Account::get("alice", &db).await.unwrap().unwrap();
        assert_eq!(stored.email, "a@example.com");
        assert_eq!(stored.key(), &key);
        assert!(verify_password("first", stored.password_hash()));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let db = setup_test_db().await;
        assert!(Account::get("nobody", &db).await.unwrap().is_none());
    }
}
