use sqlx::FromRow;
use time::OffsetDateTime;

use crate::database::Database;

/// A sealed document, addressed by (owner, name)
#[derive(Debug, Clone, FromRow)]
pub struct Document {
    pub owner: String,
    pub name: String,
    pub original_filename: String,
    /// nonce || ciphertext || tag
    pub ciphertext: Vec<u8>,
    /// plaintext size in bytes
    pub size: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Listing entry for a document, without its contents
#[derive(Debug, Clone, FromRow)]
pub struct DocumentSummary {
    pub name: String,
    pub original_filename: String,
    pub size: i64,
    pub updated_at: OffsetDateTime,
}

impl Document {
    /// Store a sealed document, replacing any existing document with
    ///  the same owner and name
    pub async fn upsert(
        owner: &str,
        name: &str,
        original_filename: &str,
        ciphertext: &[u8],
        size: usize,
        db: &Database,
    ) -> Result<(), sqlx::Error> {
        let now = OffsetDateTime::now_utc();
        let size = i64::try_from(size).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        sqlx::query(
            r#"
            INSERT INTO documents (
                owner, name, original_filename, ciphertext, size,
                created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            ON CONFLICT (owner, name) DO UPDATE SET
                original_filename = excluded.original_filename,
                ciphertext = excluded.ciphertext,
                size = excluded.size,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(owner)
        .bind(name)
        .bind(original_filename)
        .bind(ciphertext)
        .bind(size)
        .bind(now)
        .execute(&**db)
        .await?;

        Ok(())
    }

    /// Get a document by owner and name
    pub async fn get(
        owner: &str,
        name: &str,
        db: &Database,
    ) -> Result<Option<Document>, sqlx::Error> {
        sqlx::query_as::<_, Document>(
            r#"
            SELECT
                owner, name, original_filename, ciphertext, size,
                created_at, updated_at
            FROM documents
            WHERE owner = ?1 AND name = ?2
            "#,
        )
        .bind(owner)
        .bind(name)
        .fetch_optional(&**db)
        .await
    }

    /// List an owner's documents, most recently updated first
    pub async fn list(owner: &str, db: &Database) -> Result<Vec<DocumentSummary>, sqlx::Error> {
        sqlx::query_as::<_, DocumentSummary>(
            r#"
            SELECT name, original_filename, size, updated_at
            FROM documents
            WHERE owner = ?1
            ORDER BY updated_at DESC, name ASC
            "#,
        )
        .bind(owner)
        .fetch_all(&**db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Account;
    use common::prelude::{AccountKey, PasswordHash, PasswordParams};

    async fn setup_test_db() -> Database {
        let url = url::Url::parse("sqlite::memory:").unwrap();
        let db = Database::connect(&url).await.unwrap();

        let params = PasswordParams {
            mem_cost_kib: 1024,
            time_cost: 1,
            parallelism: 1,
        };
        for (i, username) in ["alice", "bob"].into_iter().enumerate() {
            let hash = PasswordHash::new("pw", &params).unwrap();
            let key = AccountKey::from([i as u8; 32]);
            Account::create(username, "x@example.com", &hash, &key, &db)
                .await
                .unwrap()
                .unwrap();
        }
        db
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let db = setup_test_db().await;

        Document::upsert("alice", "report", "q3.pdf", b"sealed", 4, &db)
            .await
            .unwrap();

        let stored = Document::get("alice", "report", &db).await.unwrap().unwrap();
        assert_eq!(stored.original_filename, "q3.pdf");
        assert_eq!(stored.ciphertext, b"sealed");
        assert_eq!(stored.size, 4);
        assert_eq!(stored.created_at, stored.updated_at);
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing() {
        let db = setup_test_db().await;

        Document::upsert("alice", "report", "v1.txt", b"one", 3, &db)
            .await
            .unwrap();
        let first = Document::get("alice", "report", &db).await.unwrap().unwrap();
        Document::upsert("alice", "report", "v2.txt", b"two!", 4, &db)
            .await
            .unwrap();
        let second = Document::get("alice", "report", &db).await.unwrap().unwrap();

        assert_eq!(second.original_filename, "v2.txt");
        assert_eq!(second.ciphertext, b"two!");
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);
        assert_eq!(Document::list("alice", &db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_names_are_scoped_to_owner() {
        let db = setup_test_db().await;

        Document::upsert("alice", "report", "a.txt", b"alice", 5, &db)
            .await
            .unwrap();
        Document::upsert("bob", "report", "b.txt", b"bob", 3, &db)
            .await
            .unwrap();

        let alice = Document::get("alice", "report", &db).await.unwrap().unwrap();
        let bob = Document::get("bob", "report", &db).await.unwrap().unwrap();
        assert_eq!(alice.ciphertext, b"alice");
        assert_eq!(bob.ciphertext, b"bob");
        assert!(Document::get("carol", "report", &db).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_only_returns_owned_documents() {
        let db = setup_test_db().await;

        Document::upsert("alice", "a", "a.txt", b"1", 1, &db).await.unwrap();
        Document::upsert("alice", "b", "b.txt", b"2", 1, &db).await.unwrap();
        Document::upsert("bob", "c", "c.txt", b"3", 1, &db).await.unwrap();

        let mut names: Vec<_> = Document::list("alice", &db)
            .await
            .unwrap()
            .into_iter()
            .map(|summary| summary.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);
        assert!(Document::list("carol", &db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_owner_rejected() {
        let db = setup_test_db().await;
        let result = Document::upsert("mallory", "x", "x.txt", b"x", 1, &db).await;
        assert!(result.is_err());
    }
}
