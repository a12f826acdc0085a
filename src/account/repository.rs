//! Handle database requests.

use sqlx::{Pool, Postgres};

use crate::error::Result;
use crate::model::User;

#[derive(Clone)]
pub struct UserRepository {
    pool: Pool<Postgres>,
}

impl UserRepository {
    /// Create a new [`UserRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert [`User`] into database.
    ///
    /// Returns `false` when the id or the email is already registered.
    pub async fn insert(&self, user: &User) -> Result<bool> {
        let result = sqlx::query(
            r#"INSERT INTO users (id, username, email, password, created_at)
                VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Ok(false)
            },
            Err(err) => Err(err.into()),
        }
    }

    /// Find user using `id` field.
    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, username, email, password, created_at
                FROM users WHERE id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, email: &str) -> User {
        User {
            id: id.into(),
            username: id.into(),
            email: email.into(),
            password: "$argon2id$stub".into(),
            created_at: chrono::Utc::now(),
        }
    }

    #[sqlx::test]
    async fn test_insert_then_find(pool: Pool<Postgres>) {
        let repo = UserRepository::new(pool);

        assert!(repo.insert(&user("alice", "alice@mail.io")).await.unwrap());
        let found = repo.find_by_id("alice").await.unwrap().unwrap();
        assert_eq!(found.email, "alice@mail.io");

        assert!(repo.find_by_id("bob").await.unwrap().is_none());
    }

    #[sqlx::test]
    async fn test_duplicate_is_reported(pool: Pool<Postgres>) {
        let repo = UserRepository::new(pool);

        assert!(repo.insert(&user("alice", "alice@mail.io")).await.unwrap());
        assert!(!repo.insert(&user("alice", "other@mail.io")).await.unwrap());
        assert!(!repo.insert(&user("carol", "alice@mail.io")).await.unwrap());
    }
}
