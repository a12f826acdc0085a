use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::UserExchangeRepository;
use crate::error::Result;
use crate::model::{User, UserExchange};

const COLUMNS: &str = "id, user_id, exchange, api_key, api_secret, created_at";

/// [`UserExchangeRepository`] over the `user_exchanges` table.
#[derive(Clone)]
pub struct PgUserExchangeRepository {
    pool: Pool<Postgres>,
}

impl PgUserExchangeRepository {
    /// Create a new [`PgUserExchangeRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserExchangeRepository for PgUserExchangeRepository {
    async fn find_by_user(&self, user: &User) -> Result<Option<UserExchange>> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_exchanges WHERE user_id = $1
                ORDER BY created_at, id LIMIT 1"
        );

        let exchange = sqlx::query_as::<_, UserExchange>(&query)
            .bind(&user.id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(exchange)
    }

    async fn find_all_by_user(&self, user: &User) -> Result<Vec<UserExchange>> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_exchanges WHERE user_id = $1
                ORDER BY created_at, id"
        );

        let exchanges = sqlx::query_as::<_, UserExchange>(&query)
            .bind(&user.id)
            .fetch_all(&self.pool)
            .await?;

        Ok(exchanges)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserExchange>> {
        let query = format!("SELECT {COLUMNS} FROM user_exchanges WHERE id = $1");

        let exchange = sqlx::query_as::<_, UserExchange>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(exchange)
    }

    async fn find_all(&self) -> Result<Vec<UserExchange>> {
        let query = format!("SELECT {COLUMNS} FROM user_exchanges ORDER BY created_at, id");

        let exchanges = sqlx::query_as::<_, UserExchange>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(exchanges)
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM user_exchanges WHERE id = $1)"#)
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM user_exchanges"#)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn save(&self, exchange: &UserExchange) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO user_exchanges (id, user_id, exchange, api_key, api_secret, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (id) DO UPDATE
                SET user_id = EXCLUDED.user_id,
                    exchange = EXCLUDED.exchange,
                    api_key = EXCLUDED.api_key,
                    api_secret = EXCLUDED.api_secret"#,
        )
        .bind(&exchange.id)
        .bind(&exchange.user_id)
        .bind(&exchange.exchange)
        .bind(&exchange.api_key)
        .bind(&exchange.api_secret)
        .bind(exchange.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM user_exchanges WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::account::UserRepository;

    async fn owner(pool: &Pool<Postgres>, id: &str) -> User {
        let user = User {
            id: id.into(),
            username: id.into(),
            email: format!("{id}@cryptocaddy.io"),
            password: "$argon2id$stub".into(),
            created_at: Utc::now(),
        };
        UserRepository::new(pool.clone()).insert(&user).await.unwrap();
        user
    }

    fn exchange(id: &str, user: &User, age_days: i64) -> UserExchange {
        UserExchange {
            id: id.into(),
            user_id: user.id.clone(),
            exchange: "kraken".into(),
            api_key: format!("key-{id}"),
            api_secret: format!("secret-{id}"),
            created_at: Utc::now() - Duration::days(age_days),
        }
    }

    #[sqlx::test]
    async fn test_find_by_user(pool: Pool<Postgres>) {
        let repo = PgUserExchangeRepository::new(pool.clone());
        let alice = owner(&pool, "alice").await;
        let bob = owner(&pool, "bob").await;

        assert!(repo.find_by_user(&alice).await.unwrap().is_none());

        repo.save(&exchange("recent", &alice, 1)).await.unwrap();
        repo.save(&exchange("oldest", &alice, 30)).await.unwrap();

        let found = repo.find_by_user(&alice).await.unwrap().unwrap();
        assert_eq!(found.id, "oldest");
        assert_eq!(found.api_secret, "secret-oldest");
        assert_eq!(repo.find_all_by_user(&alice).await.unwrap().len(), 2);
        assert!(repo.find_by_user(&bob).await.unwrap().is_none());
    }

    #[sqlx::test]
    async fn test_save_update_delete(pool: Pool<Postgres>) {
        let repo = PgUserExchangeRepository::new(pool.clone());
        let alice = owner(&pool, "alice").await;

        let mut record = exchange("main", &alice, 0);
        repo.save(&record).await.unwrap();
        record.exchange = "binance".into();
        repo.save(&record).await.unwrap();

        let found = repo.find_by_id("main").await.unwrap().unwrap();
        assert_eq!(found.exchange, "binance");

        assert!(repo.delete("main").await.unwrap());
        assert!(!repo.delete("main").await.unwrap());
        assert!(repo.find_by_id("main").await.unwrap().is_none());
    }

    #[sqlx::test]
    async fn test_find_all_exists_count(pool: Pool<Postgres>) {
        let repo = PgUserExchangeRepository::new(pool.clone());
        let alice = owner(&pool, "alice").await;
        let bob = owner(&pool, "bob").await;
        assert_eq!(repo.count().await.unwrap(), 0);

        repo.save(&exchange("new", &bob, 1)).await.unwrap();
        repo.save(&exchange("old", &alice, 7)).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
        assert!(repo.exists("old").await.unwrap());
        assert!(!repo.exists("gone").await.unwrap());

        let ids: Vec<String> =
            repo.find_all().await.unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, ["old", "new"]);
    }
}
