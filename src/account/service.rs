use async_trait::async_trait;

use super::{CreateAccountService, UserRepository};
use crate::crypto::PasswordManager;
use crate::database::Database;
use crate::error::Result;
use crate::model::{CreateAccountRequestBody, Envelope, User};

pub const ACCOUNT_EXISTS: &str = "Account already exists";

/// PostgreSQL-backed [`CreateAccountService`].
#[derive(Clone)]
pub struct AccountService {
    repo: UserRepository,
    pwd: PasswordManager,
}

impl AccountService {
    /// Create a new [`AccountService`].
    pub fn new(db: &Database, pwd: PasswordManager) -> Self {
        Self {
            repo: UserRepository::new(db.postgres.clone()),
            pwd,
        }
    }
}

#[async_trait]
impl CreateAccountService for AccountService {
    async fn create_account(
        &self,
        request: CreateAccountRequestBody,
    ) -> Result<Envelope> {
        let user = User {
            id: request.username.to_lowercase(),
            username: request.username,
            email: request.email.to_lowercase(),
            password: self.pwd.hash_password(&request.password)?,
            created_at: chrono::Utc::now(),
        };

        if !self.repo.insert(&user).await? {
            tracing::debug!(user_id = user.id, "account already exists");
            return Ok(Envelope::new(ACCOUNT_EXISTS));
        }

        tracing::info!(user_id = user.id, "account created");
        metrics::counter!(crate::telemetry::ACCOUNTS_CREATED_TOTAL).increment(1);

        Ok(Envelope::success())
    }
}

#[cfg(test)]
mod tests {
    use sqlx::{Pool, Postgres};

    use super::*;
    use crate::config::Argon2;

    fn service(pool: Pool<Postgres>) -> AccountService {
        let pwd = PasswordManager::new(Some(Argon2 {
            memory_cost: 1024,
            iterations: 1,
            parallelism: 1,
            hash_length: 32,
        }))
        .unwrap();
        AccountService::new(&Database { postgres: pool }, pwd)
    }

    fn request() -> CreateAccountRequestBody {
        CreateAccountRequestBody {
            username: "Satoshi".into(),
            email: "Satoshi@GMX.com".into(),
            password: "hodl2018".into(),
        }
    }

    #[sqlx::test]
    async fn test_create_account(pool: Pool<Postgres>) {
        let service = service(pool.clone());

        let result = service.create_account(request()).await.unwrap();
        assert_eq!(result, Envelope::success());

        let user = UserRepository::new(pool)
            .find_by_id("satoshi")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.username, "Satoshi");
        assert_eq!(user.email, "satoshi@gmx.com");
        assert!(service.pwd.verify_password("hodl2018", &user.password).is_ok());
    }

    #[sqlx::test]
    async fn test_create_account_twice(pool: Pool<Postgres>) {
        let service = service(pool);

        service.create_account(request()).await.unwrap();
        let result = service.create_account(request()).await.unwrap();
        assert_eq!(result, Envelope::new(ACCOUNT_EXISTS));
    }
}
