use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::UserExchangeRepository;
use crate::error::Result;
use crate::model::{User, UserExchange};

/// In-process [`UserExchangeRepository`].
#[derive(Clone, Default)]
pub struct MemoryUserExchangeRepository {
    records: Arc<RwLock<HashMap<String, UserExchange>>>,
}

impl MemoryUserExchangeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records matching `filter`, ordered by `(created_at, id)`.
    async fn sorted(&self, filter: impl Fn(&UserExchange) -> bool) -> Vec<UserExchange> {
        let records = self.records.read().await;

        let mut exchanges: Vec<UserExchange> =
            records.values().filter(|&e| filter(e)).cloned().collect();
        exchanges.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));

        exchanges
    }
}

#[async_trait]
impl UserExchangeRepository for MemoryUserExchangeRepository {
    async fn find_by_user(&self, user: &User) -> Result<Option<UserExchange>> {
        let records = self.records.read().await;

        Ok(records
            .values()
            .filter(|e| e.user_id == user.id)
            .min_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)))
            .cloned())
    }

    async fn find_all_by_user(&self, user: &User) -> Result<Vec<UserExchange>> {
        Ok(self.sorted(|e| e.user_id == user.id).await)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserExchange>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<UserExchange>> {
        Ok(self.sorted(|_| true).await)
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.records.read().await.contains_key(id))
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.records.read().await.len() as i64)
    }

    async fn save(&self, exchange: &UserExchange) -> Result<()> {
        let mut records = self.records.write().await;

        // keep the original creation date on update.
        let created_at = records
            .get(&exchange.id)
            .map(|e| e.created_at)
            .unwrap_or(exchange.created_at);
        records.insert(
            exchange.id.clone(),
            UserExchange {
                created_at,
                ..exchange.clone()
            },
        );

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.records.write().await.remove(id).is_some())
    }
}
