//! Exchange accounts linked to users.
//!
//! A user may own several [`UserExchange`] records. Every lookup by user
//! returns them ordered by `created_at`, then `id`, and
//! [`UserExchangeRepository::find_by_user`] picks the first one.
mod memory;
mod postgres;

pub use memory::*;
pub use postgres::*;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{User, UserExchange};

#[async_trait]
pub trait UserExchangeRepository: Send + Sync {
    /// First exchange record owned by `user`, if any.
    async fn find_by_user(&self, user: &User) -> Result<Option<UserExchange>>;

    /// Every exchange record owned by `user`.
    async fn find_all_by_user(&self, user: &User) -> Result<Vec<UserExchange>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<UserExchange>>;

    /// Every exchange record, same ordering as [`Self::find_all_by_user`].
    async fn find_all(&self) -> Result<Vec<UserExchange>>;

    async fn exists(&self, id: &str) -> Result<bool>;

    async fn count(&self) -> Result<i64>;

    /// Insert `exchange`, or replace the record sharing its id.
    async fn save(&self, exchange: &UserExchange) -> Result<()>;

    /// Remove a record. Returns `false` if nothing matched `id`.
    async fn delete(&self, id: &str) -> Result<bool>;
}
