use serde::{Deserialize, Serialize};

/// Link between a [`super::User`] and one of their exchange accounts.
#[derive(
    Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow,
)]
pub struct UserExchange {
    pub id: String,
    pub user_id: String,
    /// Exchange name, such as `binance` or `kraken`.
    pub exchange: String,
    pub api_key: String,
    #[serde(skip_serializing)]
    pub api_secret: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
