//! Account creation.
mod repository;
mod service;
mod validation;

pub use repository::*;
pub use service::*;
pub use validation::*;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{CreateAccountRequestBody, Envelope};

/// Business logic behind `POST /accounts`.
#[async_trait]
pub trait CreateAccountService: Send + Sync {
    /// Create an account from an already validated request.
    async fn create_account(
        &self,
        request: CreateAccountRequestBody,
    ) -> Result<Envelope>;
}
