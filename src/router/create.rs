use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;

use crate::account::{CreateAccountService, CreateAccountValidator};
use crate::error::Result;
use crate::model::{CreateAccountRequestBody, Envelope};

/// Handler to create an account.
///
/// Invalid requests never reach the service. Whatever the service returns is
/// sent back as is with `200 OK`.
pub async fn handler(
    State(service): State<Arc<dyn CreateAccountService>>,
    body: std::result::Result<Json<CreateAccountRequestBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope>)> {
    let Json(body) = body?;

    if let Err(errors) = CreateAccountValidator.check(&body) {
        tracing::debug!(username = body.username, %errors, "invalid account creation request");
        return Ok((StatusCode::BAD_REQUEST, Json(Envelope::failed())));
    }

    let result = service.create_account(body).await?;

    Ok((StatusCode::OK, Json(result)))
}
