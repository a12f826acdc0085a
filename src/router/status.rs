//! Public information page for front-end identification.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::config::Configuration;

/// Structured configuration.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub name: String,
    pub version: String,
    pub url: String,
}

/// Public server status (configuration).
pub async fn status(State(config): State<Arc<Configuration>>) -> Json<Status> {
    Json(Status {
        name: if config.name.is_empty() {
            env!("CARGO_CRATE_NAME").into()
        } else {
            config.name.clone()
        },
        version: config.version.clone(),
        url: config.url.clone(),
    })
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;

    use super::*;
    use crate::router::create::tests::{Behaviour, MockService};
    use crate::{AppState, app, make_request};

    #[tokio::test]
    async fn test_status_handler() {
        let config = Configuration {
            name: "auditing".into(),
            url: "https://audit.cryptocaddy.io/".into(),
            version: "0.1.0".into(),
            ..Default::default()
        };
        let state = AppState::new(
            Arc::new(config),
            Arc::new(MockService::new(Behaviour::Fail)),
        );

        let response =
            make_request(app(state), Method::GET, "/status.json", String::default())
                .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Status = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.name, "auditing");
        assert_eq!(body.url, "https://audit.cryptocaddy.io/");
    }
}
