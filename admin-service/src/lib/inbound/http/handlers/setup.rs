use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::admin::errors::AdminError;
use crate::domain::admin::models::ClientContext;
use crate::domain::admin::models::SetupCommand;
use crate::domain::admin::models::Username;
use crate::domain::admin::ports::AdminServicePort;
use crate::inbound::http::router::AppState;

pub async fn setup(
    State(state): State<AppState>,
    client: ClientContext,
    payload: Result<Json<SetupRequest>, JsonRejection>,
) -> Result<ApiSuccess<SetupResponseData>, ApiError> {
    // The password policy runs inside setup, after the configured check
    let Json(body) = payload?;

    state
        .admin_service
        .setup(body.try_into_command()?, &client)
        .await
        .map_err(ApiError::from)
        .map(|status| {
            ApiSuccess::new(
                StatusCode::CREATED,
                SetupResponseData {
                    username: status.username,
                },
            )
        })
}

/// HTTP request body for first-time setup (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SetupRequest {
    #[serde(default)]
    username: Option<String>,
    password: String,
}

impl SetupRequest {
    fn try_into_command(self) -> Result<SetupCommand, AdminError> {
        let username = self.username.map(Username::new).transpose()?;
        Ok(SetupCommand {
            username,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetupResponseData {
    pub username: String,
}
