use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::admin::models::ClientContext;
use crate::domain::admin::models::LoginCommand;
use crate::domain::admin::ports::AdminServicePort;
use crate::inbound::http::cookies::session_cookie;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    client: ClientContext,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<([(HeaderName, String); 1], ApiSuccess<LoginResponseData>), ApiError> {
    let Json(body) = payload?;
    let command = LoginCommand {
        username: body.username,
        password: body.password,
    };

    let session = state.admin_service.login(command, &client).await?;

    let cookie = session_cookie(
        &session.token,
        state.session_max_age_secs(),
        state.cookie_secure,
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        ApiSuccess::new(
            StatusCode::OK,
            LoginResponseData {
                token: session.token,
                username: session.username,
                expires_at: session.expires_at,
            },
        ),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}
