use axum::extract::State;
use axum::http::header;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::admin::models::ChangePasswordCommand;
use crate::domain::admin::models::ClientContext;
use crate::domain::admin::ports::AdminServicePort;
use crate::inbound::http::cookies::clear_session_cookie;
use crate::inbound::http::middleware::AuthenticatedAdmin;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::CandidatePassword;
use crate::inbound::http::validation::ValidatedPassword;

/// Replace the admin password. The session that made the change is ended,
/// so the client must log in again with the new password.
pub async fn change_password(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    client: ClientContext,
    ValidatedPassword(body): ValidatedPassword<ChangePasswordRequest>,
) -> Result<([(HeaderName, String); 1], ApiSuccess<ChangePasswordResponseData>), ApiError> {
    let command = ChangePasswordCommand {
        current_password: body.current_password,
        new_password: body.new_password,
    };

    state
        .admin_service
        .change_password(&admin.claims, &admin.token, command, &client)
        .await?;

    Ok((
        [(header::SET_COOKIE, clear_session_cookie())],
        ApiSuccess::new(
            StatusCode::OK,
            ChangePasswordResponseData {
                message: "Password changed, please log in again".to_string(),
            },
        ),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}

impl CandidatePassword for ChangePasswordRequest {
    fn candidate_password(&self) -> &str {
        &self.new_password
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangePasswordResponseData {
    pub message: String,
}
