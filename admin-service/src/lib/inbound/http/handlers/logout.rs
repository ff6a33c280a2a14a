use axum::extract::State;
use axum::http::header;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::domain::admin::models::ClientContext;
use crate::domain::admin::ports::AdminServicePort;
use crate::inbound::http::cookies::clear_session_cookie;
use crate::inbound::http::middleware::AuthenticatedAdmin;
use crate::inbound::http::router::AppState;

pub async fn logout(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthenticatedAdmin>,
    client: ClientContext,
) -> ([(HeaderName, String); 1], ApiSuccess<LogoutResponseData>) {
    state
        .admin_service
        .logout(&admin.token, &admin.claims, &client);

    (
        [(header::SET_COOKIE, clear_session_cookie())],
        ApiSuccess::new(
            StatusCode::OK,
            LogoutResponseData {
                message: "Logged out".to_string(),
            },
        ),
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {
    pub message: String,
}
