use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::admin::models::AdminStatus;
use crate::domain::admin::ports::AdminServicePort;
use crate::inbound::http::router::AppState;

pub async fn status(
    State(state): State<AppState>,
) -> Result<ApiSuccess<StatusResponseData>, ApiError> {
    state
        .admin_service
        .status()
        .await
        .map_err(ApiError::from)
        .map(|status| ApiSuccess::new(StatusCode::OK, status.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusResponseData {
    pub setup_required: bool,
    pub username: String,
}

impl From<AdminStatus> for StatusResponseData {
    fn from(status: AdminStatus) -> Self {
        Self {
            setup_required: status.setup_required,
            username: status.username,
        }
    }
}
