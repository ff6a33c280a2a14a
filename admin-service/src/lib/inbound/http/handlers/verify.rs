use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedAdmin;

/// Reaching the handler means the middleware accepted the token.
pub async fn verify(
    Extension(admin): Extension<AuthenticatedAdmin>,
) -> ApiSuccess<VerifyResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        VerifyResponseData {
            valid: true,
            username: admin.claims.sub,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyResponseData {
    pub valid: bool,
    pub username: String,
}
